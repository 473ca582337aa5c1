use std::{collections::BTreeMap, fmt, rc::Rc};

use crate::{
    error::ContextError,
    record::{DefinitionBlock, Record},
};

/// Name-indexed catalog of context definitions.
///
/// A context is registered as a deferred block and stored verbatim; nothing
/// runs until [`Registry::resolve`] replays the block against a fresh
/// [`Record`]. The catalog only grows: `define` overwrites on a duplicate
/// name, `resolve` never mutates.
///
/// The registry carries no synchronization. It is meant to be constructed
/// once at test-suite startup and passed by reference; callers sharing one
/// across threads must serialize `define` and `resolve` externally.
#[derive(Default, Clone)]
pub struct Registry {
    contexts: BTreeMap<String, DefinitionBlock>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `block` under `name`, overwriting any existing definition.
    ///
    /// The block is opaque at registration time: it is not executed and its
    /// contents are not inspected.
    pub fn define(&mut self, name: impl Into<String>, block: impl Fn(&mut Record) + 'static) {
        self.contexts.insert(name.into(), Rc::new(block));
    }

    /// Materializes the context registered under `name`.
    ///
    /// Builds a fresh [`Record`], runs the stored definition block against
    /// it to completion, and returns it. Each call replays independently:
    /// two resolutions of the same name yield records with equal attribute
    /// values that can be mutated without affecting one another.
    ///
    /// Fails with [`ContextError::NotRegistered`] before constructing any
    /// record if `name` was never defined.
    pub fn resolve(&self, name: &str) -> Result<Record, ContextError> {
        let block = self
            .contexts
            .get(name)
            .ok_or_else(|| ContextError::NotRegistered(name.to_string()))?;
        let mut record = Record::new();
        block(&mut record);
        Ok(record)
    }

    /// Runs `build` against a [`Definitions`] scope and merges every context
    /// it accumulated into the catalog.
    ///
    /// Later entries win over earlier ones of the same name, including names
    /// already present in the catalog.
    pub fn configure(&mut self, build: impl FnOnce(&mut Definitions)) {
        let mut scope = Definitions::default();
        build(&mut scope);
        self.contexts.extend(scope.entries);
    }

    /// Returns whether a context is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.contexts.contains_key(name)
    }

    /// Returns the number of registered contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Returns whether no contexts are registered.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Iterates registered context names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("contexts", &self.contexts.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Accumulator scope handed to [`Registry::configure`] blocks.
///
/// Collects `(name, block)` pairs in declaration order; the registry merges
/// them once the configure block returns. Host code can layer helper methods
/// on top of the scope through extension traits, which keeps fixture
/// vocabulary (builders, converters) available inside every configure block
/// without touching this crate.
#[derive(Default)]
pub struct Definitions {
    entries: Vec<(String, DefinitionBlock)>,
}

impl Definitions {
    /// Declares one named context.
    pub fn context(&mut self, name: impl Into<String>, block: impl Fn(&mut Record) + 'static) {
        self.entries.push((name.into(), Rc::new(block)));
    }
}
