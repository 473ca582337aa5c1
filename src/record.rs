use std::{collections::BTreeMap, fmt, rc::Rc};

use crate::value::Value;

/// A stored, not-yet-executed definition block.
///
/// Blocks are replayed against a fresh [`Record`] each time the name they
/// are stored under is read, so they are shared (`Rc`) and re-invokable
/// (`Fn`).
pub type DefinitionBlock = Rc<dyn Fn(&mut Record)>;

/// Open attribute container with deferred, named sub-blocks.
///
/// A record's shape is discovered entirely from usage: any name may be
/// assigned a plain [`Value`] or declared as a nested definition block, with
/// no schema or prior declaration. The two stores are kept disjoint: a name
/// is either a plain attribute or a deferred block, and the most recent
/// `set`/`declare` call for a name decides which (last usage wins).
///
/// Nested reads replay: each [`Record::nested`] call builds a brand-new
/// record and runs the stored block against it, so two reads of the same
/// name yield two independent records. Replay is intentionally not memoized.
///
/// No record operation fails or panics; reading a name that was never used
/// reports absence through `Option` / [`Read::Absent`].
#[derive(Default, Clone)]
pub struct Record {
    attributes: BTreeMap<String, Value>,
    definitions: BTreeMap<String, DefinitionBlock>,
}

/// Result of the unified three-way dispatch in [`Record::read`].
pub enum Read<'a> {
    /// The name holds a plain attribute.
    Value(&'a Value),
    /// The name holds a deferred block, freshly materialized.
    Nested(Record),
    /// The name was never assigned or declared.
    Absent,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a plain attribute, overwriting any prior value under `name`.
    ///
    /// A deferred block previously declared under `name` is evicted: the
    /// name becomes a plain attribute from this point on.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.definitions.remove(&name);
        self.attributes.insert(name, value.into());
    }

    /// Reads a plain attribute, or `None` if `name` holds no plain value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Declares a deferred sub-block under `name` without executing it.
    ///
    /// A plain attribute previously assigned under `name` is evicted: the
    /// name becomes a deferred block from this point on.
    pub fn declare(&mut self, name: impl Into<String>, block: impl Fn(&mut Record) + 'static) {
        let name = name.into();
        self.attributes.remove(&name);
        self.definitions.insert(name, Rc::new(block));
    }

    /// Materializes the deferred block stored under `name`.
    ///
    /// Builds a brand-new record, runs the block against it to completion,
    /// and returns it. Every call replays into a fresh record; mutations on
    /// one returned record are invisible to the next. Returns `None` if no
    /// block is stored under `name`.
    pub fn nested(&self, name: &str) -> Option<Record> {
        let block = self.definitions.get(name)?;
        let mut record = Record::new();
        block(&mut record);
        Some(record)
    }

    /// Unified dispatch over the three read outcomes.
    ///
    /// Attribute hit wins, then deferred hit (materialized as in
    /// [`Record::nested`]), then [`Read::Absent`]. The two stores are
    /// disjoint, so at most one arm can match.
    pub fn read(&self, name: &str) -> Read<'_> {
        if let Some(value) = self.attributes.get(name) {
            Read::Value(value)
        } else if let Some(record) = self.nested(name) {
            Read::Nested(record)
        } else {
            Read::Absent
        }
    }

    /// Returns whether `name` holds either a plain attribute or a block.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name) || self.definitions.contains_key(name)
    }

    /// Returns whether nothing has been assigned or declared.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.definitions.is_empty()
    }

    /// Iterates plain attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serializes the plain attributes as a JSON object.
    ///
    /// Deferred definitions are not materialized; replay stays a read-time
    /// decision of the caller.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<(&str, String)> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.to_string()))
            .chain(
                self.definitions
                    .keys()
                    .map(|k| (k.as_str(), "<deferred>".to_string())),
            )
            .collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        let rendered: Vec<String> = items
            .into_iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("attributes", &self.attributes)
            .field(
                "definitions",
                &self.definitions.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_sorted_entries() {
        let mut record = Record::new();
        record.set("b", 2);
        record.set("a", 1);
        record.declare("d", |_| {});
        assert_eq!(record.to_string(), "{a: 1, b: 2, d: <deferred>}");
    }

    #[test]
    fn test_contains_covers_both_stores() {
        let mut record = Record::new();
        record.set("a", 1);
        record.declare("d", |_| {});
        assert!(record.contains("a"));
        assert!(record.contains("d"));
        assert!(!record.contains("x"));
    }
}
