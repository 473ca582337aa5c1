//! Declarative, replayable test fixture contexts.
//!
//! A [`registry::Registry`] maps context names to deferred definition
//! blocks. Resolving a name builds a fresh [`record::Record`] and replays
//! the stored block against it, so every resolution yields an independent
//! fixture object graph.

pub mod error;
pub mod record;
pub mod registry;
pub mod value;
