use thiserror::Error;

/// Errors surfaced by the registry boundary.
///
/// Record access never fails; absence is reported through `Option`. The only
/// checked failure in the crate is asking the registry for a name that was
/// never defined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The requested context name has no stored definition.
    #[error("context `{0}` is not registered")]
    NotRegistered(String),
}
