use ams_core::error::CoreError;
use ams_db::StoreError;

/// Failure of a workflow operation: a domain rule or the store underneath.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            EngineError::Core(e) => Some(e),
            EngineError::Store(_) => None,
        }
    }
}

/// Shorthand for `Err(CoreError::Conflict(..).into())`.
pub(crate) fn conflict<T>(msg: impl Into<String>) -> EngineResult<T> {
    Err(CoreError::Conflict(msg.into()).into())
}
