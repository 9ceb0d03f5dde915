use tl_store::{DirectoryError, StoreError};
use tl_types::ResultCode;

/// Errors raised while applying a transition to a ledger view.
///
/// Inside a transition these never escape: they are turned into a failure
/// [`ResultCode`] and the transition's writes are discarded.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl EngineError {
    /// The result reported when this error ends a transition.
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::Directory(DirectoryError::Full { .. }) => ResultCode::DirectoryFull,
            _ => ResultCode::BadLedger,
        }
    }
}
