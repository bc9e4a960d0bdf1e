use thiserror::Error;
use uuid::Uuid;

use mstrack_core::error::CoreError;
use mstrack_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum VisitError {
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("visit {0} is cancelled")]
    Cancelled(Uuid),
}
