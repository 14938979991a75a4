//! Error types

mod api;
mod session;

pub use api::*;
pub use session::*;

use std::time::Duration;

/// Top-level error for collection operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The collection service call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The service kept answering 429 after all retries were spent.
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimit {
        /// Server-provided wait hint, if any.
        retry_after: Option<Duration>,
    },

    /// Reading or writing the persisted session failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// `start()` was called on a controller that already initialized.
    #[error("Collection already started")]
    AlreadyStarted,

    /// A gesture or fetch was issued before `start()` completed.
    #[error("Collection not started")]
    NotStarted,
}

impl Error {
    /// Returns `true` if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_retryable(),
            Self::RateLimit { .. } => true,
            _ => false,
        }
    }
}
