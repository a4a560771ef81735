use proven_view::ViewError;
use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The view has terminated and no longer accepts requests.
    #[error("view has stopped")]
    Stopped,

    /// The source view terminated before answering a state request.
    #[error("source view stopped before returning its state")]
    SourceStopped,

    /// The source view did not answer a state request in time.
    #[error("timed out after {millis}ms waiting for source view state")]
    Timeout {
        /// The configured timeout in milliseconds.
        millis: u64,
    },
}

impl ViewError for Error {}
