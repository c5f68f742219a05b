//! Error taxonomy of the picker
//!
//! Nothing here is fatal: after any error the controller is back to `Idle`
//! and the next `show` is a fresh attempt.

use thiserror::Error;

/// Errors surfaced synchronously by [`PickerController`](crate::PickerController)
#[derive(Debug, Error)]
pub enum PickerError {
    /// `show` was called while a dialog is already open.
    /// Retry after the current session resolves, or ignore.
    #[error("a color picker is already being presented")]
    AlreadyPresenting,

    /// The UI layer could not render the dialog
    #[error("color picker presentation failed: {0}")]
    PresentationFailed(#[from] PresentError),

    /// The option map handed over by the host is not representable
    #[error("invalid picker configuration: {0}")]
    InvalidConfiguration(String),
}

/// Failures a [`Presenter`](crate::Presenter) reports when it cannot render
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentError {
    #[error("no native color picker on {0}")]
    Unsupported(&'static str),

    #[error("no host window to attach the dialog to")]
    NoHostWindow,

    #[error("platform error: {0}")]
    Platform(String),
}

/// Result type for picker operations
pub type PickerResult<T> = Result<T, PickerError>;

impl From<serde_json::Error> for PickerError {
    fn from(err: serde_json::Error) -> Self {
        PickerError::InvalidConfiguration(err.to_string())
    }
}
