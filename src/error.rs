//! Errors surfaced by the service layer.
//!
//! Pages turn these into destructive toasts; nothing here is fatal to the
//! app. Validation and sign-up messages are already user-facing text.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use backend::BackendError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Input rejected before reaching the backend.
    #[error("{0}")]
    Validation(String),

    /// Backend rejection already rewritten for display.
    #[error("{0}")]
    Rejected(String),

    #[error("you need to sign in first")]
    NotSignedIn,

    #[error("the operation timed out")]
    TimedOut,

    /// Browser API (clipboard, file read) failure.
    #[error("browser error: {0}")]
    Browser(String),
}

impl ServiceError {
    /// Text for the description line of an error toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(e) => e.user_message(),
            Self::Validation(msg) | Self::Rejected(msg) => msg.clone(),
            Self::NotSignedIn => "You need to sign in first.".to_owned(),
            Self::TimedOut => "The operation is taking longer than expected. Please try again.".to_owned(),
            Self::Browser(_) => "Your browser blocked the operation. Please try again.".to_owned(),
        }
    }
}
