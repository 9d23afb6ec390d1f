use std::time::Duration;
use thiserror::Error;

/// Shown to the user for any analysis failure.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze website. Please try again.";

/// Shown for any credential failure, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),
    #[error("analysis backend failed: {0}")]
    Backend(String),
}

impl AnalysisError {
    pub fn user_message(&self) -> &'static str {
        ANALYSIS_FAILED_MESSAGE
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,
    #[error("please enter a valid email address")]
    MalformedEmail,
    #[error("authentication provider error: {0}")]
    Provider(String),
}

#[derive(Debug, Error)]
pub enum TrendError {
    #[error("no metrics recorded for {0} and no current metrics to extrapolate from")]
    NoBaseline(String),
}
