// src/handlers/error.rs
use std::fmt;
use warp::reject::Reject;

/// Boundary error. Carries only a message; it is rendered as `{"error": ...}`.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
        }
    }

    /// Snapshot missing, unreadable or malformed. Keeps the full context chain.
    pub fn upstream_error(err: &anyhow::Error) -> Self {
        ApiError::new(format!("{:#}", err))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
