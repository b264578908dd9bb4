// [libs/domain/models/src/error.rs]
//! Single Source of Truth error taxonomy shared by every orchestrator
//! subsystem (§7 of the design: error kinds and propagation policy).

use serde::{Deserialize, Serialize};

/// Abstract error kind surfaced to callers. Never carries a stack trace,
/// a home-directory path, or an HMAC key — see `AppError::redacted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    ResourceExhausted,
    Degraded,
    Unhealthy,
    IntegrityFailure,
    Timeout,
    Canceled,
    Internal,
}

impl ErrorKind {
    /// Whether a caller can reasonably retry this class of failure.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::ResourceExhausted | ErrorKind::Degraded | ErrorKind::Timeout
        )
    }
}

/// The structured, user-visible failure object described in §7.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
    pub field: Option<String>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let retryable = kind.is_retryable();
        Self { kind, message: message.into(), retryable, field: None }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message).with_field(field)
    }

    pub fn resource_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceExhausted, message)
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Degraded, message)
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unhealthy, message)
    }

    pub fn integrity_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IntegrityFailure, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn canceled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Canceled, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Scrubs this error for an external boundary (HTTP response, client
    /// log). `Internal` messages routinely wrap a raw `std::io::Error` or a
    /// `{path:?}` formatted straight from the filesystem (audit log I/O,
    /// config paths under a user's home directory) — those collapse to a
    /// fixed generic message here. Every other kind's message is already
    /// written to be caller-facing, so it passes through unchanged.
    pub fn redacted(&self) -> Self {
        match self.kind {
            ErrorKind::Internal => Self {
                kind: self.kind,
                message: "an internal error occurred".to_string(),
                retryable: self.retryable,
                field: None,
            },
            _ => self.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
