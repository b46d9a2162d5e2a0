//! Error Types
//!
//! Typed failures for draft editing, batch submission and calls to the
//! certificate API. Display strings are the notices shown to operators.

use crate::CreatedRecord;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Draft field that must be filled before a draft is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    CourseName,
    SkillsLearned,
    CertificateUrl,
}

impl RequiredField {
    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::CourseName => "courseName",
            RequiredField::SkillsLearned => "skillsLearned",
            RequiredField::CertificateUrl => "certificateUrl",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from editing the draft batch
///
/// None of these change builder state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{reason}")]
    ValidationFailed {
        field: RequiredField,
        reason: &'static str,
    },

    #[error("This student can only have one certificate.")]
    CapacityExceeded,

    #[error("Save profile first to apply the certificate mode change.")]
    ModeChangePending,

    #[error("No certificate at position {index} (batch holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors from submitting a batch
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Student full name is required.")]
    MissingStudentName,

    #[error("Add at least one certificate before saving.")]
    EmptyBatch,

    #[error("Every certificate needs an uploaded certificate image (certificate {} has none).", .index + 1)]
    IncompleteDraft { index: usize },

    /// Call `index` failed; `created` holds the records from the calls before it.
    #[error("Saving certificate {} failed after {} succeeded: {source}", .index + 1, .created.len())]
    ExternalCallFailed {
        index: usize,
        created: Vec<CreatedRecord>,
        #[source]
        source: ApiError,
    },
}

impl SubmitError {
    /// Number of certificates written before the failure
    pub fn succeeded(&self) -> usize {
        match self {
            SubmitError::ExternalCallFailed { created, .. } => created.len(),
            _ => 0,
        }
    }
}

/// Structured error code reported by the certificate API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidToken,
    MissingAuthToken,
    TokenExpired,
    #[serde(other)]
    Other,
}

impl ErrorCode {
    /// Codes meaning the bearer token is no longer usable
    pub fn is_auth_token_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::InvalidToken | ErrorCode::MissingAuthToken | ErrorCode::TokenExpired
        )
    }
}

/// Errors from the HTTP transport to the certificate API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("API returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        code: Option<ErrorCode>,
        message: Option<String>,
    },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rejected locally before any request was sent
    #[error(transparent)]
    Draft(#[from] DraftError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
