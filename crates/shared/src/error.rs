use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Unavailable,
    Malformed,
    Internal,
}

/// A content API failure that was recovered from, recorded for the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid filter '{0}': expected 'all' or a numeric tag id")]
pub struct ParseSelectionError(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid sort direction '{0}': expected 'asc' or 'desc'")]
pub struct ParseDirectionError(pub String);
