//! Unified application error type.
//! All modules (db, core, worker, cli) return AppError so that callers get a
//! single taxonomy: validation, conflict, not-found and persistence failures.

use serde::Serialize;
use std::fmt;
use std::io;
use thiserror::Error;

/// State conflicts raised by the scan processor. Rejected without mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// An entry scan arrived while the day's session is still open.
    AlreadyOpen,
    /// An exit scan arrived for a session that is already closed.
    AlreadyClosed,
    /// An exit scan arrived with no session checked in.
    NoOpenSession,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConflictKind::AlreadyOpen => "an attendance session is already open for today",
            ConflictKind::AlreadyClosed => "the attendance session is already closed",
            ConflictKind::NoOpenSession => "no open attendance session to close",
        };
        f.write_str(msg)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Persistence
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Request validation
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("Conflict: {0}")]
    Conflict(ConflictKind),

    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Background workers
    // ---------------------------
    #[error("Worker error: {0}")]
    Worker(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// HTTP-style status code for the request layer.
    pub fn status(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::InvalidDate(_) | AppError::InvalidTime(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            _ => 500,
        }
    }

    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::InvalidDate(_) | AppError::InvalidTime(_) => {
                "validation"
            }
            AppError::Conflict(ConflictKind::AlreadyOpen) => "already_open",
            AppError::Conflict(ConflictKind::AlreadyClosed) => "already_closed",
            AppError::Conflict(ConflictKind::NoOpenSession) => "no_open_session",
            AppError::NotFound(_) => "not_found",
            AppError::Db(_) | AppError::Migration(_) => "persistence",
            AppError::Config(_) | AppError::ConfigLoad | AppError::ConfigSave => "config",
            AppError::Io(_) | AppError::Worker(_) | AppError::Other(_) => "internal",
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            status: self.status(),
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Serializable error body handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub status: u16,
    pub kind: &'static str,
    pub message: String,
}

pub type AppResult<T> = Result<T, AppError>;
