//! Unified application error type.
//! All modules (db, core, scanner, google, sync, cli) return AppError to keep
//! the error handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid payment method: {0}")]
    InvalidPayment(String),

    #[error("Invalid reference kind: {0}")]
    InvalidReferenceKind(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No active shift. Start one with `taxibook shift start`.")]
    NoActiveShift,

    #[error("A shift is already active (id {0})")]
    ShiftAlreadyActive(i64),

    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    #[error("Ambiguous {0} '{1}', candidates: {2}")]
    Ambiguous(&'static str, String, String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Scanner errors
    // ---------------------------
    #[error("OCR error: {0}")]
    Ocr(String),

    // ---------------------------
    // Remote (Google) errors
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Google API error ({status}): {message}")]
    GoogleApi { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Sync error: {0}")]
    Sync(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
