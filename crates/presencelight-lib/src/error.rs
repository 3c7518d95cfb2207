//! Unified error type for the presencelight-lib crate.
//!
//! [`PresencelightError`] wraps module-specific errors (`ExtractError`,
//! `LightError`) and domain-specific error kinds (`Config`). `From` impls
//! allow `?` to propagate across module boundaries seamlessly.

use std::fmt;

use crate::extractor::ExtractError;
use crate::light::LightError;

/// Unified error type for presencelight-lib operations.
#[derive(Debug)]
pub enum PresencelightError {
    /// Log file resolution or scan error.
    Extract(ExtractError),
    /// Light communication error (connect, timeout, bad response).
    Light(LightError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
}

impl fmt::Display for PresencelightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresencelightError::Extract(e) => write!(f, "{e}"),
            PresencelightError::Light(e) => write!(f, "{e}"),
            PresencelightError::Io(e) => write!(f, "I/O error: {e}"),
            PresencelightError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for PresencelightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresencelightError::Extract(e) => Some(e),
            PresencelightError::Light(e) => Some(e),
            PresencelightError::Io(e) => Some(e),
            PresencelightError::Config(_) => None,
        }
    }
}

impl From<ExtractError> for PresencelightError {
    fn from(e: ExtractError) -> Self {
        PresencelightError::Extract(e)
    }
}

impl From<LightError> for PresencelightError {
    fn from(e: LightError) -> Self {
        PresencelightError::Light(e)
    }
}

impl From<std::io::Error> for PresencelightError {
    fn from(e: std::io::Error) -> Self {
        PresencelightError::Io(e)
    }
}

/// Crate-level Result alias using [`PresencelightError`].
pub type Result<T> = std::result::Result<T, PresencelightError>;
