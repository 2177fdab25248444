/*!
 * Error types for the podenhance library.
 *
 * This module contains custom error types for the enhancement client and the
 * caption converter, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the enhancement service
#[derive(Error, Debug)]
pub enum EnhancementError {
    /// The request never produced an HTTP response (connection, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with something other than HTTP 200
    #[error("API responded with error: {status_code} - {message}")]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Response body, if any
        message: String,
    },

    /// The response body could not be decoded as JSON
    #[error("Failed to decode API response: {0}")]
    Decode(String),

    /// The client-credentials exchange failed
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A service URL could not be built from the configuration
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No discipline is available to send with a creation request
    #[error("No discipline configured")]
    NoDisciplineConfigured,
}

impl EnhancementError {
    /// HTTP status code carried by the error, if it came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EnhancementError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

/// Errors that can occur while building a subtitle track
#[derive(Error, Debug)]
pub enum CaptionError {
    /// The transcript JSON does not have the expected shape
    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),

    /// Writing the track failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the enhancement service
    #[error("Enhancement error: {0}")]
    Enhancement(#[from] EnhancementError),

    /// Error from caption conversion
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
