//! Error types for the PersonaWeb engine
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI
//!
//! Note that the decision path itself never surfaces errors: signal-read and
//! remote-delegation faults degrade silently, and render faults are contained
//! at the transition boundary. These types cover configuration, IO, and the
//! contained faults' diagnostics.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,

    // Remote delegation errors (3xx)
    RemoteRequest = 300,
    RemoteStatus = 301,
    RemoteMalformed = 302,

    // Render errors (4xx)
    RenderFailed = 400,

    // Template registry errors (5xx)
    TemplateParse = 500,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Remote errors
            400..=499 => 40, // Render errors
            500..=599 => 50, // Template errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the engine
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration problem (parse or semantic)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to read a file
    #[error("Failed to read {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("Failed to write {path}: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote decision endpoint could not be reached
    #[error("Remote decision request failed: {0}")]
    RemoteRequest(String),

    /// Remote decision endpoint returned a non-success status
    #[error("Remote decision endpoint returned status {0}")]
    RemoteStatus(u16),

    /// Remote decision payload did not deserialize
    #[error("Remote decision payload malformed: {0}")]
    RemoteMalformed(String),

    /// Render sink failed to swap in new content
    #[error("Render failed: {0}")]
    Render(String),

    /// Bundled hero template failed to parse
    #[error("Template '{persona}' failed to parse: {reason}")]
    Template { persona: String, reason: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::Config(_) => ErrorCode::ConfigValidation,
            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::RemoteRequest(_) => ErrorCode::RemoteRequest,
            Error::RemoteStatus(_) => ErrorCode::RemoteStatus,
            Error::RemoteMalformed(_) => ErrorCode::RemoteMalformed,
            Error::Render(_) => ErrorCode::RenderFailed,
            Error::Template { .. } => ErrorCode::TemplateParse,
            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get the CLI exit code for this error
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    /// A short suggestion for the user, where one exists
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => {
                Some("Run 'personaweb config init' to create a default configuration file.")
            }
            Error::Config(_) => Some("Run 'personaweb config validate' to check the file."),
            Error::RemoteRequest(_) | Error::RemoteStatus(_) | Error::RemoteMalformed(_) => {
                Some("The engine falls back to local scoring; check the remote_endpoint setting.")
            }
            _ => None,
        }
    }

    /// Format the error for terminal display with code and suggestion
    pub fn format_for_terminal(&self) -> String {
        let mut out = format!("error[{}]: {}\n", self.code(), self);
        if let Some(suggestion) = self.suggestion() {
            out.push_str(&format!("  hint: {}\n", suggestion));
        }
        out
    }
}
