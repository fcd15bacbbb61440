// src/error.rs
//! Error types shared by the row processor and the analysis service.
//!
//! `ErrorKind` is the closed taxonomy of things that can go wrong. The same
//! kinds are carried inside a record's `Status` when a single identifier fails,
//! so a failure keeps its category all the way to the exported table.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad arguments or a missing input column. Aborts before any row runs.
    Config,
    /// The upstream says the identifier does not exist.
    NotFound,
    /// The upstream (or the analysis service) answered with a non-success status.
    Upstream,
    /// Network failure or timeout.
    Transport,
    /// A body that could not be parsed into the expected shape.
    MalformedResponse,
    /// Local file read/write.
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Transport => "transport",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::Io => "io",
        }
    }

    /// Human-facing label used in status strings.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Config => "Configuration Error",
            ErrorKind::NotFound => "User Not Found",
            ErrorKind::Upstream => "Upstream Error",
            ErrorKind::Transport => "Request Failed",
            ErrorKind::MalformedResponse => "Malformed Response",
            ErrorKind::Io => "I/O Error",
        }
    }

    pub fn from_label(label: &str) -> Option<ErrorKind> {
        [
            ErrorKind::Config,
            ErrorKind::NotFound,
            ErrorKind::Upstream,
            ErrorKind::Transport,
            ErrorKind::MalformedResponse,
            ErrorKind::Io,
        ]
        .into_iter()
        .find(|k| k.label() == label)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self { kind, message: message.into(), source: Some(Box::new(source)) }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        let message = e.to_string();
        Self::with_source(ErrorKind::Io, message, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        let message = format!("invalid JSON: {e}");
        Self::with_source(ErrorKind::MalformedResponse, message, e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_decode() {
            ErrorKind::MalformedResponse
        } else if e.is_status() {
            ErrorKind::Upstream
        } else {
            ErrorKind::Transport
        };
        let message = if e.is_timeout() {
            format!("timed out: {e}")
        } else {
            e.to_string()
        };
        Self::with_source(kind, message, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for kind in [ErrorKind::Upstream, ErrorKind::Transport, ErrorKind::NotFound] {
            assert_eq!(ErrorKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(ErrorKind::from_label("Something Else"), None);
    }

    #[test]
    fn io_errors_keep_their_kind() {
        let e: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(e.kind(), ErrorKind::Io);
        assert_eq!(e.to_string(), "gone");
    }
}
