//! Error type definitions for the HDHomeRun EPG service

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Device or guide API errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// XMLTV document errors
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file decoding errors
    #[error("TOML error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    /// Configuration file encoding errors
    #[error("TOML error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
}

/// Errors raised while talking to the tuner or the guide API
#[derive(Error, Debug)]
pub enum SourceError {
    /// The request never produced a response (DNS, connect, TLS, timeout)
    #[error("Transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    /// The body did not have the expected JSON shape
    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },
}

/// Errors raised while parsing or serializing an XMLTV document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Input is not a well-formed XMLTV document
    #[error("Failed to parse XMLTV document: {message}")]
    Parse { message: String },

    /// Serialization to bytes failed
    #[error("Failed to write XMLTV document: {message}")]
    Write { message: String },
}

/// A vendor episode code that cannot be mapped onto `xmltv_ns`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EpisodeCodeError {
    #[error("Episode code '{code}' is not in S<n>E<m> form")]
    Unparseable { code: String },
}

/// Web layer specific errors
#[derive(Error, Debug)]
pub enum WebError {
    /// The guide file has not been generated yet
    #[error("EPG file not found: {path}")]
    NotReady { path: String },

    /// Anything else that should surface as a 500
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create a transport error
    pub fn transport<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a non-success status error
    pub fn http<U: Into<String>>(url: U, status: u16) -> Self {
        Self::Http {
            url: url.into(),
            status,
        }
    }

    /// Create a malformed response error
    pub fn malformed<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl DocumentError {
    /// Create a parse error
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a write error
    pub fn write<M: Into<String>>(message: M) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

impl WebError {
    /// Create a not-ready error for a missing guide file
    pub fn not_ready<P: Into<String>>(path: P) -> Self {
        Self::NotReady { path: path.into() }
    }

    /// Create an internal error
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
