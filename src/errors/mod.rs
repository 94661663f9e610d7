//! Centralized error handling for the HDHomeRun EPG service
//!
//! Errors are split by the layer that raises them so callers can decide how
//! far a failure is allowed to travel:
//!
//! - **Source Errors**: device and guide API failures. Fatal for an extraction run.
//! - **Document Errors**: XMLTV parse/serialize failures. Contained by the
//!   dummy injector, which falls back to the original document.
//! - **Episode Code Errors**: local to one programme, logged and skipped.
//! - **Web Errors**: conditions surfaced to HTTP clients.
//!
//! # Usage
//!
//! ```rust
//! use hdhomerun_epg::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for Document Results
pub type DocumentResult<T> = Result<T, DocumentError>;
