//! Utility functions for the HDHomeRun EPG service
//!
//! - `text`: free-text sanitizing for guide fields
//! - `time`: XMLTV timestamps and timezone handling
//! - `cron_helper`: cron expression normalization and next-run calculation

pub mod cron_helper;
pub mod text;
pub mod time;
