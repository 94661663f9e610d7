//! Configuration default values
//!
//! This module contains all the default values for configuration options,
//! making them easily changeable in one central location.

// Device defaults
pub const DEFAULT_DEVICE_HOST: &str = "hdhomerun.local";
pub const DEFAULT_GUIDE_API_URL: &str = "https://api.hdhomerun.com/api/guide";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LINEUP_TIMEOUT_SECS: u64 = 5;

// Guide extraction defaults
pub const DEFAULT_GUIDE_DAYS: u32 = 7;
pub const DEFAULT_HOURS_INCREMENT: u32 = 3;
pub const DEFAULT_SYNOPSIS_LENGTH: u32 = 160;
/// The guide API serves about two weeks ahead
pub const MAX_GUIDE_DAYS: u32 = 14;

// Output defaults
pub const DEFAULT_OUTPUT_PATH: &str = "epg.xml";
pub const DEFAULT_GENERATOR_NAME: &str = "HDHomeRun";

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8083;

// Schedule defaults
pub const DEFAULT_CRON_SCHEDULE: &str = "0 3 * * *";
pub const DEFAULT_RUN_ON_STARTUP: bool = true;

// Dummy programming defaults
pub const DEFAULT_DUMMY_TITLE: &str = "No Information";
pub const DEFAULT_DUMMY_DESCRIPTION: &str =
    "No program information is currently available for {channel}.";
