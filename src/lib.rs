//! HDHomeRun guide to XMLTV
//!
//! Pulls guide data from an HDHomeRun tuner and the vendor's guide API,
//! merges the windowed responses, writes an XMLTV file and serves it over HTTP.

pub mod config;
pub mod errors;
pub mod guide;
pub mod ingestor;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;
pub mod web;
pub mod xmltv;
