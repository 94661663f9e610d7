//! Service layer
//!
//! Orchestration that sits between the device source and the on-disk guide.

pub mod epg_export;

pub use epg_export::{EpgExportService, ExportSummary};
