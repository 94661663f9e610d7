//! Guide data sources
//!
//! The extraction pipeline and the web layer talk to the tuner only through
//! [`GuideSource`], so either can be driven by a stub in tests.

pub mod hdhomerun;
pub mod traits;

pub use hdhomerun::HdHomeRunClient;
pub use traits::GuideSource;
