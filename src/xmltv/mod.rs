//! XMLTV document model, builder and serve-time transformations

pub mod builder;
pub mod document;
pub mod dummy;
pub mod format;
pub mod lineup;

pub use builder::{build_document, BuildOptions};
pub use document::{ChannelElement, ProgrammeElement, XmltvDocument};
pub use dummy::{inject_dummy_programming, parse_dummy_duration, DummySettings, InjectionSummary};
pub use format::OutputFormat;
pub use lineup::lineup_from_document;
