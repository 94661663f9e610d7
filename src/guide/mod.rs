//! Guide reconciliation
//!
//! Turns the baseline guide and its windowed follow-ups into one
//! deduplicated, time-ordered schedule per channel, and classifies
//! programmes for XMLTV numbering.

pub mod classifier;
pub mod merger;

pub use classifier::{is_new_episode, parse_episode_code, EpisodeNumber};
pub use merger::{GuideMerger, MergeStats, MergedGuide};
