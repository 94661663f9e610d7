//! Guide extraction
//!
//! Fetches the baseline guide and then one window per increment, strictly one
//! request at a time, folding every window into a [`GuideMerger`].

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::config::GuideConfig;
use crate::errors::{SourceError, SourceResult};
use crate::guide::{GuideMerger, MergeStats, MergedGuide};
use crate::sources::GuideSource;
use crate::utils::time::from_epoch;

pub mod scheduler;

pub use scheduler::SchedulerService;

/// What an extraction run did, for logging and the export summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Windowed requests issued after the baseline
    pub windows_fetched: usize,
    /// Whether a window came back empty and ended the run early
    pub stopped_early: bool,
    pub merge: MergeStats,
}

/// Start timestamps of the windowed fetches following the baseline.
///
/// Windows begin one increment after `now` and continue while the start lies
/// within `days` of `now`. A range past the representable calendar yields no windows.
pub fn window_starts(now: DateTime<Utc>, days: u32, hours_increment: u32) -> Vec<i64> {
    let increment = Duration::hours(i64::from(hours_increment.max(1)));
    let Some(end) = now.checked_add_signed(Duration::days(i64::from(days))) else {
        return Vec::new();
    };

    let mut starts = Vec::new();
    let mut next = now.checked_add_signed(increment);
    while let Some(start) = next.filter(|start| *start <= end) {
        starts.push(start.timestamp());
        next = start.checked_add_signed(increment);
    }
    starts
}

/// Run the full baseline + windows extraction.
///
/// Any failed request aborts the run and nothing merged so far is returned.
/// A window answered with no data ends the loop and keeps what was merged.
pub async fn extract_guide(
    source: &dyn GuideSource,
    device_auth: &str,
    config: &GuideConfig,
    now: DateTime<Utc>,
) -> SourceResult<(MergedGuide, ExtractionStats)> {
    info!("Fetching baseline guide");
    let baseline = source.guide(device_auth, None).await?.ok_or_else(|| {
        SourceError::malformed("guide", "guide API returned no data for the baseline request")
    })?;
    info!("Baseline guide has {} channels", baseline.len());

    let mut merger = GuideMerger::new(baseline);
    let mut stats = ExtractionStats::default();

    for start in window_starts(now, config.days, config.hours_increment) {
        info!(
            "Processing window from ({}) {}",
            start,
            from_epoch(start).format("%Y-%m-%d %H:%M:%S UTC")
        );

        let Some(window) = source.guide(device_auth, Some(start)).await? else {
            info!("Guide API returned no data from {}, stopping", start);
            stats.stopped_early = true;
            break;
        };
        stats.windows_fetched += 1;

        let window_stats = merger.merge_window(window);
        debug!(
            "Window {}: {} appended, {} kept from baseline",
            start, window_stats.appended, window_stats.duplicates
        );
    }

    stats.merge = merger.stats().clone();
    if !stats.merge.unknown_channels.is_empty() {
        warn!(
            "Dropped {} channels reported by windows but missing from the baseline: {}",
            stats.merge.unknown_channels.len(),
            stats.merge.unknown_channels.join(", ")
        );
    }

    let guide = merger.finish();
    info!(
        "Extraction complete: {} channels, {} programmes from {} windows",
        guide.channel_count(),
        guide.programme_count(),
        stats.windows_fetched
    );
    Ok((guide, stats))
}
