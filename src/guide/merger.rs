use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::models::{GuideChannel, GuideProgram};

/// Counters accumulated while merging windows into the baseline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Window programmes added to a channel
    pub appended: usize,
    /// Window programmes discarded because the channel already had that start time
    pub duplicates: usize,
    /// Programmes discarded for having `end_time <= start_time`
    pub invalid: usize,
    /// Window channels with no baseline counterpart, in the order they were seen
    pub unknown_channels: Vec<String>,
}

impl MergeStats {
    fn absorb(&mut self, other: MergeStats) {
        self.appended += other.appended;
        self.duplicates += other.duplicates;
        self.invalid += other.invalid;
        for id in other.unknown_channels {
            if !self.unknown_channels.contains(&id) {
                self.unknown_channels.push(id);
            }
        }
    }
}

struct ChannelSlot {
    channel: GuideChannel,
    programmes: BTreeMap<i64, GuideProgram>,
}

/// Accumulates windowed guide fetches on top of a baseline.
///
/// The baseline enumerates the channels. Window channels that the baseline
/// does not know are dropped. Within a channel the start time is the key:
/// whichever programme claimed a start time first keeps it, so the baseline
/// always wins ties.
pub struct GuideMerger {
    slots: Vec<ChannelSlot>,
    index: HashMap<String, usize>,
    stats: MergeStats,
}

impl GuideMerger {
    pub fn new(baseline: Vec<GuideChannel>) -> Self {
        let mut merger = Self {
            slots: Vec::with_capacity(baseline.len()),
            index: HashMap::with_capacity(baseline.len()),
            stats: MergeStats::default(),
        };

        for mut channel in baseline {
            let programmes = std::mem::take(&mut channel.guide);
            let slot = match merger.index.get(&channel.guide_number) {
                Some(&slot) => slot,
                None => {
                    merger
                        .index
                        .insert(channel.guide_number.clone(), merger.slots.len());
                    merger.slots.push(ChannelSlot {
                        channel,
                        programmes: BTreeMap::new(),
                    });
                    merger.slots.len() - 1
                }
            };

            for programme in programmes {
                if programme.duration_secs() <= 0 {
                    merger.stats.invalid += 1;
                    continue;
                }
                merger.slots[slot]
                    .programmes
                    .entry(programme.start_time)
                    .or_insert(programme);
            }
        }

        merger
    }

    /// Merge one window's result and return what this window contributed
    pub fn merge_window(&mut self, window: Vec<GuideChannel>) -> MergeStats {
        let mut stats = MergeStats::default();

        for channel in window {
            let Some(&slot) = self.index.get(&channel.guide_number) else {
                warn!(
                    "Dropping channel {} ({}) from window: not present in baseline guide",
                    channel.guide_number,
                    channel.label()
                );
                if !stats.unknown_channels.contains(&channel.guide_number) {
                    stats.unknown_channels.push(channel.guide_number);
                }
                continue;
            };

            let label = channel.label().to_string();
            let programmes = &mut self.slots[slot].programmes;
            for programme in channel.guide {
                if programme.duration_secs() <= 0 {
                    stats.invalid += 1;
                    continue;
                }
                if programmes.contains_key(&programme.start_time) {
                    stats.duplicates += 1;
                    continue;
                }
                debug!(
                    "Appending '{}' at {} to channel {} ({})",
                    programme.title, programme.start_time, channel.guide_number, label
                );
                programmes.insert(programme.start_time, programme);
                stats.appended += 1;
            }
        }

        self.stats.absorb(stats.clone());
        stats
    }

    /// Totals across every window merged so far
    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }

    pub fn finish(self) -> MergedGuide {
        let channels = self
            .slots
            .into_iter()
            .map(|slot| {
                let mut channel = slot.channel;
                channel.guide = slot.programmes.into_values().collect();
                channel
            })
            .collect();
        MergedGuide { channels }
    }
}

/// Final per-channel schedules, in baseline channel order, each sorted by start time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedGuide {
    channels: Vec<GuideChannel>,
}

impl MergedGuide {
    pub fn channels(&self) -> &[GuideChannel] {
        &self.channels
    }

    pub fn channel(&self, guide_number: &str) -> Option<&GuideChannel> {
        self.channels
            .iter()
            .find(|channel| channel.guide_number == guide_number)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn programme_count(&self) -> usize {
        self.channels.iter().map(|channel| channel.guide.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn programme(start: i64, title: &str) -> GuideProgram {
        GuideProgram {
            start_time: start,
            end_time: start + 1800,
            title: title.to_string(),
            synopsis: None,
            episode_title: None,
            image_url: None,
            episode_number: None,
            original_airdate: None,
            filter: Vec::new(),
        }
    }

    fn channel(id: &str, programmes: Vec<GuideProgram>) -> GuideChannel {
        GuideChannel {
            guide_number: id.to_string(),
            guide_name: format!("Channel {id}"),
            affiliate: None,
            image_url: None,
            guide: programmes,
        }
    }

    fn starts(guide: &MergedGuide, id: &str) -> Vec<i64> {
        guide
            .channel(id)
            .unwrap()
            .guide
            .iter()
            .map(|p| p.start_time)
            .collect()
    }

    #[test]
    fn test_baseline_wins_on_equal_start() {
        let mut merger = GuideMerger::new(vec![channel("C1", vec![programme(1000, "Baseline")])]);
        let stats = merger.merge_window(vec![channel(
            "C1",
            vec![programme(1000, "Window"), programme(5000, "Later")],
        )]);

        assert_eq!(stats.appended, 1);
        assert_eq!(stats.duplicates, 1);

        let merged = merger.finish();
        let c1 = &merged.channel("C1").unwrap().guide;
        assert_eq!(c1.len(), 2);
        assert_eq!(c1[0].start_time, 1000);
        assert_eq!(c1[0].title, "Baseline");
        assert_eq!(c1[1].start_time, 5000);
        assert_eq!(c1[1].title, "Later");
    }

    #[test]
    fn test_window_order_does_not_affect_result() {
        let baseline = vec![
            channel("C1", vec![programme(1000, "A")]),
            channel("C2", vec![programme(1000, "B")]),
        ];
        let window_a = vec![
            channel("C1", vec![programme(20_000, "A2"), programme(10_000, "A1")]),
            channel("C2", vec![programme(10_000, "B1")]),
        ];
        let window_b = vec![
            channel("C2", vec![programme(40_000, "B3"), programme(30_000, "B2")]),
            channel("C1", vec![programme(30_000, "A3")]),
        ];

        let mut forward = GuideMerger::new(baseline.clone());
        forward.merge_window(window_a.clone());
        forward.merge_window(window_b.clone());

        let mut reverse = GuideMerger::new(baseline);
        reverse.merge_window(window_b);
        reverse.merge_window(window_a);

        let forward = forward.finish();
        let reverse = reverse.finish();
        assert_eq!(forward, reverse);
        assert_eq!(starts(&forward, "C1"), vec![1000, 10_000, 20_000, 30_000]);
        assert_eq!(starts(&forward, "C2"), vec![1000, 10_000, 30_000, 40_000]);
    }

    #[test]
    fn test_unknown_window_channel_is_dropped() {
        let mut merger = GuideMerger::new(vec![channel("C1", vec![programme(1000, "A")])]);
        let stats = merger.merge_window(vec![
            channel("C9", vec![programme(2000, "Orphan")]),
            channel("C1", vec![programme(2000, "B")]),
        ]);

        assert_eq!(stats.unknown_channels, vec!["C9".to_string()]);
        assert_eq!(stats.appended, 1);

        let merged = merger.finish();
        assert_eq!(merged.channel_count(), 1);
        assert!(merged.channel("C9").is_none());
        assert_eq!(merged.programme_count(), 2);
    }

    #[test]
    fn test_baseline_order_and_unsorted_input() {
        let merger = GuideMerger::new(vec![
            channel("9.1", vec![programme(3000, "C"), programme(1000, "A"), programme(2000, "B")]),
            channel("2.1", vec![]),
        ]);
        let merged = merger.finish();

        let ids: Vec<&str> = merged
            .channels()
            .iter()
            .map(|c| c.guide_number.as_str())
            .collect();
        assert_eq!(ids, vec!["9.1", "2.1"]);
        assert_eq!(starts(&merged, "9.1"), vec![1000, 2000, 3000]);
        assert!(merged.channel("2.1").unwrap().guide.is_empty());
    }

    #[test]
    fn test_invalid_intervals_are_skipped() {
        let mut broken = programme(1000, "Broken");
        broken.end_time = 1000;

        let mut merger = GuideMerger::new(vec![channel("C1", vec![broken.clone()])]);
        let mut window_broken = broken;
        window_broken.start_time = 4000;
        window_broken.end_time = 3000;
        merger.merge_window(vec![channel("C1", vec![window_broken])]);

        assert_eq!(merger.stats().invalid, 2);
        assert_eq!(merger.finish().programme_count(), 0);
    }

    #[test]
    fn test_stats_accumulate_across_windows() {
        let mut merger = GuideMerger::new(vec![channel("C1", vec![programme(1000, "A")])]);
        merger.merge_window(vec![channel("C1", vec![programme(2000, "B")])]);
        merger.merge_window(vec![
            channel("C1", vec![programme(2000, "B again"), programme(3000, "C")]),
            channel("X", vec![]),
        ]);

        let stats = merger.stats();
        assert_eq!(stats.appended, 2);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.unknown_channels, vec!["X".to_string()]);
    }
}
