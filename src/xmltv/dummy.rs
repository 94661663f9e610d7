//! Placeholder programming for channels without guide data
//!
//! Injection only ever adds elements: missing lineup channels go to the end
//! of the channel section and placeholder programmes to the end of the
//! programme section. Existing elements are carried over byte for byte.

use chrono::{DateTime, Duration, Utc};
use quick_xml::escape::escape;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::{debug, error, info};

use super::document::{ChannelElement, ProgrammeElement, XmltvDocument};
use crate::errors::DocumentResult;
use crate::models::LineupEntry;
use crate::utils::time::GuideTimezone;

/// Length of the placeholder schedule from local midnight
pub const DUMMY_SCHEDULE_DAYS: i64 = 7;

const DEFAULT_BLOCK_MINUTES: i64 = 60;
const MIN_BLOCK_SECS: f64 = 5.0 * 60.0;
const MAX_BLOCK_SECS: f64 = 12.0 * 60.0 * 60.0;

/// Placeholder text and the zone used for timestamps
#[derive(Debug, Clone)]
pub struct DummySettings {
    pub title: String,
    /// `{channel}` is replaced with the channel's display name
    pub description: String,
    pub timezone: GuideTimezone,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionSummary {
    pub channels_added: usize,
    pub channels_filled: usize,
    pub programmes_added: usize,
}

fn duration_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+)?)(hr|hours?|min|mins|minutes?)?").expect("static regex")
    })
}

/// Block length for a `dummy=` token.
///
/// `true`, `1` and `yes` mean one hour. Otherwise a leading number with an
/// optional `min`/`hr` style unit, hours when the unit is missing, clamped to
/// 5 minutes..12 hours. Anything unrecognised falls back to one hour.
pub fn parse_dummy_duration(token: &str) -> Duration {
    let token = token.trim().to_ascii_lowercase();
    if matches!(token.as_str(), "true" | "1" | "yes") {
        return Duration::minutes(DEFAULT_BLOCK_MINUTES);
    }

    let Some(captures) = duration_regex().captures(&token) else {
        return Duration::minutes(DEFAULT_BLOCK_MINUTES);
    };
    let Ok(value) = captures[1].parse::<f64>() else {
        return Duration::minutes(DEFAULT_BLOCK_MINUTES);
    };

    let seconds = match captures.get(2) {
        Some(unit) if unit.as_str().starts_with("min") => value * 60.0,
        _ => value * 3600.0,
    };
    Duration::seconds(seconds.clamp(MIN_BLOCK_SECS, MAX_BLOCK_SECS).round() as i64)
}

/// Add missing lineup channels and placeholder programmes to serialized XMLTV.
///
/// Never fails: if anything goes wrong the input is returned unchanged.
pub fn inject_dummy_programming(
    xml: &str,
    lineup: &[LineupEntry],
    duration_token: &str,
    settings: &DummySettings,
    now: DateTime<Utc>,
) -> String {
    match try_inject_dummy_programming(xml, lineup, duration_token, settings, now) {
        Ok((injected, _)) => injected,
        Err(e) => {
            error!("Error adding dummy programming, serving original guide: {}", e);
            xml.to_string()
        }
    }
}

/// Fallible form of [`inject_dummy_programming`]
pub fn try_inject_dummy_programming(
    xml: &str,
    lineup: &[LineupEntry],
    duration_token: &str,
    settings: &DummySettings,
    now: DateTime<Utc>,
) -> DocumentResult<(String, InjectionSummary)> {
    let mut doc = XmltvDocument::parse(xml)?;
    let block = parse_dummy_duration(duration_token);
    let summary = inject_into(&mut doc, lineup, block, settings, now);

    if summary == InjectionSummary::default() {
        debug!("Every channel already has programming, nothing to inject");
        return Ok((xml.to_string(), summary));
    }

    info!(
        "Added {} channel definitions and {} minute dummy programming for {} channels ({} programmes)",
        summary.channels_added,
        block.num_minutes(),
        summary.channels_filled,
        summary.programmes_added
    );
    Ok((doc.to_xml(), summary))
}

/// Apply injection to an already parsed document
pub fn inject_into(
    doc: &mut XmltvDocument,
    lineup: &[LineupEntry],
    block: Duration,
    settings: &DummySettings,
    now: DateTime<Utc>,
) -> InjectionSummary {
    let mut summary = InjectionSummary::default();

    let with_programmes: HashSet<String> = doc
        .programmes()
        .iter()
        .map(|p| p.channel().to_string())
        .collect();
    let mut known: HashSet<String> = doc.channels().iter().map(|c| c.id().to_string()).collect();

    for entry in lineup {
        if entry.guide_number.is_empty() || known.contains(&entry.guide_number) {
            continue;
        }
        let name = if entry.guide_name.is_empty() {
            &entry.guide_number
        } else {
            &entry.guide_name
        };
        doc.push_channel(ChannelElement::new(&entry.guide_number, name, None));
        known.insert(entry.guide_number.clone());
        summary.channels_added += 1;
    }

    let lineup_names: HashMap<&str, &str> = lineup
        .iter()
        .filter(|entry| !entry.guide_name.is_empty())
        .map(|entry| (entry.guide_number.as_str(), entry.guide_name.as_str()))
        .collect();

    let empty: Vec<(String, String)> = doc
        .channels()
        .iter()
        .filter(|channel| !with_programmes.contains(channel.id()))
        .map(|channel| {
            let name = lineup_names
                .get(channel.id())
                .copied()
                .or_else(|| channel.display_name().filter(|name| !name.is_empty()))
                .unwrap_or(channel.id());
            (channel.id().to_string(), name.to_string())
        })
        .collect();

    let start = settings.timezone.start_of_day(now);
    let end = start + Duration::days(DUMMY_SCHEDULE_DAYS);
    let title = escape(settings.title.as_str()).into_owned();

    for (id, name) in empty {
        let description = settings.description.replace("{channel}", &name);
        let inner = format!(
            "<title lang=\"en\">{}</title><desc lang=\"en\">{}</desc>",
            title,
            escape(description.as_str())
        );

        let mut current = start;
        while current < end {
            let next = (current + block).min(end);
            doc.push_programme(ProgrammeElement::from_parts(
                &id,
                &settings.timezone.format_xmltv(current),
                &settings.timezone.format_xmltv(next),
                &inner,
            ));
            summary.programmes_added += 1;
            current = next;
        }
        debug!("Filled channel {} ({}) with placeholder programming", id, name);
        summary.channels_filled += 1;
    }

    summary
}
