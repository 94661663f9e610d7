use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::errors::EpisodeCodeError;
use crate::utils::time::utc_date;

/// Zero-based season/episode pair for the `xmltv_ns` numbering system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeNumber {
    pub season: u32,
    pub episode: u32,
}

impl EpisodeNumber {
    /// `season.episode.part` with the part always zero
    pub fn xmltv_ns(&self) -> String {
        format!("{}.{}.0", self.season, self.episode)
    }
}

fn episode_code_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)^\s*S(\d+)\s*E(\d+)\s*$").expect("static regex"))
}

/// Whether a programme counts as a new episode.
///
/// No airdate means never new. Otherwise the airdate's UTC calendar day must be
/// on or after the day before `reference`; the vendor only tracks airdates per
/// day and the guide servers can lag a day behind.
pub fn is_new_episode(original_airdate: Option<i64>, reference: DateTime<Utc>) -> bool {
    match original_airdate {
        None => false,
        Some(airdate) => {
            let cutoff = (reference - Duration::days(1)).date_naive();
            utc_date(airdate) >= cutoff
        }
    }
}

/// Translate a vendor `S<n>E<m>` code into zero-based XMLTV numbering
pub fn parse_episode_code(code: &str) -> Result<EpisodeNumber, EpisodeCodeError> {
    let unparseable = || EpisodeCodeError::Unparseable {
        code: code.to_string(),
    };

    let captures = episode_code_regex().captures(code).ok_or_else(unparseable)?;
    let season: u32 = captures[1].parse().map_err(|_| unparseable())?;
    let episode: u32 = captures[2].parse().map_err(|_| unparseable())?;

    // xmltv_ns has no representation for season or episode zero
    Ok(EpisodeNumber {
        season: season.checked_sub(1).ok_or_else(unparseable)?,
        episode: episode.checked_sub(1).ok_or_else(unparseable)?,
    })
}
