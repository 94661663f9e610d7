#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use hdhomerun_epg::errors::{SourceError, SourceResult};
use hdhomerun_epg::models::{DiscoverResponse, GuideChannel, GuideProgram, LineupEntry};
use hdhomerun_epg::sources::GuideSource;

/// In-memory tuner: canned lineup, baseline and windows keyed by start time
#[derive(Default)]
pub struct StubSource {
    /// `None` makes the lineup request fail
    pub lineup: Option<Vec<LineupEntry>>,
    pub baseline: Vec<GuideChannel>,
    /// Missing windows answer with an empty channel list; `None` answers JSON null
    pub windows: HashMap<i64, Option<Vec<GuideChannel>>>,
    /// Window start that answers with HTTP 500
    pub fail_at: Option<i64>,
    pub requests: Mutex<Vec<Option<i64>>>,
}

#[async_trait]
impl GuideSource for StubSource {
    async fn discover(&self) -> SourceResult<DiscoverResponse> {
        Ok(DiscoverResponse {
            device_auth: "stub-auth".to_string(),
            device_id: Some("1050ABCD".to_string()),
            friendly_name: Some("HDHomeRun FLEX 4K".to_string()),
        })
    }

    async fn lineup(&self) -> SourceResult<Vec<LineupEntry>> {
        self.lineup
            .clone()
            .ok_or_else(|| SourceError::transport("http://stub/lineup.json", "connection refused"))
    }

    async fn guide(
        &self,
        device_auth: &str,
        start: Option<i64>,
    ) -> SourceResult<Option<Vec<GuideChannel>>> {
        assert_eq!(device_auth, "stub-auth");
        self.requests.lock().unwrap().push(start);
        match start {
            None => Ok(Some(self.baseline.clone())),
            Some(ts) if Some(ts) == self.fail_at => {
                Err(SourceError::http("https://api.hdhomerun.com/api/guide", 500))
            }
            Some(ts) => Ok(self.windows.get(&ts).cloned().unwrap_or(Some(Vec::new()))),
        }
    }
}

pub fn programme(start: i64, minutes: i64, title: &str) -> GuideProgram {
    GuideProgram {
        start_time: start,
        end_time: start + minutes * 60,
        title: title.to_string(),
        synopsis: None,
        episode_title: None,
        image_url: None,
        episode_number: None,
        original_airdate: None,
        filter: Vec::new(),
    }
}

pub fn channel(id: &str, name: &str, programmes: Vec<GuideProgram>) -> GuideChannel {
    GuideChannel {
        guide_number: id.to_string(),
        guide_name: name.to_string(),
        affiliate: None,
        image_url: None,
        guide: programmes,
    }
}

pub fn lineup_entry(id: &str, name: &str) -> LineupEntry {
    LineupEntry {
        guide_number: id.to_string(),
        guide_name: name.to_string(),
        affiliate: None,
        url: Some(format!("http://10.0.0.2:5004/auto/v{id}")),
    }
}
