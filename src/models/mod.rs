//! Wire models for the HDHomeRun device and guide API
//!
//! Field names follow the vendor's PascalCase JSON. Optional fields are
//! genuinely absent in real responses, so every one of them is `Option`.

use serde::{Deserialize, Serialize};

/// `GET /discover.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiscoverResponse {
    pub device_auth: String,
    #[serde(default, rename = "DeviceID")]
    pub device_id: Option<String>,
    #[serde(default)]
    pub friendly_name: Option<String>,
}

/// One entry of `GET /lineup.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineupEntry {
    pub guide_number: String,
    #[serde(default)]
    pub guide_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate: Option<String>,
    #[serde(default, rename = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One channel of a guide response, carrying the programmes of one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GuideChannel {
    pub guide_number: String,
    #[serde(default)]
    pub guide_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate: Option<String>,
    #[serde(default, rename = "ImageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub guide: Vec<GuideProgram>,
}

/// A single programme as reported by the guide API
///
/// Times are epoch seconds; the interval is `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GuideProgram {
    pub start_time: i64,
    pub end_time: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_title: Option<String>,
    #[serde(default, rename = "ImageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_airdate: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<String>,
}

impl GuideChannel {
    /// Name used when logging merge progress; the affiliate wins when present
    pub fn label(&self) -> &str {
        self.affiliate.as_deref().unwrap_or(&self.guide_name)
    }
}

impl GuideProgram {
    pub fn duration_secs(&self) -> i64 {
        self.end_time - self.start_time
    }
}
