use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::utils::time::GuideTimezone;

pub mod defaults;

use defaults::*;

/// Runtime configuration, built once at startup and passed down explicitly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub guide: GuideConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub dummy: DummyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Host name or IP address of the tuner
    #[serde(default = "default_device_host")]
    pub host: String,
    /// Vendor guide endpoint
    #[serde(default = "default_guide_api_url")]
    pub guide_api_url: String,
    /// Upper bound for every device and guide request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Upper bound for the lineup lookup done while serving `dummy=` requests
    #[serde(default = "default_lineup_timeout_secs")]
    pub lineup_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideConfig {
    /// Days of guide data to request from now
    #[serde(default = "default_guide_days")]
    pub days: u32,
    /// Width of each windowed fetch in hours
    #[serde(default = "default_hours_increment")]
    pub hours_increment: u32,
    /// Synopsis length requested from the guide API
    #[serde(default = "default_synopsis_length")]
    pub synopsis_length: u32,
    /// IANA timezone used for XMLTV timestamps; system local time when unset
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_generator_name")]
    pub generator_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Cron expression, classic 5-field or 6-field with seconds.
    /// Times are read in the guide timezone (`guide.timezone`, system local when unset).
    #[serde(default = "default_cron_schedule")]
    pub cron: String,
    /// Generate the guide at startup when no output file exists yet
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DummyConfig {
    #[serde(default = "default_dummy_title")]
    pub title: String,
    /// `{channel}` is replaced with the channel's display name
    #[serde(default = "default_dummy_description")]
    pub description: String,
}

fn default_device_host() -> String {
    DEFAULT_DEVICE_HOST.to_string()
}

fn default_guide_api_url() -> String {
    DEFAULT_GUIDE_API_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_lineup_timeout_secs() -> u64 {
    DEFAULT_LINEUP_TIMEOUT_SECS
}

fn default_guide_days() -> u32 {
    DEFAULT_GUIDE_DAYS
}

fn default_hours_increment() -> u32 {
    DEFAULT_HOURS_INCREMENT
}

fn default_synopsis_length() -> u32 {
    DEFAULT_SYNOPSIS_LENGTH
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_generator_name() -> String {
    DEFAULT_GENERATOR_NAME.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cron_schedule() -> String {
    DEFAULT_CRON_SCHEDULE.to_string()
}

fn default_run_on_startup() -> bool {
    DEFAULT_RUN_ON_STARTUP
}

fn default_dummy_title() -> String {
    DEFAULT_DUMMY_TITLE.to_string()
}

fn default_dummy_description() -> String {
    DEFAULT_DUMMY_DESCRIPTION.to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_device_host(),
            guide_api_url: default_guide_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            lineup_timeout_secs: default_lineup_timeout_secs(),
        }
    }
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            days: default_guide_days(),
            hours_increment: default_hours_increment(),
            synopsis_length: default_synopsis_length(),
            timezone: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            generator_name: default_generator_name(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron_schedule(),
            run_on_startup: default_run_on_startup(),
        }
    }
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            title: default_dummy_title(),
            description: default_dummy_description(),
        }
    }
}

impl DeviceConfig {
    pub fn discover_url(&self) -> String {
        format!("http://{}/discover.json", self.host)
    }

    pub fn lineup_url(&self) -> String {
        format!("http://{}/lineup.json", self.host)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn lineup_timeout(&self) -> Duration {
        Duration::from_secs(self.lineup_timeout_secs)
    }
}

impl GuideConfig {
    /// Resolve the configured timezone name
    pub fn timezone(&self) -> AppResult<GuideTimezone> {
        match self.timezone.as_deref() {
            None | Some("") => Ok(GuideTimezone::Local),
            Some(name) => GuideTimezone::from_name(name),
        }
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> AppResult<Self> {
        let mut config = if std::path::Path::new(config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply the environment variables understood by the container image.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a closure over a map.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HDHOMERUN_HOST") {
            self.device.host = host;
        }
        if let Some(path) = lookup("OUTPUT_FILENAME") {
            self.output.path = PathBuf::from(path);
        }
        if let Some(port) = lookup("WEB_PORT").and_then(|p| p.parse().ok()) {
            self.web.port = port;
        }
        if let Some(cron) = lookup("CRON_SCHEDULE") {
            self.schedule.cron = cron;
        }
        if let Some(title) = lookup("DUMMY_PROGRAM_TITLE") {
            self.dummy.title = title;
        }
        if let Some(description) = lookup("DUMMY_PROGRAM_DESC") {
            self.dummy.description = description;
        }
        if let Some(timezone) = lookup("EPG_TIMEZONE") {
            self.guide.timezone = Some(timezone);
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.guide.hours_increment == 0 {
            return Err(AppError::configuration(
                "guide.hours_increment must be at least 1",
            ));
        }
        if self.guide.days > MAX_GUIDE_DAYS {
            return Err(AppError::configuration(format!(
                "guide.days must be at most {MAX_GUIDE_DAYS}, got {}",
                self.guide.days
            )));
        }
        if self.guide.hours_increment > MAX_GUIDE_DAYS * 24 {
            return Err(AppError::configuration(format!(
                "guide.hours_increment must be at most {}, got {}",
                MAX_GUIDE_DAYS * 24,
                self.guide.hours_increment
            )));
        }
        if self.device.host.trim().is_empty() {
            return Err(AppError::configuration("device.host must not be empty"));
        }
        self.guide.timezone()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_container_image() {
        let config = Config::default();
        assert_eq!(config.device.host, "hdhomerun.local");
        assert_eq!(config.output.path, PathBuf::from("epg.xml"));
        assert_eq!(config.guide.days, 7);
        assert_eq!(config.guide.hours_increment, 3);
        assert_eq!(config.web.port, 8083);
        assert_eq!(config.schedule.cron, "0 3 * * *");
        assert_eq!(config.device.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [device]
            host = "192.168.1.50"

            [guide]
            days = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.device.host, "192.168.1.50");
        assert_eq!(config.device.discover_url(), "http://192.168.1.50/discover.json");
        assert_eq!(config.guide.days, 3);
        assert_eq!(config.guide.hours_increment, 3);
        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.dummy.title, "No Information");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("HDHOMERUN_HOST", "10.0.0.2"),
            ("OUTPUT_FILENAME", "/output/epg.xml"),
            ("WEB_PORT", "9000"),
            ("CRON_SCHEDULE", "0 */6 * * *"),
            ("DUMMY_PROGRAM_TITLE", "Off Air"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.device.host, "10.0.0.2");
        assert_eq!(config.output.path, PathBuf::from("/output/epg.xml"));
        assert_eq!(config.web.port, 9000);
        assert_eq!(config.schedule.cron, "0 */6 * * *");
        assert_eq!(config.dummy.title, "Off Air");
        assert_eq!(config.dummy.description, DEFAULT_DUMMY_DESCRIPTION);
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "WEB_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.web.port, DEFAULT_PORT);
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.guide.hours_increment = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.guide.timezone = Some("Mars/Olympus_Mons".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_guide_range_is_bounded() {
        let mut config = Config::default();
        config.guide.days = MAX_GUIDE_DAYS;
        assert!(config.validate().is_ok());

        config.guide.days = 4_000_000_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("guide.days"));

        let mut config = Config::default();
        config.guide.hours_increment = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_str().unwrap();

        let config = Config::load_from_file(path_str).unwrap();
        assert!(path.exists());

        let reloaded: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.guide.days, config.guide.days);
    }
}
