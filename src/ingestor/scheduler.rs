use anyhow::Result;
use chrono::Utc;
use cron::Schedule;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::ScheduleConfig;
use crate::services::EpgExportService;
use crate::utils::cron_helper::{next_run_after, parse_schedule};
use crate::utils::time::GuideTimezone;

/// Runs the export job on a cron schedule.
///
/// Failed runs are logged and retried only at the next scheduled time.
pub struct SchedulerService {
    export: Arc<EpgExportService>,
    schedule: Schedule,
    expression: String,
    timezone: GuideTimezone,
    run_on_startup: bool,
}

impl SchedulerService {
    pub fn new(export: Arc<EpgExportService>, config: &ScheduleConfig) -> Result<Self> {
        let schedule = parse_schedule(&config.cron)?;
        let timezone = export.timezone()?;
        Ok(Self {
            export,
            schedule,
            expression: config.cron.clone(),
            timezone,
            run_on_startup: config.run_on_startup,
        })
    }

    /// Whether the startup run should happen: enabled and no guide written yet
    pub fn should_run_on_startup(&self) -> bool {
        self.run_on_startup && !self.export.output_path().exists()
    }

    pub async fn start(self) -> Result<()> {
        info!(
            "Starting scheduler service (cron: {}, timezone: {})",
            self.expression, self.timezone
        );

        if self.should_run_on_startup() {
            info!(
                "No guide at {}, generating initial EPG data",
                self.export.output_path().display()
            );
            self.run_once().await;
        }

        loop {
            let now = Utc::now();
            let Some(next) = next_run_after(&self.schedule, now, &self.timezone) else {
                warn!("Cron expression '{}' has no upcoming runs, scheduler stopping", self.expression);
                return Ok(());
            };

            info!("Next EPG update: {}", next.format("%Y-%m-%d %H:%M:%S UTC"));
            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            self.run_once().await;
        }
    }

    async fn run_once(&self) {
        match self.export.run().await {
            Ok(summary) => info!(
                "Scheduled EPG update complete: {} channels, {} programmes written to {}",
                summary.channels,
                summary.programmes,
                summary.path.display()
            ),
            Err(e) => error!("Scheduled EPG update failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::{SourceError, SourceResult};
    use crate::models::{DiscoverResponse, GuideChannel, LineupEntry};
    use crate::sources::GuideSource;
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct OfflineSource;

    #[async_trait]
    impl GuideSource for OfflineSource {
        async fn discover(&self) -> SourceResult<DiscoverResponse> {
            Err(SourceError::transport("http://offline/discover.json", "offline"))
        }

        async fn lineup(&self) -> SourceResult<Vec<LineupEntry>> {
            Err(SourceError::transport("http://offline/lineup.json", "offline"))
        }

        async fn guide(&self, _: &str, _: Option<i64>) -> SourceResult<Option<Vec<GuideChannel>>> {
            Err(SourceError::transport("https://offline/api/guide", "offline"))
        }
    }

    fn export_to(path: std::path::PathBuf) -> Arc<EpgExportService> {
        let mut config = Config::default();
        config.output.path = path;
        Arc::new(EpgExportService::new(Arc::new(config), Arc::new(OfflineSource)))
    }

    #[test]
    fn test_invalid_cron_is_rejected() {
        let config = ScheduleConfig {
            cron: "every night".to_string(),
            run_on_startup: true,
        };
        assert!(SchedulerService::new(export_to("epg.xml".into()), &config).is_err());
    }

    #[test]
    fn test_schedule_follows_guide_timezone() {
        let mut config = Config::default();
        config.guide.timezone = Some("Europe/Berlin".to_string());
        let export = Arc::new(EpgExportService::new(
            Arc::new(config),
            Arc::new(OfflineSource),
        ));

        let scheduler = SchedulerService::new(export, &ScheduleConfig::default()).unwrap();
        assert_eq!(
            scheduler.timezone,
            GuideTimezone::from_name("Europe/Berlin").unwrap()
        );

        // 03:00 CEST
        let after = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let next = next_run_after(&scheduler.schedule, after, &scheduler.timezone).unwrap();
        assert_eq!(next.to_rfc3339(), "2024-07-02T01:00:00+00:00");
    }

    #[test]
    fn test_startup_run_only_without_existing_guide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epg.xml");
        let config = ScheduleConfig::default();

        let scheduler = SchedulerService::new(export_to(path.clone()), &config).unwrap();
        assert!(scheduler.should_run_on_startup());

        std::fs::write(&path, "<tv></tv>").unwrap();
        assert!(!scheduler.should_run_on_startup());

        std::fs::remove_file(&path).unwrap();
        let disabled = ScheduleConfig {
            run_on_startup: false,
            ..ScheduleConfig::default()
        };
        let scheduler = SchedulerService::new(export_to(path), &disabled).unwrap();
        assert!(!scheduler.should_run_on_startup());
    }

    #[tokio::test]
    async fn test_failed_run_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epg.xml");
        let scheduler =
            SchedulerService::new(export_to(path.clone()), &ScheduleConfig::default()).unwrap();

        scheduler.run_once().await;
        assert!(!path.exists());
    }
}
