//! EPG export job
//!
//! Discover → lineup → windowed extraction → XMLTV build → atomic write.
//! The guide file is replaced only after the whole run succeeded.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::{AppResult, DocumentError, DocumentResult};
use crate::ingestor::{extract_guide, ExtractionStats};
use crate::sources::GuideSource;
use crate::utils::time::GuideTimezone;
use crate::xmltv::{build_document, BuildOptions};

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub channels: usize,
    pub programmes: usize,
    pub path: PathBuf,
    pub bytes: usize,
    pub extraction: ExtractionStats,
}

pub struct EpgExportService {
    config: Arc<Config>,
    source: Arc<dyn GuideSource>,
}

impl EpgExportService {
    pub fn new(config: Arc<Config>, source: Arc<dyn GuideSource>) -> Self {
        Self { config, source }
    }

    pub fn output_path(&self) -> &Path {
        &self.config.output.path
    }

    /// Zone the guide is rendered in; the update schedule uses it too
    pub fn timezone(&self) -> AppResult<GuideTimezone> {
        self.config.guide.timezone()
    }

    pub async fn run(&self) -> AppResult<ExportSummary> {
        self.run_at(Utc::now()).await
    }

    /// Run the export with an explicit reference time
    pub async fn run_at(&self, now: DateTime<Utc>) -> AppResult<ExportSummary> {
        info!("HDHomeRun EPG extraction started ({})", self.config.device.host);
        let timezone = self.config.guide.timezone()?;

        let device = self.source.discover().await?;
        debug!(
            "Discovered device {} ({})",
            device.device_id.as_deref().unwrap_or("unknown"),
            device.friendly_name.as_deref().unwrap_or("unnamed")
        );

        let lineup = self.source.lineup().await?;
        debug!("Lineup lists {} channels", lineup.len());

        let (guide, extraction) =
            extract_guide(self.source.as_ref(), &device.device_auth, &self.config.guide, now)
                .await?;

        let options = BuildOptions {
            generator_name: self.config.output.generator_name.clone(),
            generator_url: Some(self.config.device.discover_url()),
            timezone,
        };
        let xml = build_document(&guide, &lineup, &options, now).to_xml();

        let path = self.config.output.path.clone();
        write_atomically(&path, xml.as_bytes()).await?;
        info!("Wrote {} bytes of XMLTV to {}", xml.len(), path.display());

        Ok(ExportSummary {
            channels: guide.channel_count(),
            programmes: guide.programme_count(),
            path,
            bytes: xml.len(),
            extraction,
        })
    }
}

/// Write to a sibling temp file, then rename over the target
async fn write_atomically(path: &Path, contents: &[u8]) -> DocumentResult<()> {
    let write_error =
        |e: std::io::Error| DocumentError::write(format!("{}: {}", path.display(), e));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let mut temp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "epg.xml".into());
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    tokio::fs::write(&temp_path, contents)
        .await
        .map_err(write_error)?;
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(write_error(e));
    }
    Ok(())
}
