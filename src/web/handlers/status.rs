use axum::{extract::State, response::Json};
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub server: &'static str,
    pub epg_file_exists: bool,
    pub epg_file_size: u64,
    pub epg_last_modified: Option<String>,
    pub hdhomerun_host: String,
    pub update_schedule: String,
    pub server_time: String,
}

/// Server and guide file status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let metadata = tokio::fs::metadata(&state.config.output.path).await.ok();
    let last_modified = metadata
        .as_ref()
        .and_then(|m| m.modified().ok())
        .map(|modified| DateTime::<Local>::from(modified).to_rfc3339());

    Json(StatusResponse {
        server: "running",
        epg_file_exists: metadata.is_some(),
        epg_file_size: metadata.as_ref().map(|m| m.len()).unwrap_or(0),
        epg_last_modified: last_modified,
        hdhomerun_host: state.config.device.host.clone(),
        update_schedule: state.config.schedule.cron.clone(),
        server_time: Local::now().to_rfc3339(),
    })
}
