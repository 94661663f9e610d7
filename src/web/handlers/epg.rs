//! XMLTV guide endpoints (`/epg.xml`, `/xmltv.xml`, `/guide.xml`)

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use std::io::ErrorKind;
use tracing::{debug, info, warn};

use crate::errors::WebError;
use crate::web::AppState;
use crate::xmltv::{inject_dummy_programming, DummySettings, OutputFormat};

pub const XML_CONTENT_TYPE: &str = "application/xml; charset=UTF-8";
pub const GUIDE_CACHE_CONTROL: &str = "public, max-age=1800";

#[derive(Debug, Default, Deserialize)]
pub struct EpgQuery {
    /// `raw`, `plex`, `minimal`; anything else is the standard variant
    pub format: Option<String>,
    /// Placeholder block length, e.g. `true`, `30min`, `2hr`
    pub dummy: Option<String>,
}

/// Serve the guide file, optionally with placeholder programming
pub async fn serve_epg(
    State(state): State<AppState>,
    Query(query): Query<EpgQuery>,
) -> Result<Response, WebError> {
    let path = &state.config.output.path;
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(WebError::not_ready(path.display().to_string()))
        }
        Err(e) => {
            return Err(WebError::internal(format!(
                "Error reading EPG file {}: {}",
                path.display(),
                e
            )))
        }
    };

    let dummy = query
        .dummy
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty());
    let content = match dummy {
        Some(token) => with_dummy_programming(&state, content, token).await,
        None => content,
    };

    let format = query
        .format
        .as_deref()
        .map(|f| f.parse::<OutputFormat>().unwrap_or_default())
        .unwrap_or_default();
    debug!("Serving EPG in {} format", format);
    let body = format.apply(content);

    info!("Served EPG file ({} bytes)", body.len());
    Ok((
        [
            (header::CONTENT_TYPE, XML_CONTENT_TYPE),
            (header::CACHE_CONTROL, GUIDE_CACHE_CONTROL),
        ],
        body,
    )
        .into_response())
}

async fn with_dummy_programming(state: &AppState, content: String, token: &str) -> String {
    let lineup = match state.lineup_source.lineup().await {
        Ok(lineup) => lineup,
        Err(e) => {
            warn!("Could not fetch lineup for dummy programming, serving guide as is: {}", e);
            return content;
        }
    };

    let settings = DummySettings {
        title: state.config.dummy.title.clone(),
        description: state.config.dummy.description.clone(),
        timezone: state.config.guide.timezone().unwrap_or_default(),
    };
    inject_dummy_programming(&content, &lineup, token, &settings, Utc::now())
}
