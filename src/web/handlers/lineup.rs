//! HDHomeRun-compatible `/lineup.json` for apps such as Channels or xTeVe

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::io::ErrorKind;
use tracing::error;

use crate::web::AppState;
use crate::xmltv::lineup_from_document;

pub async fn serve_lineup(State(state): State<AppState>) -> Response {
    let path = &state.config.output.path;
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "EPG data not available yet").into_response()
        }
        Err(e) => {
            error!("Error reading EPG file {}: {}", path.display(), e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error generating lineup").into_response();
        }
    };

    match lineup_from_document(&content, &state.config.device.host) {
        Ok(lineup) => Json(lineup).into_response(),
        Err(e) => {
            error!("Error generating lineup: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error generating lineup").into_response()
        }
    }
}
