//! Index page listing the endpoints and the running configuration

use axum::{extract::State, response::Html};
use quick_xml::escape::escape;

use crate::web::AppState;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let config = &state.config;
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>HDHomeRun EPG Server</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; background: #f5f5f5; }}
        .container {{ max-width: 800px; margin: 0 auto; background: white; padding: 30px; border-radius: 10px; }}
        .endpoint {{ background: #f9f9f9; padding: 15px; margin: 15px 0; border-left: 4px solid #4CAF50; }}
        .endpoint a {{ color: #2196F3; font-family: monospace; }}
        .description {{ color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>HDHomeRun EPG Server</h1>
        <p>XMLTV guide data for HDHomeRun tuners</p>

        <div class="endpoint">
            <h3>EPG Data</h3>
            <a href="/epg.xml">/epg.xml</a> - Standard format (Plex, Jellyfin, Emby)<br>
            <a href="/epg.xml?dummy=1hr">/epg.xml?dummy=1hr</a> - With 1-hour placeholder blocks<br>
            <a href="/epg.xml?dummy=30min">/epg.xml?dummy=30min</a> - With 30-minute placeholder blocks<br>
            <a href="/xmltv.xml">/xmltv.xml</a> and <a href="/guide.xml">/guide.xml</a> - Alternative endpoints
            <p class="description">
                <strong>Parameters:</strong>
                <code>format</code>: raw, plex, minimal.
                <code>dummy</code>: true, 30min, 1hr, 2hr, 3hr, 6hr.
                Combine as <code>?format=raw&amp;dummy=2hr</code>
            </p>
        </div>

        <div class="endpoint">
            <h3>Channel Lineup</h3>
            <a href="/lineup.json">/lineup.json</a>
            <p class="description">HDHomeRun-compatible JSON channel lineup</p>
        </div>

        <div class="endpoint">
            <h3>Server Status</h3>
            <a href="/status">/status</a> and <a href="/health">/health</a>
        </div>

        <div class="endpoint">
            <strong>Configuration:</strong><br>
            HDHomeRun Host: {host}<br>
            Update Schedule: {schedule}<br>
            Port: {port}
        </div>
    </div>
</body>
</html>"#,
        host = escape(config.device.host.as_str()),
        schedule = escape(config.schedule.cron.as_str()),
        port = config.web.port,
    ))
}
