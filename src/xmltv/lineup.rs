//! HDHomeRun-style lineup derived from a guide document

use crate::errors::DocumentResult;
use crate::models::LineupEntry;

use super::document::XmltvDocument;

/// Streaming port of the tuner's HTTP interface
pub const TUNER_STREAM_PORT: u16 = 5004;

/// One lineup entry per channel that has a display name
pub fn lineup_from_document(xml: &str, device_host: &str) -> DocumentResult<Vec<LineupEntry>> {
    let doc = XmltvDocument::parse(xml)?;

    Ok(doc
        .channels()
        .iter()
        .filter_map(|channel| {
            channel.display_name().map(|name| LineupEntry {
                guide_number: channel.id().to_string(),
                guide_name: name.to_string(),
                affiliate: None,
                url: Some(format!(
                    "http://{}:{}/auto/v{}",
                    device_host,
                    TUNER_STREAM_PORT,
                    channel.id()
                )),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineup_from_document() {
        let xml = r#"<tv>
            <channel id="2.1"><display-name lang="en">KTVU</display-name></channel>
            <channel id="4.1"><icon src="x"/></channel>
            <channel id="7.1"><display-name>KGO</display-name></channel>
        </tv>"#;

        let lineup = lineup_from_document(xml, "10.0.0.2").unwrap();
        assert_eq!(lineup.len(), 2);
        assert_eq!(lineup[0].guide_number, "2.1");
        assert_eq!(lineup[0].guide_name, "KTVU");
        assert_eq!(lineup[0].url.as_deref(), Some("http://10.0.0.2:5004/auto/v2.1"));
        assert_eq!(lineup[1].guide_number, "7.1");

        let json = serde_json::to_value(&lineup[1]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "GuideNumber": "7.1",
                "GuideName": "KGO",
                "URL": "http://10.0.0.2:5004/auto/v7.1"
            })
        );
    }

    #[test]
    fn test_invalid_document() {
        assert!(lineup_from_document("<tv>", "host").is_err());
    }
}
