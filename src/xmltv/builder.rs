//! Projection of a merged guide onto XMLTV

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::document::{ChannelElement, ProgrammeElement, XmltvDocument};
use crate::guide::{is_new_episode, parse_episode_code, MergedGuide};
use crate::models::{GuideProgram, LineupEntry};
use crate::utils::text::clean_text;
use crate::utils::time::{format_airdate, GuideTimezone};

/// Document-level settings for a build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub generator_name: String,
    /// Device URL advertised as `generator-info-url`
    pub generator_url: Option<String>,
    pub timezone: GuideTimezone,
}

/// Build an XMLTV document from a merged guide.
///
/// Channels keep the guide's order. The display name comes from the lineup
/// when it lists the channel, else from the guide. Programmes follow their
/// channel's order. `now` is the reference for new/repeat classification.
pub fn build_document(
    guide: &MergedGuide,
    lineup: &[LineupEntry],
    options: &BuildOptions,
    now: DateTime<Utc>,
) -> XmltvDocument {
    let lineup_names: HashMap<&str, &str> = lineup
        .iter()
        .map(|entry| (entry.guide_number.as_str(), entry.guide_name.as_str()))
        .collect();

    let mut doc = XmltvDocument::new(&options.generator_name, options.generator_url.as_deref());

    for channel in guide.channels() {
        let name = lineup_names
            .get(channel.guide_number.as_str())
            .copied()
            .unwrap_or(&channel.guide_name);
        doc.push_channel(ChannelElement::new(
            &channel.guide_number,
            name,
            channel.image_url.as_deref(),
        ));
    }

    for channel in guide.channels() {
        debug!(
            "Adding {} programmes for channel {} ({})",
            channel.guide.len(),
            channel.guide_number,
            channel.label()
        );
        for program in &channel.guide {
            doc.push_programme(build_programme(
                &channel.guide_number,
                program,
                options.timezone,
                now,
            ));
        }
    }

    doc
}

/// Render one programme in XMLTV DTD child order
pub fn build_programme(
    channel_id: &str,
    program: &GuideProgram,
    timezone: GuideTimezone,
    now: DateTime<Utc>,
) -> ProgrammeElement {
    let mut inner = String::new();

    inner.push_str(&format!("<title lang=\"en\">{}</title>", escape(program.title.as_str())));

    if let Some(episode_title) = &program.episode_title {
        inner.push_str(&format!(
            "<sub-title lang=\"en\">{}</sub-title>",
            escape(episode_title.as_str())
        ));
    }

    if let Some(synopsis) = &program.synopsis {
        let cleaned = clean_text(synopsis);
        inner.push_str(&format!("<desc lang=\"en\">{}</desc>", escape(cleaned.as_str())));
    }

    for category in &program.filter {
        inner.push_str(&format!(
            "<category lang=\"en\">{}</category>",
            escape(category.as_str())
        ));
    }

    if let Some(image) = &program.image_url {
        inner.push_str(&format!("<icon src=\"{}\" />", escape(image.as_str())));
    }

    if let Some(code) = &program.episode_number {
        match parse_episode_code(code) {
            Ok(number) => {
                inner.push_str(&format!(
                    "<episode-num system=\"xmltv_ns\">{}</episode-num>",
                    number.xmltv_ns()
                ));
            }
            Err(e) => warn!(
                "Channel {} '{}' at {}: {}",
                channel_id, program.title, program.start_time, e
            ),
        }
        inner.push_str(&format!(
            "<episode-num system=\"onscreen\">{}</episode-num>",
            escape(code.as_str())
        ));

        match program.original_airdate {
            Some(airdate) if is_new_episode(Some(airdate), now) => inner.push_str("<new />"),
            Some(airdate) => {
                inner.push_str(&format!(
                    "<previously-shown start=\"{}\" />",
                    format_airdate(airdate)
                ));
            }
            // No airdate: treated as aired before the epoch
            None => inner.push_str("<previously-shown />"),
        }
    }

    ProgrammeElement::from_parts(
        channel_id,
        &timezone.format_epoch(program.start_time),
        &timezone.format_epoch(program.end_time),
        &inner,
    )
}
