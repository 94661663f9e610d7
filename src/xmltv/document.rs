//! Ordered-section XMLTV document
//!
//! A document is a prolog, the root element, a channel section and a
//! programme section. Elements read from existing XML keep their exact source
//! text, so re-serializing a parsed document never alters them. New elements
//! are rendered once when they are added.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::{DocumentError, DocumentResult};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const XMLTV_DOCTYPE: &str = r#"<!DOCTYPE tv SYSTEM "xmltv.dtd">"#;

/// A `<channel>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelElement {
    id: String,
    display_names: Vec<String>,
    raw: String,
}

impl ChannelElement {
    /// Render a new channel with one English display name and an optional icon
    pub fn new(id: &str, display_name: &str, icon: Option<&str>) -> Self {
        let mut raw = String::new();
        raw.push_str(&format!("<channel id=\"{}\">", escape(id)));
        raw.push_str(&format!(
            "<display-name lang=\"en\">{}</display-name>",
            escape(display_name)
        ));
        if let Some(src) = icon {
            raw.push_str(&format!("<icon src=\"{}\" />", escape(src)));
        }
        raw.push_str("</channel>");

        Self {
            id: id.to_string(),
            display_names: vec![display_name.to_string()],
            raw,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// First display name, if the element has any
    pub fn display_name(&self) -> Option<&str> {
        self.display_names.first().map(String::as_str)
    }

    /// Exact XML text of the element
    pub fn as_xml(&self) -> &str {
        &self.raw
    }
}

/// A `<programme>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammeElement {
    channel: String,
    start: String,
    stop: String,
    raw: String,
}

impl ProgrammeElement {
    /// Wrap pre-rendered inner content in a `<programme>` tag
    pub(crate) fn from_parts(channel: &str, start: &str, stop: &str, inner: &str) -> Self {
        let raw = format!(
            "<programme channel=\"{}\" start=\"{}\" stop=\"{}\">{}</programme>",
            escape(channel),
            escape(start),
            escape(stop),
            inner
        );
        Self {
            channel: channel.to_string(),
            start: start.to_string(),
            stop: stop.to_string(),
            raw,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn stop(&self) -> &str {
        &self.stop
    }

    pub fn as_xml(&self) -> &str {
        &self.raw
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmltvDocument {
    prolog: String,
    root_open: String,
    root_close: String,
    channels: Vec<ChannelElement>,
    programmes: Vec<ProgrammeElement>,
    /// Root children other than channels and programmes, kept verbatim after the programmes
    others: Vec<String>,
    epilogue: String,
}

impl XmltvDocument {
    /// Empty document with the standard declaration and doctype
    pub fn new(generator_name: &str, generator_url: Option<&str>) -> Self {
        let mut root_open = format!("<tv generator-info-name=\"{}\"", escape(generator_name));
        if let Some(url) = generator_url {
            root_open.push_str(&format!(" generator-info-url=\"{}\"", escape(url)));
        }
        root_open.push('>');

        Self {
            prolog: format!("{XML_DECLARATION}\n{XMLTV_DOCTYPE}\n"),
            root_open,
            root_close: "</tv>".to_string(),
            channels: Vec::new(),
            programmes: Vec::new(),
            others: Vec::new(),
            epilogue: "\n".to_string(),
        }
    }

    pub fn channels(&self) -> &[ChannelElement] {
        &self.channels
    }

    pub fn programmes(&self) -> &[ProgrammeElement] {
        &self.programmes
    }

    pub fn channel(&self, id: &str) -> Option<&ChannelElement> {
        self.channels.iter().find(|channel| channel.id == id)
    }

    /// Append to the channel section; the section always precedes every programme
    pub fn push_channel(&mut self, channel: ChannelElement) {
        self.channels.push(channel);
    }

    pub fn push_programme(&mut self, programme: ProgrammeElement) {
        self.programmes.push(programme);
    }

    /// Parse existing XMLTV text, keeping the exact text of every root child
    pub fn parse(content: &str) -> DocumentResult<Self> {
        let mut reader = Reader::from_str(content);

        let mut doc = Self {
            prolog: String::new(),
            root_open: String::new(),
            root_close: String::new(),
            channels: Vec::new(),
            programmes: Vec::new(),
            others: Vec::new(),
            epilogue: String::new(),
        };

        let mut depth = 0usize;
        let mut root_name: Option<String> = None;
        let mut root_end = None;
        let mut pending: Option<PendingElement> = None;
        let mut capture_display_name = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| parse_error(&reader, e))?;
            let end = reader.buffer_position() as usize;

            match event {
                Event::Start(ref e) => {
                    let name = element_name(e)?;
                    match depth {
                        0 => {
                            if root_name.is_some() {
                                return Err(DocumentError::parse("multiple root elements"));
                            }
                            let start = tag_start(content, end)?;
                            doc.prolog = content[..start].to_string();
                            doc.root_open = content[start..end].to_string();
                            root_name = Some(name);
                        }
                        1 => pending = Some(PendingElement::open(&name, e, tag_start(content, end)?)?),
                        2 if name == "display-name" => {
                            if let Some(PendingElement::Channel { display_names, .. }) = pending.as_mut() {
                                display_names.push(String::new());
                                capture_display_name = true;
                            }
                        }
                        _ => {}
                    }
                    depth += 1;
                }
                Event::Empty(ref e) => {
                    let name = element_name(e)?;
                    match depth {
                        0 => {
                            if root_name.is_some() {
                                return Err(DocumentError::parse("multiple root elements"));
                            }
                            // <tv/>: split into an open and close pair
                            let start = tag_start(content, end)?;
                            doc.prolog = content[..start].to_string();
                            let tag = content[start..end].trim_end_matches("/>").trim_end();
                            doc.root_open = format!("{tag}>");
                            doc.root_close = format!("</{name}>");
                            root_end = Some(end);
                            root_name = Some(name);
                        }
                        1 => {
                            let element = PendingElement::open(&name, e, tag_start(content, end)?)?;
                            doc.close(element, content, end);
                        }
                        _ => {}
                    }
                }
                Event::End(_) => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| DocumentError::parse("unbalanced end tag"))?;
                    match depth {
                        0 => {
                            let start = tag_start(content, end)?;
                            doc.root_close = content[start..end].to_string();
                            root_end = Some(end);
                        }
                        1 => {
                            if let Some(element) = pending.take() {
                                doc.close(element, content, end);
                            }
                        }
                        2 => capture_display_name = false,
                        _ => {}
                    }
                }
                Event::Text(ref t) if capture_display_name => {
                    let text = t.unescape().map_err(|e| parse_error(&reader, e))?;
                    if let Some(PendingElement::Channel { display_names, .. }) = pending.as_mut() {
                        if let Some(last) = display_names.last_mut() {
                            last.push_str(&text);
                        }
                    }
                }
                Event::CData(ref t) if capture_display_name => {
                    let text = String::from_utf8_lossy(t).into_owned();
                    if let Some(PendingElement::Channel { display_names, .. }) = pending.as_mut() {
                        if let Some(last) = display_names.last_mut() {
                            last.push_str(&text);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if root_name.is_none() {
            return Err(DocumentError::parse("document has no root element"));
        }
        let root_end = root_end.ok_or_else(|| DocumentError::parse("root element is not closed"))?;
        doc.epilogue = content[root_end..].to_string();

        Ok(doc)
    }

    fn close(&mut self, element: PendingElement, content: &str, end: usize) {
        match element {
            PendingElement::Channel {
                id,
                display_names,
                start,
            } => self.channels.push(ChannelElement {
                id,
                display_names: display_names
                    .into_iter()
                    .map(|name| name.trim().to_string())
                    .collect(),
                raw: content[start..end].to_string(),
            }),
            PendingElement::Programme {
                channel,
                start_attr,
                stop,
                start,
            } => self.programmes.push(ProgrammeElement {
                channel,
                start: start_attr,
                stop,
                raw: content[start..end].to_string(),
            }),
            PendingElement::Other { start } => self.others.push(content[start..end].to_string()),
        }
    }

    /// Serialize with one root child per line
    pub fn to_xml(&self) -> String {
        let size = self.channels.iter().map(|c| c.raw.len() + 3).sum::<usize>()
            + self.programmes.iter().map(|p| p.raw.len() + 3).sum::<usize>()
            + self.prolog.len()
            + self.root_open.len()
            + 64;
        let mut xml = String::with_capacity(size);

        xml.push_str(&self.prolog);
        xml.push_str(&self.root_open);
        xml.push('\n');
        let children = self
            .channels
            .iter()
            .map(|c| c.raw.as_str())
            .chain(self.programmes.iter().map(|p| p.raw.as_str()))
            .chain(self.others.iter().map(String::as_str));
        for child in children {
            xml.push_str("  ");
            xml.push_str(child);
            xml.push('\n');
        }
        xml.push_str(&self.root_close);
        xml.push_str(&self.epilogue);
        xml
    }
}

enum PendingElement {
    Channel {
        id: String,
        display_names: Vec<String>,
        start: usize,
    },
    Programme {
        channel: String,
        start_attr: String,
        stop: String,
        start: usize,
    },
    Other {
        start: usize,
    },
}

impl PendingElement {
    fn open(name: &str, tag: &BytesStart<'_>, start: usize) -> DocumentResult<Self> {
        Ok(match name {
            "channel" => Self::Channel {
                id: attribute(tag, "id")?.unwrap_or_default(),
                display_names: Vec::new(),
                start,
            },
            "programme" => Self::Programme {
                channel: attribute(tag, "channel")?.unwrap_or_default(),
                start_attr: attribute(tag, "start")?.unwrap_or_default(),
                stop: attribute(tag, "stop")?.unwrap_or_default(),
                start,
            },
            _ => Self::Other { start },
        })
    }
}

fn element_name(tag: &BytesStart<'_>) -> DocumentResult<String> {
    std::str::from_utf8(tag.name().as_ref())
        .map(str::to_string)
        .map_err(|e| DocumentError::parse(format!("Invalid UTF-8 in XML element name: {e}")))
}

fn attribute(tag: &BytesStart<'_>, key: &str) -> DocumentResult<Option<String>> {
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| DocumentError::parse(format!("Invalid attribute: {e}")))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| DocumentError::parse(format!("Invalid attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Offset of the `<` opening the tag that ends at `end`
fn tag_start(content: &str, end: usize) -> DocumentResult<usize> {
    content
        .get(..end)
        .and_then(|head| head.rfind('<'))
        .ok_or_else(|| DocumentError::parse(format!("cannot locate tag ending at byte {end}")))
}

fn parse_error(reader: &Reader<&[u8]>, error: impl std::fmt::Display) -> DocumentError {
    DocumentError::parse(format!(
        "XML parsing error at byte {}: {error}",
        reader.buffer_position()
    ))
}
