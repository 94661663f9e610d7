//! Per-client output variants of the served guide

use std::fmt;
use std::str::FromStr;

const MINIMAL_DECLARATION: &str = r#"<?xml version="1.0"?>"#;

/// Value of the `format=` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Exactly what the export job wrote
    Raw,
    /// No XML declaration and no doctype
    Plex,
    /// Bare `<?xml version="1.0"?>` when no declaration is present
    Minimal,
    /// UTF-8 declaration when none is present
    #[default]
    Standard,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    /// Unknown values select the standard variant
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Self::Raw,
            "plex" => Self::Plex,
            "minimal" => Self::Minimal,
            _ => Self::Standard,
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Raw => "raw",
            Self::Plex => "plex",
            Self::Minimal => "minimal",
            Self::Standard => "standard",
        };
        f.write_str(name)
    }
}

impl OutputFormat {
    pub fn apply(&self, content: String) -> String {
        match self {
            Self::Raw => content,
            Self::Plex => {
                let content = strip_leading_line(content, "<?xml");
                strip_leading_line(content, "<!DOCTYPE")
            }
            Self::Minimal => prepend_declaration(content, MINIMAL_DECLARATION),
            Self::Standard => prepend_declaration(content, super::document::XML_DECLARATION),
        }
    }
}

fn strip_leading_line(content: String, prefix: &str) -> String {
    if !content.starts_with(prefix) {
        return content;
    }
    match content.split_once('\n') {
        Some((_, rest)) => rest.to_string(),
        None => content,
    }
}

fn prepend_declaration(content: String, declaration: &str) -> String {
    if content.starts_with("<?xml") {
        content
    } else {
        format!("{declaration}\n{content}")
    }
}
