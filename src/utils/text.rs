//! Free-text cleanup for guide fields
//!
//! The guide API embeds broadcaster markup in synopses: subtitle/audio
//! feature tags such as `[S]`, `[AD]` or `[S,SL]`, and season/episode
//! markers such as `(S2 Ep 4)` or `S1 Ep 12/20`. None of that belongs in an
//! XMLTV description.

use regex::Regex;
use std::sync::OnceLock;

struct Patterns {
    control: Regex,
    feature_tag: Regex,
    episode_marker: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        // Every Unicode "Other" category: Cc, Cf, Co, Cn (Cs cannot occur in a str)
        control: Regex::new(r"\p{C}").expect("static regex"),
        feature_tag: Regex::new(r"\[[A-Z,]+\]").expect("static regex"),
        episode_marker: Regex::new(r"\(?[SE]?\d+\s?Ep\s?\d+[\d/]*\)?").expect("static regex"),
    })
}

/// Strip control characters, feature tags and episode markers, then trim.
///
/// Removal is repeated until nothing matches, so text like `[A[B]]` cannot
/// leave a fresh tag behind and `clean_text(clean_text(x)) == clean_text(x)`.
pub fn clean_text(text: &str) -> String {
    let patterns = patterns();
    let mut current = text.to_string();

    loop {
        let pass = {
            let stripped = patterns.control.replace_all(&current, "");
            let stripped = patterns.feature_tag.replace_all(&stripped, "").into_owned();
            patterns.episode_marker.replace_all(&stripped, "").into_owned()
        };
        if pass == current {
            break;
        }
        current = pass;
    }

    current.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_feature_tags() {
        assert_eq!(clean_text("A gripping drama. [S]"), "A gripping drama.");
        assert_eq!(clean_text("News [AD] [HD] update"), "News   update");
        assert_eq!(clean_text("[S,SL] Signed."), "Signed.");
        // Lowercase and mixed content is not a feature tag
        assert_eq!(clean_text("See [note 1]"), "See [note 1]");
    }

    #[test]
    fn test_removes_episode_markers() {
        assert_eq!(clean_text("The finale. (S2 Ep 4)"), "The finale.");
        assert_eq!(clean_text("Part two. S1 Ep 12/20"), "Part two.");
        assert_eq!(clean_text("(2 Ep 5) begins"), "begins");
        assert_eq!(clean_text("(E3Ep7) Story"), "Story");
    }

    #[test]
    fn test_removes_control_characters() {
        assert_eq!(clean_text("Line\u{0007}one\u{200B}"), "Lineone");
        assert_eq!(clean_text("\u{FEFF}Intro\r\n"), "Intro");
        assert_eq!(clean_text("Tab\tseparated"), "Tabseparated");
    }

    #[test]
    fn test_keeps_ordinary_text() {
        assert_eq!(clean_text("  Café culture in 2024.  "), "Café culture in 2024.");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_nested_tags_fully_removed() {
        assert_eq!(clean_text("Story [A[B]] end"), "Story  end");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "A gripping drama. [S] (S2 Ep 4)",
            "Story [A[B]] end",
            "\u{0001}[HD]Ep 3 Ep 4\u{0002}",
            "((S1 Ep 2)) trailing  ",
            "",
            "plain",
        ];
        for sample in samples {
            let once = clean_text(sample);
            assert_eq!(clean_text(&once), once, "not idempotent for {sample:?}");
        }
    }
}
