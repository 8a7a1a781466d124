use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::document::{RfcDocument, Section};

/// RFC 2119 requirement keywords used to score section density.
/// Counting is independent per keyword, so "MUST NOT" occurrences also
/// contribute to the "MUST" count.
const RFC_KEYWORDS: [&str; 10] = [
    "MUST",
    "MUST NOT",
    "REQUIRED",
    "SHALL",
    "SHALL NOT",
    "SHOULD",
    "SHOULD NOT",
    "RECOMMENDED",
    "MAY",
    "OPTIONAL",
];

/// Sections with fewer keyword hits than this are considered
/// property-poor and dropped.
const MIN_KEYWORD_COUNT: usize = 3;

/// A line is a section header iff its trimmed form starts with one or
/// more dot-separated integers (optional trailing dot), whitespace, and
/// a non-empty title.
static SECTION_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)*\.?)\s+(.+)$").expect("Failed to compile SECTION_HEADER_RE")
});

static RFC_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)RFC\s*(\d+)").expect("Failed to compile RFC_NUMBER_RE"));

/// Segments raw RFC text into numbered sections and keeps the
/// property-rich ones, ranked by requirement-keyword density.
pub struct RfcParser;

impl RfcParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a document: extract the RFC number, a best-effort title,
    /// and the ranked property-rich sections. Pure function of the
    /// input text; a document with no matching headers or no keyword
    /// hits yields an empty section list, not an error.
    pub fn parse(&self, text: &str) -> RfcDocument {
        let rfc_number = RFC_NUMBER_RE
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let lines: Vec<&str> = text.split('\n').collect();
        let title = self.extract_title(&lines[..lines.len().min(20)]);

        let sections = self.extract_property_sections(&lines);

        info!(
            "Parsed RFC {}: {} property-rich sections",
            rfc_number,
            sections.len()
        );

        RfcDocument {
            rfc_number,
            title,
            total_chars: text.chars().count(),
            sections,
        }
    }

    /// First line in the given slice longer than 15 characters that is
    /// not an "RFC ..." banner line, truncated to 100 characters.
    fn extract_title(&self, lines: &[&str]) -> String {
        for line in lines {
            let stripped = line.trim();
            if stripped.chars().count() > 15 && !stripped.starts_with("RFC") {
                return stripped.chars().take(100).collect();
            }
        }
        "Unknown Title".to_string()
    }

    fn extract_property_sections(&self, lines: &[&str]) -> Vec<Section> {
        let mut sections = Vec::new();

        let mut current_number: Option<String> = None;
        let mut current_title = String::new();
        let mut current_content: Vec<&str> = Vec::new();

        for line in lines {
            if let Some(caps) = SECTION_HEADER_RE.captures(line.trim()) {
                if let Some(number) = current_number.take() {
                    self.finish_section(&mut sections, number, &current_title, &current_content);
                }

                current_number = Some(caps[1].trim_end_matches('.').to_string());
                current_title = caps[2].trim().to_string();
                current_content.clear();
            } else if current_number.is_some() {
                // Lines before the first header are discarded
                current_content.push(line);
            }
        }

        if let Some(number) = current_number {
            self.finish_section(&mut sections, number, &current_title, &current_content);
        }

        // Stable sort: ties keep encounter order
        sections.sort_by(|a: &Section, b: &Section| b.keyword_count.cmp(&a.keyword_count));

        sections
    }

    fn finish_section(
        &self,
        sections: &mut Vec<Section>,
        number: String,
        title: &str,
        content_lines: &[&str],
    ) {
        if content_lines.is_empty() {
            return;
        }

        let content = content_lines.join("\n");
        let keyword_count = count_keywords(&content);

        debug!("Section {}: {} keyword hits", number, keyword_count);

        if keyword_count >= MIN_KEYWORD_COUNT {
            sections.push(Section {
                number,
                title: title.to_string(),
                content,
                keyword_count,
            });
        }
    }
}

impl Default for RfcParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Total non-overlapping occurrences of each requirement keyword,
/// case-insensitive. Keywords are counted independently.
fn count_keywords(text: &str) -> usize {
    let upper = text.to_uppercase();
    RFC_KEYWORDS
        .iter()
        .map(|kw| upper.matches(kw).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_headers_yields_no_sections() {
        let parser = RfcParser::new();
        let doc = parser.parse("This text MUST have keywords but no numbered sections.\n");
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let parser = RfcParser::new();
        // section 1 counts exactly 3 (2x MUST + SHOULD), right at the cutoff
        let doc = parser.parse("1. Intro\nMUST MUST SHOULD\n2. Rules\nMUST SHOULD MAY RECOMMENDED\n");
        assert_eq!(doc.sections.len(), 2);
    }

    #[test]
    fn low_density_sections_are_dropped() {
        let parser = RfcParser::new();
        let doc = parser.parse("1. Intro\nMUST\n2. Rules\nMUST SHOULD MAY RECOMMENDED\n");

        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].number, "2");
        assert_eq!(doc.sections[0].keyword_count, 4);
    }

    #[test]
    fn sections_sorted_by_density_descending() {
        let parser = RfcParser::new();
        let text = "\
1. Sparse
MUST SHOULD MAY
2. Dense
MUST MUST MUST SHOULD SHOULD MAY
3. Medium
MUST NOT SHOULD MAY OPTIONAL
";
        let doc = parser.parse(text);

        assert!(doc.sections.len() >= 2);
        for pair in doc.sections.windows(2) {
            assert!(pair[0].keyword_count >= pair[1].keyword_count);
        }
        assert_eq!(doc.sections[0].number, "2");
    }

    #[test]
    fn must_not_double_counts_must() {
        // "MUST NOT" contributes to both MUST and MUST NOT totals
        assert_eq!(count_keywords("MUST NOT"), 2);
        assert_eq!(count_keywords("must not send"), 2);
        assert_eq!(count_keywords("SHALL NOT"), 2);
    }

    #[test]
    fn keyword_count_invariant_holds() {
        let parser = RfcParser::new();
        let text = "1. A\nMUST MAY\n2. B\nSHOULD SHOULD SHOULD SHOULD\n";
        let doc = parser.parse(text);

        for section in &doc.sections {
            assert!(section.keyword_count >= 3);
        }
    }

    #[test]
    fn parse_is_idempotent() {
        let parser = RfcParser::new();
        let text = "RFC 8446\n\nThe Transport Layer Security (TLS) Protocol\n\n4.1. Handshake\nThe client MUST send. The server MUST NOT reply early. It SHOULD wait.\n";
        let first = parser.parse(text);
        let second = parser.parse(text);

        assert_eq!(first.sections, second.sections);
        assert_eq!(first.rfc_number, second.rfc_number);
    }

    #[test]
    fn rfc_number_extraction() {
        let parser = RfcParser::new();
        assert_eq!(parser.parse("See RFC 8446 for details").rfc_number, "8446");
        assert_eq!(parser.parse("see rfc2119").rfc_number, "2119");
        assert_eq!(parser.parse("no identifier here").rfc_number, "Unknown");
    }

    #[test]
    fn title_extraction_skips_short_and_rfc_lines() {
        let parser = RfcParser::new();
        let text = "RFC 8446 August 2018\nshort\nThe Transport Layer Security (TLS) Protocol\nrest\n";
        let doc = parser.parse(text);
        assert_eq!(doc.title, "The Transport Layer Security (TLS) Protocol");
    }

    #[test]
    fn title_truncated_to_100_chars() {
        let parser = RfcParser::new();
        let long_line = "x".repeat(250);
        let doc = parser.parse(&long_line);
        assert_eq!(doc.title.chars().count(), 100);
    }

    #[test]
    fn missing_title_defaults() {
        let parser = RfcParser::new();
        assert_eq!(parser.parse("short\nlines\nonly\n").title, "Unknown Title");
    }

    #[test]
    fn header_followed_by_header_yields_no_section() {
        let parser = RfcParser::new();
        let doc = parser.parse("1. Empty\n2. Full\nMUST SHOULD MAY\n");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].number, "2");
    }

    #[test]
    fn dotted_numbers_and_trailing_dots_normalize() {
        let parser = RfcParser::new();
        let doc = parser.parse("4.1.2. Sub Rules\nMUST SHOULD MAY\n");
        assert_eq!(doc.sections[0].number, "4.1.2");
        assert_eq!(doc.sections[0].title, "Sub Rules");
    }

    #[test]
    fn preamble_lines_are_discarded() {
        let parser = RfcParser::new();
        let doc = parser.parse("MUST SHOULD MAY OPTIONAL preamble\n1. Body\nMUST SHOULD MAY\n");
        assert_eq!(doc.sections.len(), 1);
        assert!(!doc.sections[0].content.contains("preamble"));
    }
}
