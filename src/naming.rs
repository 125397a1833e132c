//! Child file naming: `<prefix>-N.json`.
//!
//! Chapters and episodes are numbered by a trailing integer. The number is
//! parsed as an integer so that ordering is numeric everywhere:
//! - `chapter-1.json`, `chapter-10.json`, `chapter-2.json` → 1, 2, 10
//! - `episode-03.json` → 3
//! - `chapter-final.json` → no number

/// Parsed child file name like `chapter-10.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedChildName {
    /// Text before the last dash (`chapter`).
    pub prefix: String,
    /// Trailing number, if the part after the last dash is numeric.
    pub number: Option<u32>,
}

/// Parse a child file name or stem.
///
/// - `"chapter-10.json"` → prefix="chapter", number=Some(10)
/// - `"episode-2"` → prefix="episode", number=Some(2)
/// - `"chapter-final.json"` → prefix="chapter", number=None
/// - `"notes.json"` → prefix="notes", number=None
pub fn parse_child_name(name: &str) -> ParsedChildName {
    let stem = name.strip_suffix(".json").unwrap_or(name);
    if let Some(dash_pos) = stem.rfind('-') {
        let prefix = &stem[..dash_pos];
        let number = stem[dash_pos + 1..].parse::<u32>().ok();
        return ParsedChildName {
            prefix: prefix.to_string(),
            number,
        };
    }
    ParsedChildName {
        prefix: stem.to_string(),
        number: None,
    }
}

/// Number of a child file, only if its prefix matches.
pub fn child_number(name: &str, prefix: &str) -> Option<u32> {
    let parsed = parse_child_name(name);
    if parsed.prefix == prefix {
        parsed.number
    } else {
        None
    }
}

/// File name for child `id`: `chapter-3.json`.
pub fn child_file_name(prefix: &str, id: u32) -> String {
    format!("{prefix}-{id}.json")
}

/// Static site page name for child `id`: `episode-3.html`.
pub fn child_page_name(prefix: &str, id: u32) -> String {
    format!("{prefix}-{id}.html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_file() {
        let p = parse_child_name("chapter-10.json");
        assert_eq!(p.prefix, "chapter");
        assert_eq!(p.number, Some(10));
    }

    #[test]
    fn numbered_stem_without_extension() {
        let p = parse_child_name("episode-2");
        assert_eq!(p.prefix, "episode");
        assert_eq!(p.number, Some(2));
    }

    #[test]
    fn leading_zeros_parse_numerically() {
        assert_eq!(parse_child_name("episode-03.json").number, Some(3));
    }

    #[test]
    fn non_numeric_suffix() {
        let p = parse_child_name("chapter-final.json");
        assert_eq!(p.prefix, "chapter");
        assert_eq!(p.number, None);
    }

    #[test]
    fn no_dash() {
        let p = parse_child_name("notes.json");
        assert_eq!(p.prefix, "notes");
        assert_eq!(p.number, None);
    }

    #[test]
    fn child_number_checks_prefix() {
        assert_eq!(child_number("chapter-4.json", "chapter"), Some(4));
        assert_eq!(child_number("episode-4.json", "chapter"), None);
    }

    #[test]
    fn numeric_not_lexical_order() {
        let mut numbers: Vec<u32> = ["chapter-1.json", "chapter-10.json", "chapter-2.json"]
            .iter()
            .filter_map(|n| child_number(n, "chapter"))
            .collect();
        numbers.sort();
        assert_eq!(numbers, vec![1, 2, 10]);
    }

    #[test]
    fn file_and_page_names() {
        assert_eq!(child_file_name("chapter", 3), "chapter-3.json");
        assert_eq!(child_page_name("episode", 12), "episode-12.html");
    }
}
