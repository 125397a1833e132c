//! The language catalog and the variant id suffix convention.
//!
//! Every project exists once per language as a sibling directory. The default
//! language owns the bare project id (`novel-1`); every other language appends
//! its code (`novel-1-en`). The catalog is built once from `[languages]` in
//! `config.toml` and borrowed by every component that needs to map between
//! variant ids and languages.
//!
//! ```text
//! catalog: default = zh, languages = [zh, en, fr]
//!
//! variant_id("novel-1", "zh")  → novel-1
//! variant_id("novel-1", "en")  → novel-1-en
//! language_of("novel-1-fr")    → fr
//! language_of("novel-1")       → zh
//! base_of("novel-1-en")        → novel-1
//! ```
//!
//! Codes may not contain `-`, so at most one catalog suffix can match any id.

use crate::config::{ConfigError, LanguageSection};
use std::collections::HashSet;

/// Ordered set of supported languages with a distinguished default.
///
/// Immutable after [`LanguageCatalog::load`]. The default is always a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCatalog {
    default: String,
    languages: Vec<String>,
}

impl LanguageCatalog {
    /// Build a catalog from the `[languages]` config section.
    pub fn load(source: &LanguageSection) -> Result<Self, ConfigError> {
        if source.supported.is_empty() {
            return Err(ConfigError::Language(
                "languages.supported must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for code in &source.supported {
            if code.trim().is_empty() {
                return Err(ConfigError::Language(
                    "languages.supported contains an empty code".into(),
                ));
            }
            if code.contains('-') {
                return Err(ConfigError::Language(format!(
                    "language code '{code}' must not contain '-'"
                )));
            }
            if !seen.insert(code.as_str()) {
                return Err(ConfigError::Language(format!(
                    "language code '{code}' is listed twice"
                )));
            }
        }

        let default = source
            .default
            .as_deref()
            .ok_or_else(|| ConfigError::Language("languages.default is missing".into()))?;
        if !seen.contains(default) {
            return Err(ConfigError::Language(format!(
                "default language '{default}' is not in languages.supported"
            )));
        }

        Ok(Self {
            default: default.to_string(),
            languages: source.supported.clone(),
        })
    }

    pub fn default_language(&self) -> &str {
        &self.default
    }

    /// All languages in configured order, default included.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Languages other than the default, in configured order.
    pub fn non_default(&self) -> impl Iterator<Item = &str> {
        self.languages
            .iter()
            .map(String::as_str)
            .filter(move |l| *l != self.default)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l == code)
    }

    pub fn is_default(&self, code: &str) -> bool {
        self.default == code
    }

    /// Directory suffix for a language: empty for the default, `-<lang>` otherwise.
    ///
    /// Also used for site directory names (`novel-site`, `novel-site-en`).
    pub fn suffix(&self, language: &str) -> String {
        if self.is_default(language) {
            String::new()
        } else {
            format!("-{language}")
        }
    }

    /// Variant id of `base_id` in `language`.
    ///
    /// A base id that already carries the `-<language>` suffix is returned
    /// unchanged, so `novel-1-en` never becomes `novel-1-en-en`.
    pub fn variant_id(&self, base_id: &str, language: &str) -> String {
        if self.is_default(language) {
            return base_id.to_string();
        }
        let suffix = self.suffix(language);
        if base_id.ends_with(&suffix) && base_id.len() > suffix.len() {
            base_id.to_string()
        } else {
            format!("{base_id}{suffix}")
        }
    }

    /// Language of a variant id, detected from its suffix.
    ///
    /// Ids without a catalog suffix belong to the default language.
    pub fn language_of(&self, variant_id: &str) -> &str {
        self.suffix_language(variant_id)
            .unwrap_or(self.default.as_str())
    }

    /// Strip the language suffix from a variant id, if any.
    pub fn base_of<'v>(&self, variant_id: &'v str) -> &'v str {
        match self.suffix_language(variant_id) {
            Some(lang) => &variant_id[..variant_id.len() - lang.len() - 1],
            None => variant_id,
        }
    }

    fn suffix_language(&self, variant_id: &str) -> Option<&str> {
        self.non_default().find(|lang| {
            variant_id.len() > lang.len() + 1
                && variant_id.ends_with(lang)
                && variant_id.as_bytes()[variant_id.len() - lang.len() - 1] == b'-'
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(default: Option<&str>, supported: &[&str]) -> LanguageSection {
        LanguageSection {
            default: default.map(str::to_string),
            supported: supported.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn catalog() -> LanguageCatalog {
        LanguageCatalog::load(&section(Some("zh"), &["zh", "en", "fr"])).unwrap()
    }

    // =========================================================================
    // load
    // =========================================================================

    #[test]
    fn load_keeps_configured_order() {
        let c = catalog();
        assert_eq!(c.default_language(), "zh");
        assert_eq!(c.languages(), &["zh", "en", "fr"]);
        assert_eq!(c.non_default().collect::<Vec<_>>(), vec!["en", "fr"]);
    }

    #[test]
    fn load_rejects_missing_default() {
        let err = LanguageCatalog::load(&section(None, &["zh", "en"])).unwrap_err();
        assert!(matches!(err, ConfigError::Language(_)));
    }

    #[test]
    fn load_rejects_default_outside_list() {
        let err = LanguageCatalog::load(&section(Some("de"), &["zh", "en"])).unwrap_err();
        assert!(err.to_string().contains("'de'"));
    }

    #[test]
    fn load_rejects_empty_list() {
        assert!(LanguageCatalog::load(&section(Some("zh"), &[])).is_err());
    }

    #[test]
    fn load_rejects_duplicates() {
        let err = LanguageCatalog::load(&section(Some("zh"), &["zh", "en", "en"])).unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn load_rejects_dashed_and_empty_codes() {
        assert!(LanguageCatalog::load(&section(Some("zh"), &["zh", "pt-br"])).is_err());
        assert!(LanguageCatalog::load(&section(Some("zh"), &["zh", ""])).is_err());
    }

    // =========================================================================
    // suffix convention
    // =========================================================================

    #[test]
    fn default_language_never_suffixes() {
        let c = catalog();
        assert_eq!(c.suffix("zh"), "");
        assert_eq!(c.variant_id("novel-1", "zh"), "novel-1");
    }

    #[test]
    fn non_default_language_appends_suffix() {
        let c = catalog();
        assert_eq!(c.suffix("en"), "-en");
        assert_eq!(c.variant_id("novel-1", "en"), "novel-1-en");
    }

    #[test]
    fn variant_id_does_not_double_suffix() {
        let c = catalog();
        assert_eq!(c.variant_id("novel-1-en", "en"), "novel-1-en");
        // A different language still appends
        assert_eq!(c.variant_id("novel-1-en", "fr"), "novel-1-en-fr");
    }

    #[test]
    fn language_of_detects_suffix() {
        let c = catalog();
        assert_eq!(c.language_of("drama-a-en"), "en");
        assert_eq!(c.language_of("drama-a-fr"), "fr");
        assert_eq!(c.language_of("drama-a"), "zh");
    }

    #[test]
    fn language_of_requires_dash_boundary() {
        let c = catalog();
        // "frozen" ends in "en" but not "-en"
        assert_eq!(c.language_of("comic-frozen"), "zh");
        // A bare language code is not a suffixed id
        assert_eq!(c.language_of("-en"), "zh");
    }

    #[test]
    fn language_of_ignores_default_suffix() {
        let c = catalog();
        // "-zh" is not a suffix the convention ever produces
        assert_eq!(c.language_of("novel-1-zh"), "zh");
        assert_eq!(c.base_of("novel-1-zh"), "novel-1-zh");
    }

    #[test]
    fn base_of_strips_suffix() {
        let c = catalog();
        assert_eq!(c.base_of("novel-1-en"), "novel-1");
        assert_eq!(c.base_of("novel-1"), "novel-1");
        assert_eq!(c.base_of("ip-7-comic-fr"), "ip-7-comic");
    }

    #[test]
    fn contains_checks_membership() {
        let c = catalog();
        assert!(c.contains("fr"));
        assert!(!c.contains("de"));
        assert!(c.is_default("zh"));
        assert!(!c.is_default("en"));
    }
}
