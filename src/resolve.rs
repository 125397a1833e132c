//! Variant resolution: `(base id, language)` → directory on disk.
//!
//! ```text
//! resolve(novel-1, fr)
//!   target = novel-1-fr
//!   novel-1-fr/ exists?  → novel-1-fr
//!   novel-1/ exists?     → novel-1   (fell back, Fallback::ToBase only)
//!   otherwise            → NotFound
//! ```
//!
//! Resolution is read-only and never creates directories.

use crate::language::LanguageCatalog;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Not found: {variant_id}")]
    NotFound { variant_id: String },
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

/// What to do when the requested translation does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Serve the base (default-language) variant instead.
    ToBase,
    /// Report `NotFound`; callers that need translated text use this.
    Strict,
}

/// A variant that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Directory name actually found.
    pub variant_id: String,
    pub dir: PathBuf,
    /// Language of the content served (the default after a fallback).
    pub language: String,
    /// True when the requested translation was missing and the base was used.
    pub fell_back: bool,
}

pub struct VariantResolver<'a> {
    catalog: &'a LanguageCatalog,
}

impl<'a> VariantResolver<'a> {
    pub fn new(catalog: &'a LanguageCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve `base_id` in `language` under `type_root`.
    ///
    /// `None` or the default language resolves to `base_id` itself.
    pub fn resolve(
        &self,
        type_root: &Path,
        base_id: &str,
        language: Option<&str>,
        fallback: Fallback,
    ) -> Result<ResolvedPath, ResolveError> {
        let language = language.unwrap_or(self.catalog.default_language());
        if !self.catalog.contains(language) {
            return Err(ResolveError::UnsupportedLanguage(language.to_string()));
        }

        let target = self.catalog.variant_id(base_id, language);
        let target_dir = type_root.join(&target);
        if target_dir.is_dir() {
            return Ok(ResolvedPath {
                variant_id: target,
                dir: target_dir,
                language: language.to_string(),
                fell_back: false,
            });
        }

        if target != base_id && fallback == Fallback::ToBase {
            let base_dir = type_root.join(base_id);
            if base_dir.is_dir() {
                debug!(base_id, language, "translation missing, serving base variant");
                return Ok(ResolvedPath {
                    variant_id: base_id.to_string(),
                    dir: base_dir,
                    language: self.catalog.language_of(base_id).to_string(),
                    fell_back: true,
                });
            }
        }

        Err(ResolveError::NotFound { variant_id: target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LanguageSection;
    use std::fs;
    use tempfile::TempDir;

    fn catalog() -> LanguageCatalog {
        LanguageCatalog::load(&LanguageSection {
            default: Some("zh".to_string()),
            supported: vec!["zh".into(), "en".into(), "fr".into()],
        })
        .unwrap()
    }

    fn tree(dirs: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for d in dirs {
            fs::create_dir_all(tmp.path().join(d)).unwrap();
        }
        tmp
    }

    #[test]
    fn exact_translation_found() {
        let c = catalog();
        let tmp = tree(&["novel-1", "novel-1-en"]);
        let r = VariantResolver::new(&c)
            .resolve(tmp.path(), "novel-1", Some("en"), Fallback::ToBase)
            .unwrap();
        assert_eq!(r.variant_id, "novel-1-en");
        assert_eq!(r.language, "en");
        assert!(!r.fell_back);
        assert_eq!(r.dir, tmp.path().join("novel-1-en"));
    }

    #[test]
    fn missing_translation_falls_back_to_base() {
        let c = catalog();
        let tmp = tree(&["novel-1"]);
        let r = VariantResolver::new(&c)
            .resolve(tmp.path(), "novel-1", Some("fr"), Fallback::ToBase)
            .unwrap();
        assert_eq!(r.variant_id, "novel-1");
        assert_eq!(r.language, "zh");
        assert!(r.fell_back);
    }

    #[test]
    fn neither_variant_is_not_found() {
        let c = catalog();
        let tmp = tree(&[]);
        let err = VariantResolver::new(&c)
            .resolve(tmp.path(), "novel-1", Some("fr"), Fallback::ToBase)
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotFound {
                variant_id: "novel-1-fr".to_string()
            }
        );
    }

    #[test]
    fn default_language_never_suffixes() {
        let c = catalog();
        let tmp = tree(&["novel-1", "novel-1-zh"]);
        let r = VariantResolver::new(&c)
            .resolve(tmp.path(), "novel-1", Some("zh"), Fallback::ToBase)
            .unwrap();
        assert_eq!(r.variant_id, "novel-1");
        let r = VariantResolver::new(&c)
            .resolve(tmp.path(), "novel-1", None, Fallback::ToBase)
            .unwrap();
        assert_eq!(r.variant_id, "novel-1");
        assert!(!r.fell_back);
    }

    #[test]
    fn already_suffixed_id_is_not_doubled() {
        let c = catalog();
        let tmp = tree(&["novel-1-en"]);
        let r = VariantResolver::new(&c)
            .resolve(tmp.path(), "novel-1-en", Some("en"), Fallback::Strict)
            .unwrap();
        assert_eq!(r.variant_id, "novel-1-en");
    }

    #[test]
    fn strict_policy_does_not_fall_back() {
        let c = catalog();
        let tmp = tree(&["drama-1"]);
        let err = VariantResolver::new(&c)
            .resolve(tmp.path(), "drama-1", Some("en"), Fallback::Strict)
            .unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[test]
    fn unsupported_language_is_distinct_error() {
        let c = catalog();
        let tmp = tree(&["novel-1"]);
        let err = VariantResolver::new(&c)
            .resolve(tmp.path(), "novel-1", Some("de"), Fallback::ToBase)
            .unwrap_err();
        assert_eq!(err, ResolveError::UnsupportedLanguage("de".to_string()));
    }

    #[test]
    fn plain_file_is_not_a_variant() {
        let c = catalog();
        let tmp = tree(&[]);
        fs::write(tmp.path().join("novel-1"), "not a dir").unwrap();
        assert!(
            VariantResolver::new(&c)
                .resolve(tmp.path(), "novel-1", None, Fallback::ToBase)
                .is_err()
        );
    }

    #[test]
    fn resolution_never_creates_directories() {
        let c = catalog();
        let tmp = tree(&[]);
        let _ = VariantResolver::new(&c).resolve(tmp.path(), "novel-1", Some("en"), Fallback::ToBase);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
