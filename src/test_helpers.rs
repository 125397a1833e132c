//! Shared test utilities for the ip-factory test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let catalog = test_catalog();
//! let repo = ContentRepository::new(tmp.path().join("data"), &catalog);
//! let manifest = ManifestAggregator::new(&repo).aggregate().unwrap();
//!
//! assert_eq!(bucket_ids(&manifest, ContentType::Novel, "en"), vec!["novel-1-en"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::LanguageSection;
use crate::content::ContentType;
use crate::language::LanguageCatalog;
use crate::manifest::Manifest;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/project/` to a temp directory and return it.
///
/// The copy holds `config.toml` and a `data/` tree. Tests may mutate it
/// without affecting other tests or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/project");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Catalog matching the fixture config: default `zh`, languages `zh, en, fr`.
pub fn test_catalog() -> LanguageCatalog {
    LanguageCatalog::load(&LanguageSection {
        default: Some("zh".to_string()),
        supported: vec!["zh".into(), "en".into(), "fr".into()],
    })
    .unwrap()
}

// =========================================================================
// Tree builders
// =========================================================================

/// Write a metadata file for `<type>/<id>` under `data_root`, creating directories.
pub fn write_metadata(
    data_root: &Path,
    content_type: ContentType,
    id: &str,
    metadata: serde_json::Value,
) {
    let dir = data_root.join(content_type.dir_name()).join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(content_type.metadata_file()),
        serde_json::to_string_pretty(&metadata).unwrap(),
    )
    .unwrap();
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Variant ids in one manifest bucket, in order.
pub fn bucket_ids<'a>(manifest: &'a Manifest, content_type: ContentType, language: &str) -> Vec<&'a str> {
    manifest
        .bucket(content_type, language)
        .iter()
        .map(|e| e.id.as_str())
        .collect()
}

/// Read a generated file under `root` as a string. Panics with the path on miss.
pub fn read_file(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel))
        .unwrap_or_else(|e| panic!("could not read {rel}: {e}"))
}
