//! Cross-type, cross-language project manifest.
//!
//! Scans every content type directory and buckets each variant under the
//! language its suffix names:
//!
//! ```text
//! data/drama/drama-a/        →  drama.zh = [drama-a]
//! data/drama/drama-a-en/     →  drama.en = [drama-a-en, drama-b-en]
//! data/drama/drama-b-en/
//! ```
//!
//! Every catalog language gets a bucket under every type, even when empty.
//! Scan order is lexical and titles are read in parallel with an
//! order-preserving collect, so the manifest is byte-for-byte stable for an
//! unchanged tree.

use crate::content::{ContentType, metadata_title};
use crate::repository::{ContentError, ContentRepository};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Location of the persisted manifest, relative to the data root.
pub const MANIFEST_PATH: &str = "site-network/manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub title: String,
}

/// `type → language → [{id, title}]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<ContentType, BTreeMap<String, Vec<ManifestEntry>>>,
}

impl Manifest {
    /// Projects of one type in one language, in scan order.
    pub fn bucket(&self, content_type: ContentType, language: &str) -> &[ManifestEntry] {
        self.entries
            .get(&content_type)
            .and_then(|langs| langs.get(language))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Language buckets of one type.
    pub fn languages(&self, content_type: ContentType) -> impl Iterator<Item = (&str, &[ManifestEntry])> {
        self.entries
            .get(&content_type)
            .into_iter()
            .flat_map(|langs| langs.iter().map(|(l, e)| (l.as_str(), e.as_slice())))
    }

    pub fn types(&self) -> impl Iterator<Item = ContentType> + '_ {
        self.entries.keys().copied()
    }

    pub fn count(&self, content_type: ContentType) -> usize {
        self.languages(content_type).map(|(_, e)| e.len()).sum()
    }

    pub fn total(&self) -> usize {
        self.types().map(|t| self.count(t)).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds a [`Manifest`] from a repository.
pub struct ManifestAggregator<'r, 'a> {
    repo: &'r ContentRepository<'a>,
}

impl<'r, 'a> ManifestAggregator<'r, 'a> {
    pub fn new(repo: &'r ContentRepository<'a>) -> Self {
        Self { repo }
    }

    /// Scan every content type. One unreadable project never aborts the scan.
    pub fn aggregate(&self) -> Result<Manifest, ContentError> {
        let catalog = self.repo.catalog();
        let mut entries = BTreeMap::new();

        for content_type in ContentType::ALL {
            let mut buckets: BTreeMap<String, Vec<ManifestEntry>> = catalog
                .languages()
                .iter()
                .map(|l| (l.clone(), Vec::new()))
                .collect();

            let variants = self.repo.list_variants(content_type)?;
            let scanned: Vec<(&str, ManifestEntry)> = variants
                .par_iter()
                .map(|id| {
                    let language = catalog.language_of(id);
                    let entry = ManifestEntry {
                        id: id.clone(),
                        title: self.read_title(content_type, id, language),
                    };
                    (language, entry)
                })
                .collect();

            for (language, entry) in scanned {
                buckets.entry(language.to_string()).or_default().push(entry);
            }
            debug!(%content_type, projects = variants.len(), "aggregated");
            entries.insert(content_type, buckets);
        }

        Ok(Manifest { entries })
    }

    fn read_title(&self, content_type: ContentType, id: &str, language: &str) -> String {
        match self.repo.get_metadata(content_type, id) {
            Ok(metadata) => {
                if let Some(recorded) = metadata.get("language").and_then(Value::as_str)
                    && recorded != language
                {
                    warn!(
                        %content_type,
                        id,
                        recorded,
                        suffix = language,
                        "metadata language disagrees with directory suffix; using suffix"
                    );
                }
                metadata_title(&metadata).unwrap_or(id).to_string()
            }
            Err(e) => {
                if !e.is_not_found() {
                    warn!(%content_type, id, error = %e, "could not read metadata");
                }
                id.to_string()
            }
        }
    }
}

/// Write the manifest to `<data_root>/site-network/manifest.json`.
pub fn write_manifest(data_root: &Path, manifest: &Manifest) -> Result<PathBuf, ContentError> {
    let path = data_root.join(MANIFEST_PATH);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, manifest.to_json()?)?;
    Ok(path)
}

/// Read a previously written manifest.
pub fn read_manifest(data_root: &Path) -> Result<Manifest, ContentError> {
    let path = data_root.join(MANIFEST_PATH);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ContentError::NotFound(MANIFEST_PATH.to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&content)?)
}
