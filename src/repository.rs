//! Typed access to the directory-as-database content tree.
//!
//! Every read goes through the [`VariantResolver`] or a known variant id;
//! every write is a pretty-printed full-file overwrite. Missing and malformed
//! files are reported as [`ContentError::NotFound`] so one corrupt project can
//! never crash a caller that is iterating over many.

use crate::content::{
    ChildCollection, ChildRecord, ChildSummary, ContentType, Metadata, ProjectRecord,
    STORYBOARD_FILE, child_id_of,
};
use crate::language::LanguageCatalog;
use crate::naming::{child_file_name, child_number};
use crate::resolve::{Fallback, ResolveError, ResolvedPath, VariantResolver};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("{0} projects have no chapters or episodes")]
    NoChildren(ContentType),
    #[error("{0} is a language variant, not a base id")]
    NotABaseId(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::NotFound(_) | ContentError::Resolve(ResolveError::NotFound { .. })
        )
    }

    /// HTTP-style status code for route-facing callers.
    pub fn status(&self) -> u16 {
        match self {
            _ if self.is_not_found() => 404,
            ContentError::Resolve(ResolveError::UnsupportedLanguage(_))
            | ContentError::NoChildren(_)
            | ContentError::NotABaseId(_) => 400,
            _ => 500,
        }
    }
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&ContentError> for ErrorBody {
    fn from(err: &ContentError) -> Self {
        let error = if err.is_not_found() {
            "Not found".to_string()
        } else {
            err.to_string()
        };
        Self { error }
    }
}

/// Read/write access to `<data_root>/<type>/<variant id>/`.
pub struct ContentRepository<'a> {
    data_root: PathBuf,
    catalog: &'a LanguageCatalog,
}

impl<'a> ContentRepository<'a> {
    pub fn new(data_root: impl Into<PathBuf>, catalog: &'a LanguageCatalog) -> Self {
        Self {
            data_root: data_root.into(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &'a LanguageCatalog {
        self.catalog
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn type_root(&self, content_type: ContentType) -> PathBuf {
        self.data_root.join(content_type.dir_name())
    }

    pub fn project_dir(&self, content_type: ContentType, variant_id: &str) -> PathBuf {
        self.type_root(content_type).join(variant_id)
    }

    /// Resolve with fallback to the base variant.
    pub fn resolve(
        &self,
        content_type: ContentType,
        base_id: &str,
        language: Option<&str>,
    ) -> Result<ResolvedPath, ContentError> {
        self.resolve_with(content_type, base_id, language, Fallback::ToBase)
    }

    pub fn resolve_with(
        &self,
        content_type: ContentType,
        base_id: &str,
        language: Option<&str>,
        fallback: Fallback,
    ) -> Result<ResolvedPath, ContentError> {
        Ok(VariantResolver::new(self.catalog).resolve(
            &self.type_root(content_type),
            base_id,
            language,
            fallback,
        )?)
    }

    /// Variant directory names under a type root, sorted lexically.
    ///
    /// A missing type root is an empty list. Hidden directories are skipped.
    pub fn list_variants(&self, content_type: ContentType) -> Result<Vec<String>, ContentError> {
        let root = self.type_root(content_type);
        let entries = match fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 project directory");
                continue;
            };
            if !name.starts_with('.') {
                ids.push(name);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Metadata object of a variant. Missing or malformed → `NotFound`.
    pub fn get_metadata(
        &self,
        content_type: ContentType,
        variant_id: &str,
    ) -> Result<Metadata, ContentError> {
        let path = self
            .project_dir(content_type, variant_id)
            .join(content_type.metadata_file());
        let Some(value) = read_json(&path)? else {
            return Err(ContentError::NotFound(format!("{content_type}/{variant_id}")));
        };
        match value {
            Value::Object(map) => Ok(map),
            _ => {
                warn!(path = %path.display(), "metadata is not a JSON object");
                Err(ContentError::NotFound(format!("{content_type}/{variant_id}")))
            }
        }
    }

    /// `{id, title}` of every child, in numeric order.
    pub fn list_children(
        &self,
        content_type: ContentType,
        variant_id: &str,
    ) -> Result<Vec<ChildSummary>, ContentError> {
        Ok(self
            .load_children(content_type, variant_id)?
            .iter()
            .map(ChildRecord::summary)
            .collect())
    }

    /// Every readable child of a variant, in numeric order.
    ///
    /// Unreadable child files are skipped with a warning. A missing
    /// collection is empty; a missing project directory is `NotFound`.
    pub fn load_children(
        &self,
        content_type: ContentType,
        variant_id: &str,
    ) -> Result<Vec<ChildRecord>, ContentError> {
        let project_dir = self.project_dir(content_type, variant_id);
        if !project_dir.is_dir() {
            return Err(ContentError::NotFound(format!("{content_type}/{variant_id}")));
        }

        let mut children = match content_type.children() {
            ChildCollection::Directory { dir, prefix } => {
                read_child_directory(&project_dir.join(dir), prefix)?
            }
            ChildCollection::Storyboard => read_storyboard(&project_dir.join(STORYBOARD_FILE))?,
            ChildCollection::None => return Err(ContentError::NoChildren(content_type)),
        };
        children.sort_by_key(|c| c.id);
        Ok(children)
    }

    pub fn get_child(
        &self,
        content_type: ContentType,
        variant_id: &str,
        child_id: u32,
    ) -> Result<ChildRecord, ContentError> {
        self.load_children(content_type, variant_id)?
            .into_iter()
            .find(|c| c.id == child_id)
            .ok_or_else(|| ContentError::NotFound(format!("{content_type}/{variant_id}/{child_id}")))
    }

    /// Write the metadata file, creating the variant directory if needed.
    pub fn save_metadata(
        &self,
        content_type: ContentType,
        variant_id: &str,
        metadata: &Metadata,
    ) -> Result<(), ContentError> {
        let dir = self.project_dir(content_type, variant_id);
        fs::create_dir_all(&dir)?;
        write_json(&dir.join(content_type.metadata_file()), metadata)
    }

    /// Write one child. Storyboard children are upserted by id.
    pub fn save_child(
        &self,
        content_type: ContentType,
        variant_id: &str,
        child: &ChildRecord,
    ) -> Result<(), ContentError> {
        let project_dir = self.project_dir(content_type, variant_id);
        match content_type.children() {
            ChildCollection::Directory { dir, prefix } => {
                let dir = project_dir.join(dir);
                fs::create_dir_all(&dir)?;
                write_json(&dir.join(child_file_name(prefix, child.id)), child)
            }
            ChildCollection::Storyboard => {
                fs::create_dir_all(&project_dir)?;
                let path = project_dir.join(STORYBOARD_FILE);
                let mut storyboard = match read_json_strict(&path)? {
                    Some(Value::Object(map)) => map,
                    Some(_) | None => Map::new(),
                };
                upsert_episode(&mut storyboard, child)?;
                write_json(&path, &storyboard)
            }
            ChildCollection::None => Err(ContentError::NoChildren(content_type)),
        }
    }

    /// Resolve with fallback and load metadata plus every child.
    pub fn load_project(
        &self,
        content_type: ContentType,
        base_id: &str,
        language: Option<&str>,
    ) -> Result<ProjectRecord, ContentError> {
        let resolved = self.resolve(content_type, base_id, language)?;
        let metadata = self.get_metadata(content_type, &resolved.variant_id)?;
        let children = if content_type.has_children() {
            self.load_children(content_type, &resolved.variant_id)?
        } else {
            Vec::new()
        };
        Ok(ProjectRecord {
            id: resolved.variant_id,
            content_type,
            language: resolved.language,
            metadata,
            children,
        })
    }
}

// ============================================================================
// File helpers
// ============================================================================

/// Read a JSON file. Missing or malformed → `Ok(None)` (malformed is logged).
///
/// Bytes go straight to the parser, so invalid UTF-8 is malformed JSON.
fn read_json(path: &Path) -> Result<Option<Value>, ContentError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping malformed JSON");
            Ok(None)
        }
    }
}

/// Read a JSON file that is about to be rewritten. Malformed is an error.
fn read_json_strict(path: &Path) -> Result<Option<Value>, ContentError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ContentError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn read_child_directory(dir: &Path, prefix: &str) -> Result<Vec<ChildRecord>, ContentError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut children = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let Some(value) = read_json(&path)? else {
            continue;
        };
        match ChildRecord::from_json(value, child_number(name, prefix)) {
            Some(child) => children.push(child),
            None => warn!(path = %path.display(), "skipping child without a usable id"),
        }
    }
    Ok(children)
}

fn read_storyboard(path: &Path) -> Result<Vec<ChildRecord>, ContentError> {
    let Some(value) = read_json(path)? else {
        return Ok(Vec::new());
    };
    let Some(episodes) = value.get("episodes").and_then(Value::as_array) else {
        warn!(path = %path.display(), "storyboard has no episodes array");
        return Ok(Vec::new());
    };

    let mut children = Vec::new();
    for (index, episode) in episodes.iter().enumerate() {
        let position = u32::try_from(index + 1).ok();
        match ChildRecord::from_json(episode.clone(), position) {
            Some(child) => children.push(child),
            None => warn!(path = %path.display(), index, "skipping unreadable storyboard episode"),
        }
    }
    Ok(children)
}

/// Replace or insert `child` in `storyboard.episodes`, keeping numeric order.
fn upsert_episode(storyboard: &mut Map<String, Value>, child: &ChildRecord) -> Result<(), ContentError> {
    let mut episodes = match storyboard.remove("episodes") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    episodes.retain(|e| e.get("id").and_then(child_id_of) != Some(child.id));
    episodes.push(serde_json::to_value(child)?);
    episodes.sort_by_key(|e| e.get("id").and_then(child_id_of).unwrap_or(u32::MAX));
    storyboard.insert("episodes".to_string(), Value::Array(episodes));
    Ok(())
}
