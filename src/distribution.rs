//! Distribution planning.
//!
//! For every base IP, plans one render job per linked project per target
//! language. Resolution is strict: a translated job needs translated text, so
//! a missing variant is recorded as skipped instead of silently reusing the
//! default language.
//!
//! ```text
//! ip-1/ip.json {novelId: novel-1, dramaId: drama-a, comicId: comic-1}
//! languages = [en, fr]
//!
//! planned  novel  novel-1 en → novel-1-en   novel-scroll     units [1, 2, 10]
//! skipped  novel  novel-1 fr   (novel-1-fr not found)
//! ...
//! ```

use crate::content::{ContentType, Metadata};
use crate::repository::{ContentError, ContentRepository};
use crate::resolve::Fallback;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Location of the distribution manifest, relative to the data root.
pub const DISTRIBUTION_PATH: &str = "distribution/manifest.json";

/// The ip.json keys that link to projects, with the type each one names.
const LINKS: [(&str, ContentType); 3] = [
    ("novelId", ContentType::Novel),
    ("dramaId", ContentType::Drama),
    ("comicId", ContentType::Comic),
];

#[derive(Error, Debug)]
pub enum DistributionError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported distribution language: {0}")]
    UnsupportedLanguage(String),
}

/// Video template a project type is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    NovelScroll,
    DramaNarration,
    ComicSlideshow,
}

impl Template {
    pub fn for_type(content_type: ContentType) -> Option<Self> {
        match content_type {
            ContentType::Novel => Some(Template::NovelScroll),
            ContentType::Drama => Some(Template::DramaNarration),
            ContentType::Comic => Some(Template::ComicSlideshow),
            ContentType::Game | ContentType::Ip => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedEntry {
    pub ip_id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub base_id: String,
    pub language: String,
    /// Variant id the job reads from.
    pub source: String,
    pub template: Template,
    /// Child ids in numeric order.
    pub units: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub ip_id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub base_id: String,
    pub language: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionPlan {
    pub languages: Vec<String>,
    pub planned: Vec<PlannedEntry>,
    pub skipped: Vec<SkippedEntry>,
}

pub struct DistributionPlanner<'r, 'a> {
    repo: &'r ContentRepository<'a>,
    languages: Vec<String>,
}

impl<'r, 'a> DistributionPlanner<'r, 'a> {
    /// Every target language must be in the repository's catalog.
    pub fn new(repo: &'r ContentRepository<'a>, languages: &[String]) -> Result<Self, DistributionError> {
        if let Some(unknown) = languages.iter().find(|l| !repo.catalog().contains(l)) {
            return Err(DistributionError::UnsupportedLanguage(unknown.clone()));
        }
        Ok(Self {
            repo,
            languages: languages.to_vec(),
        })
    }

    pub fn plan(&self) -> Result<DistributionPlan, DistributionError> {
        let catalog = self.repo.catalog();
        let mut plan = DistributionPlan {
            languages: self.languages.clone(),
            ..Default::default()
        };

        for ip_id in self.repo.list_variants(ContentType::Ip)? {
            if !catalog.is_default(catalog.language_of(&ip_id)) {
                continue;
            }
            let metadata = match self.repo.get_metadata(ContentType::Ip, &ip_id) {
                Ok(m) => m,
                Err(e) => {
                    warn!(%ip_id, error = %e, "skipping IP without readable ip.json");
                    continue;
                }
            };
            self.plan_ip(&ip_id, &metadata, &mut plan)?;
        }

        info!(
            planned = plan.planned.len(),
            skipped = plan.skipped.len(),
            "distribution plan ready"
        );
        Ok(plan)
    }

    fn plan_ip(
        &self,
        ip_id: &str,
        metadata: &Metadata,
        plan: &mut DistributionPlan,
    ) -> Result<(), DistributionError> {
        for (key, content_type) in LINKS {
            let Some(base_id) = metadata
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
            else {
                continue;
            };
            let Some(template) = Template::for_type(content_type) else {
                continue;
            };

            for language in &self.languages {
                let skip = |reason: String| SkippedEntry {
                    ip_id: ip_id.to_string(),
                    content_type,
                    base_id: base_id.to_string(),
                    language: language.clone(),
                    reason,
                };

                let resolved = match self.repo.resolve_with(
                    content_type,
                    base_id,
                    Some(language),
                    Fallback::Strict,
                ) {
                    Ok(r) => r,
                    Err(e) if e.is_not_found() => {
                        plan.skipped.push(skip(e.to_string()));
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };

                match self.repo.list_children(content_type, &resolved.variant_id) {
                    Ok(children) => plan.planned.push(PlannedEntry {
                        ip_id: ip_id.to_string(),
                        content_type,
                        base_id: base_id.to_string(),
                        language: language.clone(),
                        source: resolved.variant_id,
                        template,
                        units: children.iter().map(|c| c.id).collect(),
                    }),
                    Err(e) if e.is_not_found() => plan.skipped.push(skip(e.to_string())),
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(())
    }
}

/// Write the plan to `<data_root>/distribution/manifest.json`.
pub fn write_plan(data_root: &Path, plan: &DistributionPlan) -> Result<PathBuf, DistributionError> {
    let path = data_root.join(DISTRIBUTION_PATH);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(plan)?)?;
    Ok(path)
}
