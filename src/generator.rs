//! Placeholder content generation.
//!
//! Two seams keep generation swappable: [`TextGenerator`] writes the
//! default-language project, [`Translator`] derives every other language from
//! it. [`fabricate`] drives both and writes one variant per catalog language.
//!
//! Output is deterministic: no timestamps, no randomness. Fabricating the same
//! project twice rewrites identical files.

use crate::config::GenerationConfig;
use crate::content::{ChildRecord, ContentType, Metadata};
use crate::repository::{ContentError, ContentRepository};
use serde_json::{Value, json};
use tracing::info;

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct Brief {
    pub idea: Option<String>,
    pub genre: Option<String>,
}

/// Produces default-language metadata and children for a project.
pub trait TextGenerator {
    fn metadata(&self, content_type: ContentType, id: &str, brief: &Brief) -> Metadata;
    fn children(&self, content_type: ContentType, brief: &Brief) -> Vec<ChildRecord>;
}

/// Translates text into a catalog language.
pub trait Translator {
    fn translate(&self, text: &str, language: &str) -> String;

    /// Translate every string in a JSON value, leaving identifier keys alone.
    fn translate_value(&self, value: &Value, language: &str) -> Value {
        match value {
            Value::String(s) => Value::String(self.translate(s, language)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.translate_value(item, language))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, v)| {
                        let v = if IDENTIFIER_KEYS.contains(&key.as_str()) {
                            v.clone()
                        } else {
                            self.translate_value(v, language)
                        };
                        (key.clone(), v)
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Keys whose values are ids or codes, never prose.
pub const IDENTIFIER_KEYS: [&str; 8] = [
    "id",
    "ipId",
    "novelId",
    "dramaId",
    "comicId",
    "gameId",
    "sourceNovelId",
    "language",
];

// ============================================================================
// Placeholder text
// ============================================================================

/// Templated placeholder prose sized by `[generation]`.
pub struct PlaceholderText {
    chapters: u32,
    episodes: u32,
    panels_per_episode: u32,
}

impl PlaceholderText {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            chapters: config.chapters,
            episodes: config.episodes,
            panels_per_episode: config.panels_per_episode,
        }
    }
}

const DEFAULT_GENRE: &str = "Xianxia";
const DEFAULT_IDEA: &str =
    "A young programmer transmigrates into a cultivation world with a coding system.";

/// `"Novel: <first 20 chars of idea>..."`, or the stock title without an idea.
fn working_title(label: &str, brief: &Brief, stock: &str) -> String {
    match brief.idea.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
        Some(idea) if idea.chars().count() > 20 => {
            let head: String = idea.chars().take(20).collect();
            format!("{label}: {head}...")
        }
        Some(idea) => format!("{label}: {idea}"),
        None => stock.to_string(),
    }
}

impl TextGenerator for PlaceholderText {
    fn metadata(&self, content_type: ContentType, id: &str, brief: &Brief) -> Metadata {
        let genre = brief.genre.as_deref().unwrap_or(DEFAULT_GENRE);
        let idea = brief.idea.as_deref().unwrap_or(DEFAULT_IDEA);

        let value = match content_type {
            ContentType::Novel => json!({
                "id": id,
                "title": working_title("Novel", brief, "The Legend of the Code Master"),
                "author": "IP Factory",
                "genre": genre,
                "tags": ["Cultivation", "System", genre],
                "description": idea,
                "status": "completed",
            }),
            ContentType::Drama => json!({
                "id": id,
                "title": working_title("Drama", brief, "Sample Drama Title"),
                "author": "IP Factory",
                "genre": genre,
                "tags": ["Romance", "Revenge", "Drama Adaptation"],
                "description": idea,
                "status": "completed",
            }),
            ContentType::Comic => json!({
                "id": id,
                "title": working_title("Comic", brief, "Sample Comic Title"),
                "author": "IP Factory",
                "genre": genre,
                "description": idea,
                "status": "completed",
            }),
            ContentType::Game => json!({
                "id": id,
                "gameId": id,
                "title": working_title("Game", brief, "Sample Interactive Story"),
                "mode": "if",
                "logline": idea,
                "genre": genre,
            }),
            ContentType::Ip => json!({
                "ipId": id,
                "title": working_title("IP", brief, id),
                "idea": idea,
                "genre": genre,
                "games": [],
            }),
        };

        match value {
            Value::Object(map) => map,
            _ => Metadata::new(),
        }
    }

    fn children(&self, content_type: ContentType, _brief: &Brief) -> Vec<ChildRecord> {
        match content_type {
            ContentType::Novel => (1..=self.chapters)
                .map(|i| {
                    let mut chapter = ChildRecord::new(
                        i,
                        format!("Chapter {i}"),
                        format!("This is the content for chapter {i}. ").repeat(5),
                    );
                    chapter.extra.insert("wordCount".into(), json!(40));
                    chapter
                })
                .collect(),
            ContentType::Drama => (1..=self.episodes)
                .map(|i| {
                    ChildRecord::new(
                        i,
                        format!("Episode {i}"),
                        format!("This is the content for episode {i}. ").repeat(3),
                    )
                })
                .collect(),
            ContentType::Comic => (1..=self.episodes)
                .map(|i| {
                    let mut episode = ChildRecord::new(
                        i,
                        format!("Episode {i}"),
                        format!("Scene for Episode {i}: The plot advances."),
                    );
                    let panels: Vec<Value> = (1..=self.panels_per_episode)
                        .map(|j| json!({ "id": j, "description": format!("Panel {j} of episode {i}") }))
                        .collect();
                    episode.extra.insert("panels".into(), Value::Array(panels));
                    episode
                })
                .collect(),
            ContentType::Game | ContentType::Ip => Vec::new(),
        }
    }
}

// ============================================================================
// Phrase translator
// ============================================================================

/// Keyword replacement from a fixed phrase table.
///
/// Text with no known keyword is tagged `[lang] ` so translated variants are
/// visibly distinct. English passes through untouched.
pub struct PhraseTranslator;

fn phrases(language: &str) -> &'static [(&'static str, &'static str)] {
    match language {
        "zh" => &[("Novel", "小说"), ("Drama", "短剧"), ("Comic", "漫画"), ("Chapter", "章节"), ("Episode", "集")],
        "jp" => &[("Novel", "小説"), ("Drama", "ドラマ"), ("Comic", "漫画"), ("Chapter", "章"), ("Episode", "話")],
        "kr" => &[("Novel", "소설"), ("Drama", "드라마"), ("Comic", "만화"), ("Chapter", "장"), ("Episode", "화")],
        "es" => &[("Novel", "Novela"), ("Comic", "Cómic"), ("Chapter", "Capítulo"), ("Episode", "Episodio")],
        "fr" => &[("Novel", "Roman"), ("Drama", "Drame"), ("Comic", "Bande Dessinée"), ("Chapter", "Chapitre"), ("Episode", "Épisode")],
        "de" => &[("Novel", "Roman"), ("Chapter", "Kapitel")],
        "it" => &[("Novel", "Romanzo"), ("Drama", "Dramma"), ("Comic", "Fumetto"), ("Chapter", "Capitolo"), ("Episode", "Episodio")],
        "hi" => &[("Novel", "उपन्यास"), ("Drama", "नाटक"), ("Comic", "कॉमिक"), ("Chapter", "अध्याय"), ("Episode", "कड़ी")],
        "ar" => &[("Novel", "رواية"), ("Drama", "دراما"), ("Comic", "قصة مصورة"), ("Chapter", "فصل"), ("Episode", "حلقة")],
        _ => &[],
    }
}

impl Translator for PhraseTranslator {
    fn translate(&self, text: &str, language: &str) -> String {
        if text.is_empty() || language == "en" {
            return text.to_string();
        }
        let translated = phrases(language)
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to));
        if translated == text {
            format!("[{language}] {text}")
        } else {
            translated
        }
    }
}

// ============================================================================
// Fabrication
// ============================================================================

/// One variant written by [`fabricate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FabricatedProject {
    pub content_type: ContentType,
    pub variant_id: String,
    pub language: String,
    pub children: usize,
}

/// Write `base_id` in every catalog language.
///
/// The default language comes straight from the generator; every other
/// language is the translator's rendition of it, stored at the suffixed
/// variant id with `language` recorded in its metadata. An `ip` first
/// fabricates `<id>-novel`, `<id>-drama` and `<id>-comic` and links them.
///
/// `base_id` must not carry a language suffix: `story-en` would put the
/// default variant where the English one belongs.
pub fn fabricate(
    repo: &ContentRepository,
    generator: &dyn TextGenerator,
    translator: &dyn Translator,
    content_type: ContentType,
    base_id: &str,
    brief: &Brief,
) -> Result<Vec<FabricatedProject>, ContentError> {
    if repo.catalog().base_of(base_id) != base_id {
        return Err(ContentError::NotABaseId(base_id.to_string()));
    }
    let mut written = Vec::new();
    let mut metadata = generator.metadata(content_type, base_id, brief);

    if content_type == ContentType::Ip {
        for (key, linked_type) in [
            ("novelId", ContentType::Novel),
            ("dramaId", ContentType::Drama),
            ("comicId", ContentType::Comic),
        ] {
            let linked_id = format!("{base_id}-{linked_type}");
            written.extend(fabricate(repo, generator, translator, linked_type, &linked_id, brief)?);
            metadata.insert(key.to_string(), json!(linked_id));
        }
    }

    let children = generator.children(content_type, brief);
    let catalog = repo.catalog();

    let default = catalog.default_language();
    metadata.insert("language".into(), json!(default));
    written.push(write_variant(repo, content_type, base_id, default, &metadata, &children)?);

    for language in catalog.non_default() {
        let variant_id = catalog.variant_id(base_id, language);
        let mut translated = match translator.translate_value(&Value::Object(metadata.clone()), language) {
            Value::Object(map) => map,
            _ => metadata.clone(),
        };
        translated.insert("language".into(), json!(language));
        if translated.contains_key("id") {
            translated.insert("id".into(), json!(variant_id));
        }
        if content_type == ContentType::Ip {
            for key in ["novelId", "dramaId", "comicId"] {
                if let Some(linked) = metadata.get(key).and_then(Value::as_str) {
                    translated.insert(key.into(), json!(catalog.variant_id(linked, language)));
                }
            }
        }

        let translated_children: Vec<ChildRecord> = children
            .iter()
            .map(|child| translate_child(translator, child, language))
            .collect::<Result<_, ContentError>>()?;
        written.push(write_variant(
            repo,
            content_type,
            &variant_id,
            language,
            &translated,
            &translated_children,
        )?);
    }

    info!(%content_type, base_id, variants = catalog.languages().len(), "fabricated");
    Ok(written)
}

fn translate_child(
    translator: &dyn Translator,
    child: &ChildRecord,
    language: &str,
) -> Result<ChildRecord, ContentError> {
    let value = translator.translate_value(&serde_json::to_value(child)?, language);
    Ok(ChildRecord::from_json(value, Some(child.id)).unwrap_or_else(|| child.clone()))
}

fn write_variant(
    repo: &ContentRepository,
    content_type: ContentType,
    variant_id: &str,
    language: &str,
    metadata: &Metadata,
    children: &[ChildRecord],
) -> Result<FabricatedProject, ContentError> {
    repo.save_metadata(content_type, variant_id, metadata)?;
    for child in children {
        repo.save_child(content_type, variant_id, child)?;
    }
    Ok(FabricatedProject {
        content_type,
        variant_id: variant_id.to_string(),
        language: language.to_string(),
        children: children.len(),
    })
}
