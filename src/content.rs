//! Content types and the records stored on disk for each of them.
//!
//! ```text
//! <data_root>/
//! ├── novel/novel-1/           metadata.json + chapters/chapter-N.json
//! ├── drama/drama-1-en/        metadata.json + episodes/episode-N.json
//! ├── comic/comic-1/           metadata.json + storyboard.json (+ images/)
//! ├── game/game-1/             metadata.json
//! └── ip/ip-1/                 ip.json
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Free-form metadata object as written by the generators.
pub type Metadata = Map<String, Value>;

/// The kinds of project the factory produces.
///
/// Ordering follows declaration order, which is also manifest key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Novel,
    Drama,
    Comic,
    Game,
    Ip,
}

/// Where a content type keeps its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildCollection {
    /// One JSON file per child: `<dir>/<prefix>-N.json`.
    Directory {
        dir: &'static str,
        prefix: &'static str,
    },
    /// The `episodes` array inside `storyboard.json`.
    Storyboard,
    /// The type has no children.
    None,
}

pub const STORYBOARD_FILE: &str = "storyboard.json";

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Novel,
        ContentType::Drama,
        ContentType::Comic,
        ContentType::Game,
        ContentType::Ip,
    ];

    /// Directory name under the data root.
    pub fn dir_name(self) -> &'static str {
        match self {
            ContentType::Novel => "novel",
            ContentType::Drama => "drama",
            ContentType::Comic => "comic",
            ContentType::Game => "game",
            ContentType::Ip => "ip",
        }
    }

    pub fn metadata_file(self) -> &'static str {
        match self {
            ContentType::Ip => "ip.json",
            _ => "metadata.json",
        }
    }

    pub fn children(self) -> ChildCollection {
        match self {
            ContentType::Novel => ChildCollection::Directory {
                dir: "chapters",
                prefix: "chapter",
            },
            ContentType::Drama => ChildCollection::Directory {
                dir: "episodes",
                prefix: "episode",
            },
            ContentType::Comic => ChildCollection::Storyboard,
            ContentType::Game | ContentType::Ip => ChildCollection::None,
        }
    }

    pub fn has_children(self) -> bool {
        self.children() != ChildCollection::None
    }

    /// Key the child list is exposed under in query results.
    pub fn collection_key(self) -> Option<&'static str> {
        match self {
            ContentType::Novel => Some("chapters"),
            ContentType::Drama | ContentType::Comic => Some("episodes"),
            ContentType::Game | ContentType::Ip => None,
        }
    }

    /// File name prefix for child pages on the static site.
    pub fn page_prefix(self) -> Option<&'static str> {
        match self {
            ContentType::Novel => Some("chapter"),
            ContentType::Drama | ContentType::Comic => Some("episode"),
            ContentType::Game | ContentType::Ip => None,
        }
    }

    /// Human-readable label ("Novel", "Drama", ...).
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Novel => "Novel",
            ContentType::Drama => "Drama",
            ContentType::Comic => "Comic",
            ContentType::Game => "Game",
            ContentType::Ip => "IP",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|t| t.dir_name() == s)
            .ok_or_else(|| format!("unknown content type '{s}' (expected novel, drama, comic, game or ip)"))
    }
}

/// One chapter or episode.
///
/// The body is stored under `content`; `body` is accepted on read. Fields the
/// generator added beyond these (panels, scenes, ...) survive a rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "content", alias = "body", default)]
    pub body: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChildRecord {
    pub fn new(id: u32, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            extra: Map::new(),
        }
    }

    /// Parse a child from raw JSON.
    ///
    /// The `id` may be a number or a numeric string. When it is missing or
    /// unusable, `fallback_id` (the number in the file name) is used instead.
    /// Returns `None` when no id can be determined or the value is not an object.
    pub fn from_json(value: Value, fallback_id: Option<u32>) -> Option<Self> {
        let Value::Object(mut object) = value else {
            return None;
        };
        let id = object.get("id").and_then(child_id_of).or(fallback_id)?;
        object.insert("id".to_string(), Value::from(id));
        serde_json::from_value(Value::Object(object)).ok()
    }

    pub fn summary(&self) -> ChildSummary {
        ChildSummary {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

/// Accept `3` or `"3"` as a child id; ids start at 1.
pub(crate) fn child_id_of(value: &Value) -> Option<u32> {
    let id = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }?;
    (id >= 1).then_some(id)
}

/// Child listing entry: `{id, title}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildSummary {
    pub id: u32,
    pub title: String,
}

/// A fully loaded project variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub language: String,
    pub metadata: Metadata,
    pub children: Vec<ChildRecord>,
}

impl ProjectRecord {
    /// Metadata `title`, falling back to `ipId` and then the variant id.
    pub fn title(&self) -> &str {
        metadata_title(&self.metadata).unwrap_or(&self.id)
    }
}

/// Display title from a metadata object: `title`, then `ipId`.
pub fn metadata_title(metadata: &Metadata) -> Option<&str> {
    ["title", "ipId"]
        .iter()
        .filter_map(|key| metadata.get(*key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}
