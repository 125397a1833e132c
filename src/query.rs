//! Route-facing queries: list, get, child.
//!
//! Results are plain JSON values shaped for a web API. Failures stay typed as
//! [`ContentError`]; [`Response::from_result`] turns either into a status code
//! plus body, with `{"error": "Not found"}` for misses.

use crate::content::{ChildRecord, ContentType};
use crate::repository::{ContentError, ContentRepository, ErrorBody};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::warn;

pub struct Queries<'r, 'a> {
    repo: &'r ContentRepository<'a>,
}

impl<'r, 'a> Queries<'r, 'a> {
    pub fn new(repo: &'r ContentRepository<'a>) -> Self {
        Self { repo }
    }

    /// Every project of a type, as its metadata object.
    ///
    /// Unreadable metadata becomes `{"id": dir}` (`{"ipId": dir}` for ip);
    /// unreadable games are left out.
    pub fn list(&self, content_type: ContentType) -> Result<Vec<Value>, ContentError> {
        let mut items = Vec::new();
        for id in self.repo.list_variants(content_type)? {
            match self.repo.get_metadata(content_type, &id) {
                Ok(metadata) => items.push(Value::Object(metadata)),
                Err(e) => {
                    if !e.is_not_found() {
                        warn!(%content_type, id, error = %e, "listing project without metadata");
                    }
                    match content_type {
                        ContentType::Game => {}
                        ContentType::Ip => items.push(json!({ "ipId": id })),
                        _ => items.push(json!({ "id": id })),
                    }
                }
            }
        }
        Ok(items)
    }

    /// One project in a language, with its child list.
    ///
    /// ```text
    /// novel  → {"metadata": {...}, "chapters": [{id, title}, ...]}
    /// drama  → {"metadata": {...}, "episodes": [...]}
    /// comic  → {"metadata": {...}, "episodes": [...]}
    /// game   → {"metadata": {...}}
    /// ip     → the ip.json object itself
    /// ```
    pub fn get(
        &self,
        content_type: ContentType,
        base_id: &str,
        language: Option<&str>,
    ) -> Result<Value, ContentError> {
        let resolved = self.repo.resolve(content_type, base_id, language)?;
        let metadata = self.repo.get_metadata(content_type, &resolved.variant_id)?;

        if content_type == ContentType::Ip {
            return Ok(Value::Object(metadata));
        }

        let mut body = Map::new();
        body.insert("metadata".to_string(), Value::Object(metadata));
        if let Some(key) = content_type.collection_key() {
            let children = self.repo.list_children(content_type, &resolved.variant_id)?;
            body.insert(key.to_string(), serde_json::to_value(children)?);
        }
        Ok(Value::Object(body))
    }

    /// One chapter or episode in a language.
    pub fn child(
        &self,
        content_type: ContentType,
        base_id: &str,
        language: Option<&str>,
        child_id: u32,
    ) -> Result<ChildRecord, ContentError> {
        if !content_type.has_children() {
            return Err(ContentError::NoChildren(content_type));
        }
        let resolved = self.repo.resolve(content_type, base_id, language)?;
        self.repo
            .get_child(content_type, &resolved.variant_id, child_id)
    }
}

/// Status code plus JSON body, as a route handler would send it.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn from_result<T: Serialize>(result: Result<T, ContentError>) -> Self {
        let ok = result.and_then(|value| Ok(serde_json::to_value(value)?));
        match ok {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self {
                status: e.status(),
                body: json!(ErrorBody::from(&e)),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn with_queries(f: impl FnOnce(&Queries)) {
        let tmp = setup_fixtures();
        let catalog = test_catalog();
        let repo = ContentRepository::new(tmp.path().join("data"), &catalog);
        f(&Queries::new(&repo));
    }

    // =========================================================================
    // list
    // =========================================================================

    #[test]
    fn list_returns_metadata_objects() {
        with_queries(|q| {
            let novels = q.list(ContentType::Novel).unwrap();
            let titles: Vec<&str> = novels.iter().map(|n| n["title"].as_str().unwrap()).collect();
            assert_eq!(titles, vec!["月光", "Moonlight"]);
        });
    }

    #[test]
    fn list_falls_back_to_id_object() {
        with_queries(|q| {
            let dramas = q.list(ContentType::Drama).unwrap();
            // drama-b-en has no metadata file
            assert_eq!(dramas[2], json!({"id": "drama-b-en"}));
        });
    }

    #[test]
    fn list_drops_unreadable_games() {
        with_queries(|q| {
            let games = q.list(ContentType::Game).unwrap();
            assert_eq!(games.len(), 1);
            assert_eq!(games[0]["id"], "game-1");
        });
    }

    #[test]
    fn list_ip_fallback_uses_ip_id() {
        let tmp = setup_fixtures();
        std::fs::create_dir_all(tmp.path().join("data/ip/ip-9")).unwrap();
        let catalog = test_catalog();
        let repo = ContentRepository::new(tmp.path().join("data"), &catalog);
        let ips = Queries::new(&repo).list(ContentType::Ip).unwrap();
        assert!(ips.contains(&json!({"ipId": "ip-9"})));
    }

    // =========================================================================
    // get
    // =========================================================================

    #[test]
    fn get_novel_in_translation() {
        with_queries(|q| {
            let body = q.get(ContentType::Novel, "novel-1", Some("en")).unwrap();
            assert_eq!(body["metadata"]["title"], "Moonlight");
            let ids: Vec<u64> = body["chapters"]
                .as_array()
                .unwrap()
                .iter()
                .map(|c| c["id"].as_u64().unwrap())
                .collect();
            assert_eq!(ids, vec![1, 2, 10]);
        });
    }

    #[test]
    fn get_falls_back_when_translation_missing() {
        with_queries(|q| {
            let body = q.get(ContentType::Comic, "comic-1", Some("fr")).unwrap();
            assert_eq!(body["metadata"]["id"], "comic-1");
            assert_eq!(body["episodes"].as_array().unwrap().len(), 2);
        });
    }

    #[test]
    fn get_game_and_ip_shapes() {
        with_queries(|q| {
            let game = q.get(ContentType::Game, "game-1", None).unwrap();
            assert_eq!(game, json!({"metadata": {"id": "game-1", "title": "Harbor Run", "language": "zh"}}));
            let ip = q.get(ContentType::Ip, "ip-1", Some("en")).unwrap();
            assert_eq!(ip["title"], "Moon Saga (EN)");
            assert!(ip.get("metadata").is_none());
        });
    }

    #[test]
    fn get_missing_is_404() {
        with_queries(|q| {
            let response = Response::from_result(q.get(ContentType::Novel, "novel-404", Some("en")));
            assert_eq!(response.status, 404);
            assert_eq!(response.body, json!({"error": "Not found"}));
        });
    }

    #[test]
    fn get_unsupported_language_is_400() {
        with_queries(|q| {
            let response = Response::from_result(q.get(ContentType::Novel, "novel-1", Some("de")));
            assert_eq!(response.status, 400);
        });
    }

    // =========================================================================
    // child
    // =========================================================================

    #[test]
    fn child_returns_full_record() {
        with_queries(|q| {
            let child = q.child(ContentType::Drama, "drama-a", Some("en"), 1).unwrap();
            assert_eq!(child.title, "Pilot");
            assert_eq!(child.extra["scenes"], json!(["arrival", "storm"]));
            let response = Response::from_result(Ok(child));
            assert!(response.is_success());
            assert_eq!(response.body["content"], "INT. LIGHTHOUSE - NIGHT");
        });
    }

    #[test]
    fn child_missing_number_is_404() {
        with_queries(|q| {
            let err = q.child(ContentType::Novel, "novel-1", None, 3).unwrap_err();
            assert_eq!(err.status(), 404);
        });
    }

    #[test]
    fn child_of_game_is_400() {
        with_queries(|q| {
            let err = q.child(ContentType::Game, "game-1", None, 1).unwrap_err();
            assert_eq!(err.status(), 400);
        });
    }
}
