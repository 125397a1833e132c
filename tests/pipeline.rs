//! End-to-end pipeline over a fresh project root: config → fabricate → manifest → sites → plan.

use ip_factory::config::{self, CONFIG_FILE};
use ip_factory::content::ContentType;
use ip_factory::distribution::{self, DistributionPlanner};
use ip_factory::generator::{self, Brief, PhraseTranslator, PlaceholderText};
use ip_factory::manifest::{self, ManifestAggregator};
use ip_factory::query::{Queries, Response};
use ip_factory::repository::ContentRepository;
use ip_factory::site::SiteBuilder;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"
[languages]
default = "zh"
supported = ["zh", "en", "jp"]

[site]
title = "Pipeline Test"

[generation]
chapters = 12
episodes = 3
panels_per_episode = 2

[distribution]
languages = ["en", "jp"]
"#;

fn project_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(CONFIG_FILE), CONFIG).unwrap();
    tmp
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("could not read {rel}: {e}"))
}

#[test]
fn fabricate_aggregate_build_distribute() {
    let tmp = project_root();
    let root = tmp.path();
    let config = config::load_config(root).unwrap();
    let catalog = config.catalog().unwrap();
    let data_root = config.data_root_in(root);
    let repo = ContentRepository::new(&data_root, &catalog);

    let brief = Brief {
        idea: Some("Lanterns".to_string()),
        genre: Some("Mystery".to_string()),
    };
    let written = generator::fabricate(
        &repo,
        &PlaceholderText::new(&config.generation),
        &PhraseTranslator,
        ContentType::Ip,
        "ip-1",
        &brief,
    )
    .unwrap();
    assert_eq!(written.len(), 12);

    // A translation disappears: every consumer but distribution falls back.
    fs::remove_dir_all(data_root.join("novel/ip-1-novel-jp")).unwrap();

    let manifest = ManifestAggregator::new(&repo).aggregate().unwrap();
    let ids = |t: ContentType, lang: &str| -> Vec<String> {
        manifest
            .bucket(t, lang)
            .iter()
            .map(|e| e.id.clone())
            .collect()
    };
    assert_eq!(ids(ContentType::Novel, "zh"), vec!["ip-1-novel"]);
    assert_eq!(ids(ContentType::Novel, "en"), vec!["ip-1-novel-en"]);
    assert!(ids(ContentType::Novel, "jp").is_empty());
    assert_eq!(ids(ContentType::Ip, "jp"), vec!["ip-1-jp"]);

    let manifest_path = manifest::write_manifest(&data_root, &manifest).unwrap();
    assert!(manifest_path.ends_with("site-network/manifest.json"));
    assert_eq!(manifest::read_manifest(&data_root).unwrap(), manifest);

    // Sites
    let site_dir = config.site_dir_in(root);
    let report = SiteBuilder::new(&repo, &manifest, &config.site)
        .build(&site_dir)
        .unwrap();
    assert!(report.skipped.is_empty());
    // novel in zh and en, drama and comic in all three
    assert_eq!(report.child_pages(), 12 * 2 + 3 * 3 + 3 * 3);

    let chapter = read(&site_dir, "novel-site-en/ip-1-novel-en/chapter-10.html");
    assert!(chapter.contains(r#"href="chapter-9.html""#));
    assert!(chapter.contains(r#"href="chapter-11.html""#));

    let ip_jp = read(&site_dir, "ip-site-jp/ip-1-jp/index.html");
    assert!(ip_jp.contains("../../novel-site/ip-1-novel/index.html"));
    assert!(ip_jp.contains("../../comic-site-jp/ip-1-comic-jp/index.html"));

    let network = read(&site_dir, "network/index.html");
    assert!(network.contains("Pipeline Test"));

    // Queries fall back too
    let queries = Queries::new(&repo);
    let novel = queries.get(ContentType::Novel, "ip-1-novel", Some("jp")).unwrap();
    assert_eq!(novel["metadata"]["language"], "zh");
    assert_eq!(novel["chapters"].as_array().unwrap().len(), 12);
    let miss = Response::from_result(queries.child(ContentType::Novel, "ip-1-novel", Some("en"), 13));
    assert_eq!(miss.status, 404);

    // Distribution does not
    let plan = DistributionPlanner::new(&repo, &config.distribution.languages)
        .unwrap()
        .plan()
        .unwrap();
    assert_eq!(plan.planned.len(), 5);
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].base_id, "ip-1-novel");
    assert_eq!(plan.skipped[0].language, "jp");

    let plan_path = distribution::write_plan(&data_root, &plan).unwrap();
    let plan_json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&plan_path).unwrap()).unwrap();
    assert_eq!(plan_json["planned"][0]["units"].as_array().unwrap().len(), 12);
}

#[test]
fn rebuild_is_byte_identical() {
    let tmp = project_root();
    let root = tmp.path();
    let config = config::load_config(root).unwrap();
    let catalog = config.catalog().unwrap();
    let data_root = config.data_root_in(root);
    let repo = ContentRepository::new(&data_root, &catalog);

    generator::fabricate(
        &repo,
        &PlaceholderText::new(&config.generation),
        &PhraseTranslator,
        ContentType::Drama,
        "drama-1",
        &Brief::default(),
    )
    .unwrap();

    let build = || {
        let manifest = ManifestAggregator::new(&repo).aggregate().unwrap();
        manifest::write_manifest(&data_root, &manifest).unwrap();
        SiteBuilder::new(&repo, &manifest, &config.site)
            .build(&config.site_dir_in(root))
            .unwrap();
        (
            read(&data_root, "site-network/manifest.json"),
            read(root, "sites/drama-site-jp/drama-1-jp/episode-2.html"),
        )
    };
    assert_eq!(build(), build());
}

#[test]
fn bad_catalog_is_a_config_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(CONFIG_FILE),
        "[languages]\ndefault = \"de\"\nsupported = [\"zh\", \"en\"]\n",
    )
    .unwrap();
    let config = config::load_config(tmp.path()).unwrap();
    assert!(config.catalog().is_err());
}
