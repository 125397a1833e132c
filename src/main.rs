use clap::{Parser, Subcommand};
use ip_factory::content::ContentType;
use ip_factory::distribution::{self, DistributionPlanner};
use ip_factory::generator::{self, Brief, PhraseTranslator, PlaceholderText};
use ip_factory::manifest::{self, ManifestAggregator};
use ip_factory::query::{Queries, Response};
use ip_factory::repository::ContentRepository;
use ip_factory::site::SiteBuilder;
use ip_factory::{config, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ip-factory")]
#[command(about = "Mock content factory for multilingual IP packages")]
#[command(long_about = "\
Mock content factory for multilingual IP packages

Projects are directories of JSON files, one directory per language. The
default language owns the bare id; every other language appends its code.

Data structure:

  data/
  ├── novel/
  │   ├── novel-1/                 # Default language
  │   │   ├── metadata.json
  │   │   └── chapters/chapter-1.json
  │   └── novel-1-en/              # English variant
  ├── drama/drama-1/episodes/episode-1.json
  ├── comic/comic-1/storyboard.json
  ├── game/game-1/metadata.json
  ├── ip/ip-1/ip.json              # Links novelId, dramaId, comicId
  ├── site-network/manifest.json   # Written by 'manifest' and 'build'
  └── distribution/manifest.json   # Written by 'distribute'

A missing translation falls back to the default-language variant everywhere
except the distribution plan, which skips it.

Run 'ip-factory gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project root holding config.toml
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate every content directory into the site-network manifest
    Manifest,
    /// Write the manifest and build every static site
    Build,
    /// List a content type's projects as JSON
    List {
        /// novel, drama, comic, game or ip
        content_type: ContentType,
    },
    /// Show one project, or one chapter/episode, as JSON
    Show {
        content_type: ContentType,
        /// Base project id
        id: String,
        /// Language to resolve (falls back to the default language)
        #[arg(long)]
        lang: Option<String>,
        /// Chapter or episode number
        #[arg(long)]
        child: Option<u32>,
    },
    /// Generate a placeholder project in every configured language
    Fabricate {
        content_type: ContentType,
        /// Base project id
        id: String,
        #[arg(long)]
        idea: Option<String>,
        #[arg(long)]
        genre: Option<String>,
    },
    /// Write the distribution plan for every base IP
    Distribute,
    /// Validate config and content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
        command => {
            init_logging();
            run(&cli.root, command)
        }
    }
}

fn run(root: &Path, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config(root)?;
    let catalog = config.catalog()?;
    let data_root = config.data_root_in(root);
    let repo = ContentRepository::new(&data_root, &catalog);

    match command {
        Command::Manifest => {
            let manifest = ManifestAggregator::new(&repo).aggregate()?;
            let written = manifest::write_manifest(&data_root, &manifest)?;
            output::print_manifest_output(&manifest, &catalog, &written);
        }
        Command::Build => {
            let site_dir = config.site_dir_in(root);

            println!("==> Aggregating {}", data_root.display());
            let manifest = ManifestAggregator::new(&repo).aggregate()?;
            let written = manifest::write_manifest(&data_root, &manifest)?;
            output::print_manifest_output(&manifest, &catalog, &written);

            println!("==> Building sites → {}", site_dir.display());
            let report = SiteBuilder::new(&repo, &manifest, &config.site).build(&site_dir)?;
            output::print_site_output(&report);

            println!("==> Build complete: {}", site_dir.display());
        }
        Command::List { content_type } => {
            let response = Response::from_result(Queries::new(&repo).list(content_type));
            print_response(&response)?;
        }
        Command::Show {
            content_type,
            id,
            lang,
            child,
        } => {
            let queries = Queries::new(&repo);
            let response = match child {
                Some(n) => Response::from_result(queries.child(content_type, &id, lang.as_deref(), n)),
                None => Response::from_result(queries.get(content_type, &id, lang.as_deref())),
            };
            print_response(&response)?;
        }
        Command::Fabricate {
            content_type,
            id,
            idea,
            genre,
        } => {
            let brief = Brief { idea, genre };
            let written = generator::fabricate(
                &repo,
                &PlaceholderText::new(&config.generation),
                &PhraseTranslator,
                content_type,
                &id,
                &brief,
            )?;
            output::print_fabricate_output(&written);
        }
        Command::Distribute => {
            let plan = DistributionPlanner::new(&repo, &config.distribution.languages)?.plan()?;
            let written = distribution::write_plan(&data_root, &plan)?;
            output::print_distribution_output(&plan, &written);
        }
        Command::Check => {
            println!("==> Checking {}", root.display());
            let manifest = ManifestAggregator::new(&repo).aggregate()?;
            output::print_summary(&manifest, &catalog);
            println!("==> Config and content are valid");
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

/// Log diagnostics to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

/// Print a query response as pretty JSON; misses exit non-zero.
fn print_response(response: &Response) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    if !response.is_success() {
        eprintln!("status {}", response.status);
        std::process::exit(1);
    }
    Ok(())
}
