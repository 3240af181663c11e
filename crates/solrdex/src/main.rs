//! `solrdex` command line tool
//!
//! Drives a Solr core the way the host application would: health check,
//! maintenance, indexing a single local file, removal and search.

mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use solrdex::SolrPlatform;
use solrdex_config::{
    ApplicationConfig, ConfigurationLoader, EnvironmentSource, TomlFileSource,
};
use solrdex_document::{
    DocumentAccess, IndexDocument, IndexStatus, SearchRequest, resolve_local_path,
};
use solrdex_indexing::TracingRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Index and search documents in a Solr core
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML); defaults to the user config directory
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a daily rotating file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the effective configuration with secrets masked
    Config,
    /// Check that the core answers
    Ping,
    /// Merge index segments
    Optimize,
    /// Delete every document of a provider, or of all providers with `all`
    Reset {
        provider: String,
    },
    /// Index one local file
    Index {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        id: String,
        /// File to extract; relative to `--mount-root` when given
        #[arg(long)]
        file: String,
        /// Root of the storage the file path is relative to
        #[arg(long)]
        mount_root: Option<PathBuf>,
        /// Title; defaults to the file name
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        owner: String,
        #[arg(long = "user")]
        users: Vec<String>,
        #[arg(long = "group")]
        groups: Vec<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Remove one document from the index
    Remove {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        id: String,
    },
    /// Search the index
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// User the search runs for
        #[arg(long, default_value = "admin")]
        viewer: String,
    },
    /// Show the stored fields of one indexed document
    Get {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        id: String,
    },
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("solrdex").join("solrdex.toml"))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ApplicationConfig> {
    let mut loader = ConfigurationLoader::new();
    match path {
        Some(path) => loader = loader.add_source(Box::new(TomlFileSource::new(path))),
        None => {
            if let Some(path) = default_config_file() {
                loader = loader.add_source(Box::new(TomlFileSource::optional(path)));
            }
        }
    }
    loader
        .add_source(Box::new(EnvironmentSource))
        .load()
        .context("Failed to load configuration")
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    solrdex_common::initialize_environment();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let log_dir = args
        .log_dir
        .clone()
        .or_else(|| config.telemetry.log_dir.as_ref().map(PathBuf::from));
    let _guards = logging::init(&config.telemetry, log_dir.as_deref())?;

    if matches!(args.command, Command::Config) {
        print!("{}", config.to_safe_toml()?);
        return Ok(());
    }

    let platform = SolrPlatform::load(config)?.with_runner(Arc::new(TracingRunner));
    run(&platform, args.command, args.output).await
}

async fn run(
    platform: &SolrPlatform,
    command: Command,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let json = output == OutputFormat::Json;
    match command {
        Command::Config => {}
        Command::Ping => {
            let healthy = platform.test().await?;
            let shown = platform.configuration();
            if json {
                print_json(&serde_json::json!({ "configuration": shown, "healthy": healthy }))?;
            } else {
                let state = if healthy { "OK" } else { "NOT OK" };
                println!(
                    "{} core '{}' at {}: {state}",
                    platform.name(),
                    shown.core,
                    shown.servlet
                );
            }
            if !healthy {
                anyhow::bail!("Core did not report OK");
            }
        }
        Command::Optimize => {
            let response = platform.optimize().await?;
            if json {
                print_json(&response.json()?)?;
            } else {
                println!("Optimize requested");
            }
        }
        Command::Reset { provider } => {
            let response = platform.reset_index(&provider).await?;
            if json {
                print_json(&response.json()?)?;
            } else {
                println!("Index reset for '{provider}'");
            }
        }
        Command::Index {
            provider,
            id,
            file,
            mount_root,
            title,
            owner,
            users,
            groups,
            tags,
        } => {
            let path = match &mount_root {
                Some(root) => resolve_local_path(root, &file),
                None => PathBuf::from(&file),
            };
            let title = title.unwrap_or_else(|| {
                path.file_name()
                    .map_or_else(|| file.clone(), |name| name.to_string_lossy().into_owned())
            });

            let mut access = DocumentAccess::new(owner);
            access.users.extend(users);
            access.groups.extend(groups);

            let mut document = IndexDocument::new(provider, id)
                .with_title(title)
                .with_local_path(path)
                .with_access(access)
                .with_status(IndexStatus::FULL);
            document.tags.extend(tags);

            let status = platform.index_document(&mut document).await;
            if json {
                print_json(&document.index)?;
            } else {
                for error in &document.index.errors {
                    eprintln!("{}: {}", error.exception, error.message);
                }
            }
            if status != IndexStatus::DONE {
                anyhow::bail!("Document '{}' was not indexed", document.id);
            }
            if !json {
                println!("Indexed '{}'", document.title);
            }
        }
        Command::Remove { provider, id } => {
            let removed = platform
                .delete_indexes(&[(provider.as_str(), id.as_str())])
                .await?;
            if json {
                print_json(&serde_json::json!({ "removed": removed }))?;
            } else {
                println!("Removed {removed} document(s)");
            }
        }
        Command::Search {
            query,
            page,
            size,
            tags,
            viewer,
        } => {
            let mut request = SearchRequest::new(query).with_page(page).with_size(size);
            request.tags.extend(tags);
            let result = platform
                .search(&request, &DocumentAccess::for_viewer(viewer))
                .await?;

            if json {
                print_json(&result)?;
            } else {
                println!("{} hit(s) in {} ms", result.total, result.time);
                for document in &result.documents {
                    println!(
                        "{:>4}%  {}!{}  {}",
                        document.score.unwrap_or_default(),
                        document.provider_id,
                        document.id,
                        document.title
                    );
                    for excerpt in &document.excerpts {
                        println!("       {excerpt}");
                    }
                }
            }
        }
        Command::Get { provider, id } => match platform.get_document(&provider, &id).await? {
            Some(document) if json => print_json(&document)?,
            Some(document) => {
                println!("{}!{}  {}", document.provider_id, document.id, document.title);
                if let Some(access) = &document.access {
                    println!("owner: {}", access.owner_id);
                }
                if !document.tags.is_empty() {
                    let tags: Vec<&str> = document.tags.iter().map(String::as_str).collect();
                    println!("tags: {}", tags.join(", "));
                }
            }
            None => anyhow::bail!("Document '{provider}!{id}' is not indexed"),
        },
    }
    Ok(())
}
