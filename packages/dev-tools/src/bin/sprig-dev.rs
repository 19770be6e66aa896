//! sprig-dev: command line over the item library
//!
//! Talks to the same `LibraryService` a desktop view would, against the
//! database resolved from `SPRIG_DB_PATH` / `~/.sprig/sprig.db` or `--db`.
//! Every command prints JSON on stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! sprig-dev add --title "Fetch Hook" --type snippet --language JavaScript --content "useFetch()"
//! sprig-dev list --search fetch --language JavaScript
//! sprig-dev list --newest-first
//! sprig-dev stats
//!
//! # Verbose logging
//! RUST_LOG=sprig_core=debug sprig-dev list
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sprig_core::{Item, ItemQuery, ItemSort, ItemType, LibraryConfig, LibraryService};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sprig-dev")]
#[command(author, version, about = "Development CLI for the Sprig item library")]
#[command(propagate_version = true)]
struct Cli {
    /// Database file (overrides SPRIG_DB_PATH and the home directory default)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a new item and print its id
    Add {
        #[arg(short, long)]
        title: String,

        /// snippet, function, component or template
        #[arg(short = 'y', long = "type")]
        item_type: ItemType,

        #[arg(short, long, default_value = "")]
        language: String,

        /// Free-form tags, conventionally comma separated
        #[arg(long, default_value = "")]
        tags: String,

        /// Item body
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,

        /// Read the item body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Replace fields of an existing item; omitted fields are kept
    Update {
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'y', long = "type")]
        item_type: Option<ItemType>,

        #[arg(short, long)]
        language: Option<String>,

        #[arg(long)]
        tags: Option<String>,

        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,

        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Permanently delete an item
    Delete { id: i64 },

    /// Print one item
    Get { id: i64 },

    /// List items; search takes precedence over language, language over type
    List {
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(short = 'y', long = "type", default_value = "")]
        item_type: String,

        #[arg(short, long, default_value = "")]
        language: String,

        /// Order by creation time, latest first
        #[arg(long)]
        newest_first: bool,
    },

    /// Print every distinct language in use
    Languages,

    /// Print total and per-type counts
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.db {
        Some(path) => LibraryConfig::new(path),
        None => LibraryConfig::from_env()?,
    };
    tracing::debug!(path = %config.database_path.display(), "Opening library");

    let library = LibraryService::open(&config)
        .await
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

    run(&library, cli.command).await
}

async fn run(library: &LibraryService, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Add {
            title,
            item_type,
            language,
            tags,
            content,
            file,
        } => {
            let content = match read_content(content, file)? {
                Some(content) => content,
                None => bail!("Either --content or --file is required"),
            };

            let item = Item::builder(title, item_type, content)
                .with_language(language)
                .with_tags(tags)
                .build();
            let id = library.save_item(item).await?;

            print_json(&serde_json::json!({ "id": id }))
        }
        Commands::Update {
            id,
            title,
            item_type,
            language,
            tags,
            content,
            file,
        } => {
            let mut item = library.get_item_by_id(id).await?;

            if let Some(title) = title {
                item.title = title;
            }
            if let Some(item_type) = item_type {
                item.item_type = item_type;
            }
            if let Some(language) = language {
                item.language = language;
            }
            if let Some(tags) = tags {
                item.tags = tags;
            }
            if let Some(content) = read_content(content, file)? {
                item.content = content;
            }

            library.update_item(item).await?;
            print_json(&library.get_item_by_id(id).await?)
        }
        Commands::Delete { id } => {
            library.delete_item(id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Commands::Get { id } => print_json(&library.get_item_by_id(id).await?),
        Commands::List {
            search,
            item_type,
            language,
            newest_first,
        } => {
            let sort = if newest_first {
                ItemSort::NewestFirst
            } else {
                ItemSort::Insertion
            };
            let query = ItemQuery::new()
                .with_search(search)
                .with_type(item_type)
                .with_language(language)
                .sorted(sort);

            print_json(&library.query_items(&query).await?)
        }
        Commands::Languages => print_json(&library.get_unique_languages().await?),
        Commands::Stats => print_json(&library.get_item_stats().await?),
    }
}

fn read_content(content: Option<String>, file: Option<PathBuf>) -> anyhow::Result<Option<String>> {
    match (content, file) {
        (Some(content), _) => Ok(Some(content)),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map(Some)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => Ok(None),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
