// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recipebook::{catalog, db};
use std::path::Path;
#[cfg(feature = "server")]
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "recipebook")]
#[command(author, version, about = "Recipe catalog with a REST API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the recipe database
    Init {
        /// Database path
        #[arg(short, long, default_value = db::DEFAULT_DB_PATH)]
        db_path: String,
    },
    /// Run the HTTP API server
    #[cfg(feature = "server")]
    Serve {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Bind address (overrides the config file)
        #[arg(short, long)]
        bind: Option<String>,
        /// Database path (overrides the config file)
        #[arg(short, long)]
        db_path: Option<PathBuf>,
    },
    /// List recipes as JSON
    List {
        /// Only recipes whose name contains this (case-insensitive)
        #[arg(short, long)]
        name: Option<String>,
        /// Database path
        #[arg(short, long, default_value = db::DEFAULT_DB_PATH)]
        db_path: String,
    },
    /// Show one recipe as JSON
    Show {
        /// Recipe ID
        id: i64,
        /// Database path
        #[arg(short, long, default_value = db::DEFAULT_DB_PATH)]
        db_path: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { db_path }) => {
            info!("Initializing recipe database at: {}", db_path);
            db::init(&db_path)?;
            println!("Database initialized successfully at: {}", db_path);
            Ok(())
        }
        #[cfg(feature = "server")]
        Some(Commands::Serve {
            config,
            bind,
            db_path,
        }) => serve(config, bind, db_path),
        Some(Commands::List { name, db_path }) => {
            let conn = open_existing(&db_path)?;
            let recipes = catalog::list_recipes(&conn, name.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&recipes)?);
            Ok(())
        }
        Some(Commands::Show { id, db_path }) => {
            let conn = open_existing(&db_path)?;
            let recipe = catalog::retrieve_recipe(&conn, id)?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);
            Ok(())
        }
        None => {
            println!("Recipebook {}", env!("CARGO_PKG_VERSION"));
            println!("Run 'recipebook --help' for usage information");
            Ok(())
        }
    }
}

/// Open a database that `init` has already created
fn open_existing(db_path: &str) -> Result<rusqlite::Connection> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'recipebook init' first.",
            db_path
        );
    }
    let conn = db::open(db_path)
        .with_context(|| format!("Failed to open database: {}", db_path))?;
    Ok(conn)
}

#[cfg(feature = "server")]
fn serve(config: Option<PathBuf>, bind: Option<String>, db_path: Option<PathBuf>) -> Result<()> {
    use recipebook::server::{self, CatalogConfig};

    let file_config = match config {
        Some(path) => CatalogConfig::load(&path)?,
        None => CatalogConfig::default(),
    };
    let mut server_config = file_config.to_server_config()?;

    if let Some(bind) = bind {
        server_config.bind_addr = bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind))?;
    }
    if let Some(db_path) = db_path {
        server_config.db_path = db_path;
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(server::run_server(server_config))
}
