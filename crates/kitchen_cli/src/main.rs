//! `kitchen` command line entry point.
//!
//! # Responsibility
//! - Start the HTTP server with environment-driven configuration.
//! - Seed cooks, since every HTTP route requires an existing cook.
//! - Keep a `ping` probe to verify `kitchen_core` linkage.

use std::io;

use clap::{Parser, Subcommand};
use kitchen_core::{init_logging, open_db, CatalogService, CookInput, QueryService};
use kitchen_http::ServerConfig;
use log::info;
use tokio::runtime::Builder;

/// `kitchen` command arguments.
#[derive(Debug, Parser)]
#[command(name = "kitchen", about = "Kitchen staff service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage and version.
    Ping,
    /// Serve the JSON API until Ctrl+C or SIGTERM.
    Serve,
    /// Create a cook in the configured database and print its id.
    CreateCook {
        #[arg(long)]
        username: String,
        #[arg(long = "first-name", default_value = "")]
        first_name: String,
        #[arg(long = "last-name", default_value = "")]
        last_name: String,
        #[arg(long = "years", value_name = "n")]
        years_of_experience: Option<i32>,
    },
    /// Print the id of an existing cook, for use as `x-cook-id`.
    CookId {
        #[arg(long)]
        username: String,
    },
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Ping => {
            println!("kitchen_core ping={}", kitchen_core::ping());
            println!("kitchen_core version={}", kitchen_core::core_version());
            Ok(())
        }
        Command::Serve => {
            let config = load_config()?;
            start_logging(&config)?;
            let runtime = Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
            runtime
                .block_on(kitchen_http::serve(config))
                .map_err(io::Error::other)
        }
        Command::CreateCook {
            username,
            first_name,
            last_name,
            years_of_experience,
        } => {
            let config = load_config()?;
            start_logging(&config)?;
            let conn = open_db(&config.db_path).map_err(io::Error::other)?;
            let catalog = CatalogService::sqlite(&conn).map_err(io::Error::other)?;
            let cook = catalog
                .create_cook(CookInput {
                    username,
                    first_name,
                    last_name,
                    years_of_experience,
                })
                .map_err(io::Error::other)?;
            info!("event=cli_create_cook module=cli status=ok id={}", cook.id);
            println!("id={}", cook.id);
            println!("display_name={}", cook.display_name());
            Ok(())
        }
        Command::CookId { username } => {
            let config = load_config()?;
            start_logging(&config)?;
            let conn = open_db(&config.db_path).map_err(io::Error::other)?;
            let query = QueryService::sqlite(&conn, config.page_size).map_err(io::Error::other)?;
            match query
                .find_cook_by_username(&username)
                .map_err(io::Error::other)?
            {
                Some(cook) => {
                    println!("id={}", cook.id);
                    Ok(())
                }
                None => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no cook with username `{username}`"),
                )),
            }
        }
    }
}

fn load_config() -> io::Result<ServerConfig> {
    ServerConfig::from_env().map_err(io::Error::other)
}

fn start_logging(config: &ServerConfig) -> io::Result<()> {
    let log_dir = config.log_dir.to_string_lossy();
    init_logging(&config.log_level, &log_dir).map_err(io::Error::other)
}
