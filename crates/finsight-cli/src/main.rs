//! Finsight CLI - Spending insights from your transactions
//!
//! Usage:
//!   finsight init                           Initialize database
//!   finsight import --file tx.csv --user me Import transactions
//!   finsight insights --user me             Show insights for stored data
//!   finsight serve --port 3000              Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import { file, user, format } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, &file, &user, format.as_deref())?;
            Ok(())
        }
        Commands::Analyze {
            file,
            user,
            format,
            json,
        } => {
            let config = commands::load_config(config_path)?;
            commands::cmd_analyze(&config, &file, &user, format.as_deref(), json)
        }
        Commands::Insights { user, json } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_config(config_path)?;
            commands::cmd_insights(&db, &config, &user, json)
        }
        Commands::Users => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_users(&db)
        }
        Commands::Purge { user } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_purge(&db, &user)
        }
        Commands::Categories => commands::cmd_categories(),
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, config_path, &host, port, no_auth).await,
    }
}
