//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Finsight - Spending insights from your transactions
#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Self-hosted spending insights and budget recommendations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "finsight.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analytics config file (defaults to the data directory override, then
    /// built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from a CSV or JSON file
    Import {
        /// File to import
        #[arg(short, long)]
        file: PathBuf,

        /// Owner of rows that don't name a user
        #[arg(short, long)]
        user: String,

        /// File format: csv, json (detected from extension if not specified)
        #[arg(long)]
        format: Option<String>,
    },

    /// Analyze a file directly, without storing it
    Analyze {
        /// File to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// User id to report under
        #[arg(short, long, default_value = "local")]
        user: String,

        /// File format: csv, json (detected from extension if not specified)
        #[arg(long)]
        format: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show insights for a user's stored transactions
    Insights {
        /// User id
        #[arg(short, long)]
        user: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List users with stored transactions
    Users,

    /// Delete all stored transactions for a user
    Purge {
        /// User id
        #[arg(short, long)]
        user: String,
    },

    /// List the spending categories
    Categories,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires an API key from FINSIGHT_API_KEYS.
        #[arg(long)]
        no_auth: bool,
    },
}
