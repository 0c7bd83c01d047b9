//! Server command implementation

use std::path::Path;

use anyhow::Result;
use finsight_core::InsightsEngine;
use finsight_server::{ServerConfig, ALLOWED_ORIGINS_ENV, API_KEYS_ENV};

use super::{load_config, open_db};

pub async fn cmd_serve(
    db_path: &Path,
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    no_auth: bool,
) -> Result<()> {
    println!("🚀 Starting Finsight web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let server_config = ServerConfig::from_env(!no_auth);

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if server_config.api_keys.is_empty() {
        println!("   🔒 Authentication: no API keys configured");
        println!("      Set {} to allow API access", API_KEYS_ENV);
    } else {
        println!(
            "   🔑 API keys: {} configured ({})",
            server_config.api_keys.len(),
            API_KEYS_ENV
        );
    }
    if !server_config.allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} ({})",
            server_config.allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV
        );
    }
    println!();

    let db = open_db(db_path)?;
    let engine = InsightsEngine::new(load_config(config_path)?);

    finsight_server::serve_with_config(db, engine, host, port, server_config).await
}
