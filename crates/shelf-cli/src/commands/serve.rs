//! Server command implementation

use anyhow::Result;
use shelf_core::config::ShelfConfig;
use shelf_core::db::Database;

use super::history_store;

pub async fn cmd_serve(
    db: Database,
    config: &ShelfConfig,
    host: &str,
    port: u16,
    no_encrypt: bool,
) -> Result<()> {
    println!("🚀 Starting Shelf web server...");
    println!("   Database: {}", config.db_path.display());
    println!("   Owner: {}", config.owner);
    println!("   Listening: http://{}:{}", host, port);
    println!();
    println!("   ⚠️  No authentication - every request acts as '{}'", config.owner);
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let server_config = shelf_server::ServerConfig {
        owner: config.owner.clone(),
        allowed_origins: vec![],
        default_period: config.default_period,
    };

    shelf_server::serve_with_config(db, host, port, None, server_config, history_store(config))
        .await?;

    Ok(())
}
