//! Development server command.

use std::path::Path;

use anyhow::Result;
use folio_server::DevServer;

use crate::config::ConfigFile;

/// Run the dev server.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let config = ConfigFile::load(config_path)?.server_config(port, open);

    DevServer::new(config).start().await?;

    Ok(())
}
