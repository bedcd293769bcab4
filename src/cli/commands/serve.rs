//! Serve Command
//!
//! Runs the HTTP service until interrupted.

use crate::config::ConfigLoader;
use crate::server;
use crate::types::Result;

pub async fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    server::serve(config).await
}
