//! Trainer-facing adapter server.
//!
//! Listens for line-delimited JSON `reset`/`step`/`snapshot` requests; see
//! `tetris_env::adapter` for the protocol and environment variables.

use anyhow::Result;

use tetris_env::adapter::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env();
    if let Some(path) = config.log_path.as_deref() {
        println!("[EnvServer] wire log: {}", path);
    }
    run_server(config, None).await
}
