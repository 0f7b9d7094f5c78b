//! A reference host generating chunks with worker threads while terrain generation
//! is overridden, refined and reset.

use tracing::error;
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod pool;
pub mod terrain;

// This module link the previous ones to run the host.
pub mod server;


pub fn main() {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    use server::Server;
    let mut server = match Server::new() {
        Ok(server) => server,
        Err(err) => {
            error!("failed to start chunk workers: {err}");
            std::process::exit(1);
        }
    };

    let res = server.run();
    if let Err(err) = server.stop().and(res) {
        error!("{err}");
        std::process::exit(1);
    }

}
