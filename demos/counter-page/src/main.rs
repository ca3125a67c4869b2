//! Counter page server
//!
//! ## Usage
//!
//! ```bash
//! counter-page --host 0.0.0.0 --port 8080 --static-dir ./dist/static
//! ```
//!
//! Logging is controlled by `RUST_LOG` and defaults to `info`.

use clap::Parser;
use counter_page::cli::ServerSettings;
use std::process;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(true)
		.init();
}

#[tokio::main]
async fn main() {
	init_tracing();
	let settings = ServerSettings::parse();

	if let Err(err) = counter_page::server::run(settings).await {
		tracing::error!(error = %err, "server stopped");
		process::exit(1);
	}
}
