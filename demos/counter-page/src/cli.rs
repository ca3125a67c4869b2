//! Command-line settings for the counter page server.

use clap::Parser;
use isomorphic::pages::SettingsError;
use isomorphic::prelude::PageSettings;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "counter-page")]
#[command(about = "Serve the isomorphic counter page", long_about = None)]
#[command(version)]
pub struct ServerSettings {
	/// The host to bind to
	#[arg(short = 'H', long, default_value = "localhost")]
	pub host: String,

	/// The port to bind to
	#[arg(short, long, default_value_t = 8080)]
	pub port: u16,

	/// Directory served under /static/
	#[arg(long, value_name = "DIR", default_value = "./dist/static")]
	pub static_dir: PathBuf,

	/// TOML file overriding the page element ids
	#[arg(long, value_name = "FILE")]
	pub settings: Option<PathBuf>,
}

impl ServerSettings {
	/// Page settings from `--settings`, or the defaults.
	pub fn page_settings(&self) -> Result<PageSettings, SettingsError> {
		match &self.settings {
			Some(path) => PageSettings::from_file(path),
			None => Ok(PageSettings::default()),
		}
	}
}
