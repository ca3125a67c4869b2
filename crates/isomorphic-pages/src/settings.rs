//! Page settings: where server output lives in the document.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default id of the element the page is rendered into.
pub const DEFAULT_CONTAINER_ELEMENT_ID: &str = "container";

/// Default id of the element holding the encoded initial state.
pub const DEFAULT_INITIAL_STATE_ELEMENT_ID: &str = "initial-state";

/// Errors raised while loading [`PageSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// The settings file could not be read.
	#[error("Failed to read page settings: {0}")]
	Io(#[from] std::io::Error),
	/// The settings text is not valid TOML for [`PageSettings`].
	#[error("Invalid page settings: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Element ids shared by the server template and the client entry point.
///
/// Missing keys fall back to their defaults when deserializing.
///
/// ```
/// use isomorphic_pages::PageSettings;
///
/// let settings = PageSettings::from_toml_str("container_element_id = \"app\"").unwrap();
/// assert_eq!(settings.container_element_id, "app");
/// assert_eq!(settings.initial_state_element_id, "initial-state");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
	/// Id of the element the page is rendered into.
	pub container_element_id: String,
	/// Id of the element holding the encoded initial state.
	pub initial_state_element_id: String,
}

impl Default for PageSettings {
	fn default() -> Self {
		Self {
			container_element_id: DEFAULT_CONTAINER_ELEMENT_ID.to_string(),
			initial_state_element_id: DEFAULT_INITIAL_STATE_ELEMENT_ID.to_string(),
		}
	}
}

impl PageSettings {
	/// Creates the default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the container element id.
	pub fn container_element_id(mut self, id: impl Into<String>) -> Self {
		self.container_element_id = id.into();
		self
	}

	/// Sets the initial state element id.
	pub fn initial_state_element_id(mut self, id: impl Into<String>) -> Self {
		self.initial_state_element_id = id.into();
		self
	}

	/// Parses settings from TOML.
	pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(text)?)
	}

	/// Loads settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let text = std::fs::read_to_string(path)?;
		Self::from_toml_str(&text)
	}
}
