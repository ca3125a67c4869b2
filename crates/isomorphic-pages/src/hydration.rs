//! Client-side recovery of server state.

use crate::dom::Document;
use crate::state::{MalformedStateError, decode_state};
use serde::de::DeserializeOwned;

/// Errors that can occur during hydration.
///
/// Client and server disagreeing about the page is a programming error, so
/// none of these fall back to a default state.
#[derive(Debug, thiserror::Error)]
pub enum HydrationError {
	/// The element carrying the encoded state is missing.
	#[error("Initial state element not found: #{0}")]
	StateElementNotFound(String),
	/// The element the page should be mounted into is missing.
	#[error("Hydration container not found: #{0}")]
	ContainerNotFound(String),
	/// The encoded state did not decode.
	#[error("Failed to decode initial state: {0}")]
	MalformedState(#[source] MalformedStateError),
}

/// Reads and decodes the state embedded in the element with id `element_id`.
pub fn load_state_from_document<S: DeserializeOwned>(
	document: &dyn Document,
	element_id: &str,
) -> Result<S, HydrationError> {
	let Some(text) = document.get_element_text(element_id) else {
		tracing::warn!(element_id, "initial state element not found");
		return Err(HydrationError::StateElementNotFound(element_id.to_string()));
	};

	decode_state(&text).map_err(|err| {
		tracing::warn!(element_id, error = %err, "initial state did not decode");
		HydrationError::MalformedState(err)
	})
}
