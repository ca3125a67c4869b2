//! Error types for page rendering and hydration.

use crate::hydration::HydrationError;
use crate::state::{MalformedStateError, StateEncodeError};

/// A boxed error coming from caller-supplied code or a view engine.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the [`PageRenderer`](crate::PageRenderer) entry points.
///
/// Errors raised by caller-supplied callbacks are boxed without modification and
/// are reachable through [`std::error::Error::source`], so callers can downcast
/// them back to their original type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The setup callback failed while seeding the store.
	#[error("Setup dispatch failed: {0}")]
	SetupDispatch(#[source] BoxError),
	/// The view engine or the caller's `render` callback failed.
	#[error("Render failed: {0}")]
	Render(#[source] BoxError),
	/// An encoded state payload could not be parsed.
	#[error(transparent)]
	MalformedState(#[from] MalformedStateError),
	/// The client could not recover the server state from the document.
	#[error(transparent)]
	Hydration(#[from] HydrationError),
	/// The store state could not be serialized.
	#[error(transparent)]
	StateEncode(#[from] StateEncodeError),
}

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
