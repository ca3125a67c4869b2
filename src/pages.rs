//! Server rendering and client hydration
//!
//! This module provides access to isomorphic-pages.
//!
//! ## Architecture
//!
//! - **Store**: reducer-driven state, one store per request or page load
//! - **Components**: page trees rendered from a [`StoreContext`]
//! - **Server**: [`PageRenderer::get_initial_html`] seeds, renders and encodes
//! - **Client**: [`PageRenderer::client_main`] decodes, mounts and re-renders

pub use isomorphic_pages::*;
