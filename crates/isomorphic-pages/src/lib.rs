//! Isomorphic Pages - server rendering and client hydration for reducer-driven pages
//!
//! A page is a root [`Component`] over a [`Store`] driven by a [`Reducer`]. The
//! same [`PageRenderer`] renders the page to HTML on the server and takes over
//! that HTML on the client, so both sides produce identical markup from
//! identical state.
//!
//! ## Architecture
//!
//! - [`store`]: reducer-driven state container with subscriptions
//! - [`component`]: page trees, event handlers and the component trait
//! - [`engine`]: view engines that turn page trees into markup
//! - [`dom`]: document abstraction and an in-memory document
//! - [`state`]: state encoding safe for embedding in `<script>` elements
//! - [`hydration`]: recovery of the server state on the client
//! - [`renderer`]: the server and client entry points
//! - [`settings`]: element ids shared by both sides
//!
//! ## Flow
//!
//! 1. The server calls [`PageRenderer::get_initial_html`]. A fresh store is
//!    seeded by setup actions, the tree is rendered and the state is encoded.
//!    A caller-supplied template assembles the document.
//! 2. The client calls [`PageRenderer::client_main`]. The encoded state is
//!    decoded, a store is created from it, and the tree is mounted into the
//!    container element. Every later dispatch re-renders the page.

#![warn(missing_docs)]

pub mod component;
pub mod dom;
pub mod engine;
pub mod error;
pub mod hydration;
pub mod prelude;
pub mod renderer;
pub mod settings;
pub mod state;
pub mod store;

pub use component::{
	Callback, Component, ComponentFn, Event, EventType, IntoPage, Page, PageElement, StoreContext,
	StoreProvider, component_fn,
};
pub use dom::{Document, MemoryDocument};
pub use engine::{HtmlEngine, ViewEngine, escape_html};
pub use error::{BoxError, Error, Result};
pub use hydration::{HydrationError, load_state_from_document};
pub use renderer::{ClientOptions, InitialHtmlOptions, PageRenderer, RenderContext, Setup};
pub use settings::{PageSettings, SettingsError};
pub use state::{MalformedStateError, StateEncodeError, decode_state, encode_state};
pub use store::{Dispatch, Reducer, ReducerFn, Store, Subscription, WeakStore, reducer_fn};
