//! # Isomorphic
//!
//! Pages that render once on the server and come alive in the client.
//!
//! A page is a reducer, a root component and a view engine. The server seeds a
//! fresh store with setup actions, renders the component tree, and embeds the
//! encoded state next to the markup. The client decodes that state, builds an
//! identical store and takes over the markup without a visible re-render.
//!
//! ## Quick Example
//!
//! ```rust
//! use isomorphic::prelude::*;
//! use std::convert::Infallible;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let renderer = PageRenderer::new(
//!     reducer_fn(|count: &i64, delta: i64| count + delta),
//!     component_fn(|cx: &StoreContext<_>| {
//!         let count: i64 = cx.state();
//!         PageElement::new("p").child(format!("{} visits", count)).into_page()
//!     }),
//! );
//!
//! let html = renderer
//!     .get_initial_html(
//!         InitialHtmlOptions::sync(|cx: RenderContext<i64>| {
//!             Ok::<_, Infallible>(format!(
//!                 "<div id='{}'>{}</div><script type='application/json' id='{}'>{}</script>",
//!                 cx.container_element_id,
//!                 cx.page_content,
//!                 cx.initial_state_element_id,
//!                 cx.encoded_state,
//!             ))
//!         })
//!         .dispatch_setup_events(Setup::sync(|dispatch| {
//!             dispatch.dispatch(1);
//!             Ok::<_, Infallible>(())
//!         })),
//!     )
//!     .await
//!     .unwrap();
//!
//! let document = MemoryDocument::from_html(&html);
//! let store = renderer.client_main(&document, ClientOptions::new()).await.unwrap();
//! assert_eq!(store.state(), 1);
//! # });
//! ```
//!
//! ## Crates
//!
//! - [`pages`]: the page renderer, store, state codec and hydration

pub mod pages;

pub use pages::{
	ClientOptions, Error, HydrationError, InitialHtmlOptions, PageRenderer, PageSettings,
	RenderContext, Setup,
};

/// Commonly used types
pub mod prelude {
	pub use isomorphic_pages::prelude::*;
}
