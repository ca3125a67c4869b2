//! The page renderer: one page, rendered on the server and hydrated on the client.
//!
//! [`PageRenderer`] holds everything both sides must agree on: the reducer,
//! the root component, the view engine and the element ids. The server calls
//! [`PageRenderer::get_initial_html`] once per request and the client calls
//! [`PageRenderer::client_main`] once per page load. Each call builds its own
//! [`Store`], so concurrent requests never share state.
//!
//! Every operation is `async` so callers can await them uniformly, whether
//! or not the work behind them suspends.
//!
//! ## Example
//!
//! ```
//! use isomorphic_pages::prelude::*;
//! use std::convert::Infallible;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let renderer = PageRenderer::new(
//!     reducer_fn(|count: &i64, delta: i64| count + delta),
//!     component_fn(|cx: &StoreContext<_>| {
//!         let count: i64 = cx.state();
//!         PageElement::new("p").child(format!("count {}", count)).into_page()
//!     }),
//! );
//!
//! let html = renderer
//!     .get_initial_html(
//!         InitialHtmlOptions::sync(|cx: RenderContext<i64>| {
//!             Ok::<_, Infallible>(format!(
//!                 "<div id='{}'>{}</div><script id='{}'>{}</script>",
//!                 cx.container_element_id,
//!                 cx.page_content,
//!                 cx.initial_state_element_id,
//!                 cx.encoded_state,
//!             ))
//!         })
//!         .dispatch_setup_events(Setup::sync(|dispatch| {
//!             dispatch.dispatch(3);
//!             Ok::<_, Infallible>(())
//!         })),
//!     )
//!     .await
//!     .unwrap();
//!
//! assert!(html.contains("<p>count 3</p>"));
//! # });
//! ```

use crate::component::{Component, Page, StoreProvider};
use crate::dom::Document;
use crate::engine::{HtmlEngine, ViewEngine};
use crate::error::{BoxError, Error, Result};
use crate::hydration::{HydrationError, load_state_from_document};
use crate::settings::PageSettings;
use crate::state::encode_state;
use crate::store::{Dispatch, Reducer, Store};
use futures::future::BoxFuture;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type SetupFn<R> =
	Box<dyn FnOnce(Dispatch<R>) -> BoxFuture<'static, std::result::Result<(), BoxError>> + Send>;

type RenderFn<S> = Box<
	dyn FnOnce(RenderContext<S>) -> BoxFuture<'static, std::result::Result<String, BoxError>>
		+ Send,
>;

/// Caller-supplied code that dispatches actions to seed a fresh store.
///
/// The renderer waits for the setup to settle before it reads state. There is
/// no timeout.
pub struct Setup<R: Reducer> {
	run: Option<SetupFn<R>>,
}

impl<R: Reducer> Default for Setup<R> {
	fn default() -> Self {
		Self::none()
	}
}

impl<R: Reducer> fmt::Debug for Setup<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Setup")
			.field("is_none", &self.is_none())
			.finish()
	}
}

impl<R: Reducer> Setup<R> {
	/// A setup that dispatches nothing.
	pub fn none() -> Self {
		Self { run: None }
	}

	/// An asynchronous setup. Its success value is discarded.
	pub fn new<F, Fut, E>(setup: F) -> Self
	where
		F: FnOnce(Dispatch<R>) -> Fut + Send + 'static,
		Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
		E: Into<BoxError>,
	{
		let run = move |dispatch: Dispatch<R>| -> BoxFuture<'static, std::result::Result<(), BoxError>> {
			Box::pin(async move {
				let result: std::result::Result<(), BoxError> =
					setup(dispatch).await.map_err(|err| err.into());
				result
			})
		};
		Self {
			run: Some(Box::new(run)),
		}
	}

	/// A setup that finishes without suspending.
	pub fn sync<F, E>(setup: F) -> Self
	where
		F: FnOnce(&Dispatch<R>) -> std::result::Result<(), E> + Send + 'static,
		E: Into<BoxError> + Send + 'static,
	{
		Self::new(move |dispatch: Dispatch<R>| std::future::ready(setup(&dispatch)))
	}

	/// Returns whether this setup dispatches nothing.
	pub fn is_none(&self) -> bool {
		self.run.is_none()
	}

	async fn run(self, dispatch: Dispatch<R>) -> std::result::Result<(), BoxError> {
		match self.run {
			Some(run) => run(dispatch).await,
			None => Ok(()),
		}
	}
}

/// Everything a page template needs to produce the final document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderContext<S> {
	/// Store state after setup.
	pub initial_state: S,
	/// `initial_state` encoded for embedding in the document.
	pub encoded_state: String,
	/// The component tree rendered to markup.
	pub page_content: String,
	/// Id of the element `page_content` must be placed in.
	pub container_element_id: String,
	/// Id of the element `encoded_state` must be placed in.
	pub initial_state_element_id: String,
}

/// Options for [`PageRenderer::get_initial_html`].
pub struct InitialHtmlOptions<R: Reducer> {
	setup: Setup<R>,
	render: RenderFn<R::State>,
}

impl<R: Reducer> InitialHtmlOptions<R> {
	/// Creates options with an asynchronous page template and no setup.
	pub fn new<F, Fut, E>(render: F) -> Self
	where
		F: FnOnce(RenderContext<R::State>) -> Fut + Send + 'static,
		Fut: Future<Output = std::result::Result<String, E>> + Send + 'static,
		E: Into<BoxError>,
	{
		let render = move |cx: RenderContext<R::State>| -> BoxFuture<'static, std::result::Result<String, BoxError>> {
			Box::pin(async move {
				let result: std::result::Result<String, BoxError> =
					render(cx).await.map_err(|err| err.into());
				result
			})
		};
		Self {
			setup: Setup::none(),
			render: Box::new(render),
		}
	}

	/// Creates options with a synchronous page template and no setup.
	pub fn sync<F, E>(render: F) -> Self
	where
		F: FnOnce(RenderContext<R::State>) -> std::result::Result<String, E> + Send + 'static,
		E: Into<BoxError> + Send + 'static,
	{
		Self::new(move |cx: RenderContext<R::State>| std::future::ready(render(cx)))
	}

	/// Sets the setup that seeds the store before rendering.
	pub fn dispatch_setup_events(mut self, setup: Setup<R>) -> Self {
		self.setup = setup;
		self
	}
}

/// Options for [`PageRenderer::client_main`].
pub struct ClientOptions<R: Reducer> {
	client_setup: Setup<R>,
}

impl<R: Reducer> Default for ClientOptions<R> {
	fn default() -> Self {
		Self {
			client_setup: Setup::none(),
		}
	}
}

impl<R: Reducer> ClientOptions<R> {
	/// Creates options with no client setup.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a setup to run once the page is interactive.
	///
	/// This runs after hydration, so its actions are not part of the state
	/// the server rendered.
	pub fn dispatch_client_setup_events(mut self, setup: Setup<R>) -> Self {
		self.client_setup = setup;
		self
	}
}

/// Renders one page on the server and hydrates it on the client.
pub struct PageRenderer<R: Reducer, E: ViewEngine = HtmlEngine> {
	reducer: Arc<R>,
	page_component: Arc<dyn Component<R>>,
	engine: Arc<E>,
	settings: PageSettings,
}

impl<R: Reducer, E: ViewEngine> Clone for PageRenderer<R, E> {
	fn clone(&self) -> Self {
		Self {
			reducer: Arc::clone(&self.reducer),
			page_component: Arc::clone(&self.page_component),
			engine: Arc::clone(&self.engine),
			settings: self.settings.clone(),
		}
	}
}

impl<R: Reducer, E: ViewEngine> fmt::Debug for PageRenderer<R, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PageRenderer")
			.field("page_component", &self.page_component.name())
			.field("settings", &self.settings)
			.finish_non_exhaustive()
	}
}

impl<R: Reducer> PageRenderer<R> {
	/// Creates a renderer with the HTML engine and default element ids.
	pub fn new(reducer: R, page_component: impl Component<R>) -> Self {
		Self {
			reducer: Arc::new(reducer),
			page_component: Arc::new(page_component),
			engine: Arc::new(HtmlEngine),
			settings: PageSettings::default(),
		}
	}
}

impl<R: Reducer, E: ViewEngine> PageRenderer<R, E> {
	/// Replaces the view engine.
	pub fn with_engine<E2: ViewEngine>(self, engine: E2) -> PageRenderer<R, E2> {
		PageRenderer {
			reducer: self.reducer,
			page_component: self.page_component,
			engine: Arc::new(engine),
			settings: self.settings,
		}
	}

	/// Replaces both element ids.
	pub fn with_settings(mut self, settings: PageSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Sets the id of the element the page is rendered into.
	pub fn container_element_id(mut self, id: impl Into<String>) -> Self {
		self.settings.container_element_id = id.into();
		self
	}

	/// Sets the id of the element holding the encoded state.
	pub fn initial_state_element_id(mut self, id: impl Into<String>) -> Self {
		self.settings.initial_state_element_id = id.into();
		self
	}

	/// Returns the element ids.
	pub fn settings(&self) -> &PageSettings {
		&self.settings
	}

	/// Returns the reducer.
	pub fn reducer(&self) -> &R {
		&self.reducer
	}

	/// Returns the view engine.
	pub fn engine(&self) -> &E {
		&self.engine
	}

	/// Creates a fresh store, seeded with `initial_state` or with the
	/// reducer's initial state.
	pub async fn create_store(&self, initial_state: Option<R::State>) -> Store<R> {
		Store::new(Arc::clone(&self.reducer), initial_state)
	}

	/// Returns a dispatch handle bound to `store`.
	pub async fn get_dispatch(&self, store: &Store<R>) -> Dispatch<R> {
		store.dispatcher()
	}

	/// Returns the current state of `store`.
	pub async fn get_store_state(&self, store: &Store<R>) -> R::State {
		store.state()
	}

	/// Returns the page component rendered under a provider bound to `store`.
	pub async fn get_component_tree(&self, store: &Store<R>) -> Page {
		StoreProvider::new(store.clone(), Arc::clone(&self.page_component)).render()
	}

	/// Renders the component tree to markup.
	pub async fn render_component_tree_to_string(&self, store: &Store<R>) -> Result<String> {
		let tree = self.get_component_tree(store).await;
		self.engine.render_to_string(&tree).map_err(Error::Render)
	}

	/// Renders the component tree into the container element of `document`,
	/// replacing its content.
	pub async fn render_component_tree_to_container(
		&self,
		store: &Store<R>,
		document: &dyn Document,
	) -> Result<()> {
		mount_tree(
			&self.page_component,
			&*self.engine,
			store,
			document,
			&self.settings.container_element_id,
		)
	}

	/// Produces the initial HTML for the page. This is the server entry point.
	///
	/// A fresh store is seeded by the options' setup. Its state is then encoded,
	/// the component tree is rendered, and the page template receives both in a
	/// [`RenderContext`]. The result is whatever the template returns. Any failure
	/// aborts the whole call, so no partial HTML is produced.
	#[tracing::instrument(
		name = "get_initial_html",
		skip_all,
		fields(component = self.page_component.name())
	)]
	pub async fn get_initial_html(&self, options: InitialHtmlOptions<R>) -> Result<String> {
		let InitialHtmlOptions { setup, render } = options;

		let store = self.create_store(None).await;
		let initial_state = self.run_setup(&store, setup).await?;

		let encoded_state = encode_state(&initial_state)?;
		tracing::debug!(bytes = encoded_state.len(), "initial state encoded");

		let page_content = self.render_component_tree_to_string(&store).await?;
		tracing::debug!(bytes = page_content.len(), "component tree rendered");

		let context = RenderContext {
			initial_state,
			encoded_state,
			page_content,
			container_element_id: self.settings.container_element_id.clone(),
			initial_state_element_id: self.settings.initial_state_element_id.clone(),
		};
		let html = render(context).await.map_err(Error::Render)?;
		tracing::debug!(bytes = html.len(), "page template rendered");

		Ok(html)
	}

	/// Runs `setup` against a fresh store and returns the resulting state,
	/// without rendering anything.
	pub async fn get_current_state(&self, setup: Setup<R>) -> Result<R::State> {
		let store = self.create_store(None).await;
		self.run_setup(&store, setup).await
	}

	/// Hydrates the page. This is the client entry point.
	///
	/// The server state is decoded from the initial state element and seeds a
	/// fresh store. Setup actions are not dispatched again. The component tree
	/// then takes over the container element and re-renders after every
	/// dispatch. Resolves with the store.
	#[tracing::instrument(
		name = "client_main",
		skip_all,
		fields(component = self.page_component.name())
	)]
	pub async fn client_main<D>(&self, document: &D, options: ClientOptions<R>) -> Result<Store<R>>
	where
		D: Document + Clone + 'static,
	{
		let initial_state: R::State =
			load_state_from_document(document, &self.settings.initial_state_element_id)?;

		let store = self.create_store(Some(initial_state)).await;
		self.render_component_tree_to_container(&store, document)
			.await?;
		self.rerender_on_dispatch(&store, document.clone());
		tracing::info!(
			container = %self.settings.container_element_id,
			"page hydrated"
		);

		let dispatch = self.get_dispatch(&store).await;
		options
			.client_setup
			.run(dispatch)
			.await
			.map_err(Error::SetupDispatch)?;

		Ok(store)
	}

	async fn run_setup(&self, store: &Store<R>, setup: Setup<R>) -> Result<R::State> {
		let dispatch = self.get_dispatch(store).await;
		setup.run(dispatch).await.map_err(Error::SetupDispatch)?;
		tracing::debug!("setup events dispatched");
		Ok(self.get_store_state(store).await)
	}

	fn rerender_on_dispatch<D>(&self, store: &Store<R>, document: D)
	where
		D: Document + 'static,
	{
		let store_ref = store.downgrade();
		let component = Arc::clone(&self.page_component);
		let engine = Arc::clone(&self.engine);
		let container_id = self.settings.container_element_id.clone();

		store.subscribe(move |_| {
			let Some(store) = store_ref.upgrade() else {
				return;
			};
			if let Err(err) = mount_tree(&component, &*engine, &store, &document, &container_id) {
				tracing::warn!(error = %err, "re-render after dispatch failed");
			}
		});
	}
}

fn mount_tree<R: Reducer, E: ViewEngine>(
	component: &Arc<dyn Component<R>>,
	engine: &E,
	store: &Store<R>,
	document: &dyn Document,
	container_id: &str,
) -> Result<()> {
	if !document.has_element(container_id) {
		tracing::warn!(container_id, "hydration container not found");
		return Err(HydrationError::ContainerNotFound(container_id.to_string()).into());
	}
	let tree = StoreProvider::new(store.clone(), Arc::clone(component)).render();
	engine
		.render_into(document, container_id, tree)
		.map_err(Error::Render)
}
