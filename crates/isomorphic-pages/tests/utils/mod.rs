//! Shared fixtures for page rendering tests
//!
//! Provides a small counter page with a reducer, a root component and a page
//! template that places the rendered content and the encoded state the way a
//! real server would.

#![allow(dead_code)]

use isomorphic_pages::prelude::*;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// State of the fixture page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterState {
	pub counter: i64,
	pub user_name: Option<String>,
	pub interactive: bool,
}

/// Actions of the fixture page.
#[derive(Debug, Clone)]
pub enum CounterAction {
	SetCounter(i64),
	Increment,
	Decrement,
	SetUserName(String),
	SetInteractive(bool),
}

pub struct CounterReducer;

impl Reducer for CounterReducer {
	type State = CounterState;
	type Action = CounterAction;

	fn initial_state(&self) -> CounterState {
		CounterState::default()
	}

	fn reduce(&self, state: &CounterState, action: CounterAction) -> CounterState {
		let mut next = state.clone();
		match action {
			CounterAction::SetCounter(value) => next.counter = value,
			CounterAction::Increment => next.counter += 1,
			CounterAction::Decrement => next.counter -= 1,
			CounterAction::SetUserName(name) => next.user_name = Some(name),
			CounterAction::SetInteractive(interactive) => next.interactive = interactive,
		}
		next
	}
}

/// Root component of the fixture page.
pub struct CounterPage;

impl Component<CounterReducer> for CounterPage {
	fn render(&self, cx: &StoreContext<CounterReducer>) -> Page {
		let state = cx.state();
		let heading = match &state.user_name {
			Some(name) => format!("Hello, {}", name),
			None => "Hello".to_string(),
		};

		let mut root = PageElement::new("div")
			.class("counter-page")
			.child(PageElement::new("h1").child(heading))
			.child(
				PageElement::new("p")
					.id("counter")
					.child(format!("The counter is {}", state.counter)),
			);

		if state.interactive {
			let inc = cx.dispatcher();
			let dec = cx.dispatcher();
			root = root
				.child(
					PageElement::new("button")
						.id("inc")
						.on(EventType::Click, move |_| {
							inc.dispatch(CounterAction::Increment);
						})
						.child("+"),
				)
				.child(
					PageElement::new("button")
						.id("dec")
						.on(EventType::Click, move |_| {
							dec.dispatch(CounterAction::Decrement);
						})
						.child("-"),
				);
		}

		root.into_page()
	}

	fn name(&self) -> &'static str {
		"CounterPage"
	}
}

pub fn counter_renderer() -> PageRenderer<CounterReducer> {
	PageRenderer::new(CounterReducer, CounterPage)
}

/// Assembles a full document from a render context.
pub fn page_template(cx: RenderContext<CounterState>) -> Result<String, Infallible> {
	Ok(format!(
		"<!DOCTYPE html><html><head><title>Counter</title></head><body>\
		 <div id='{}'>{}</div>\
		 <script type='application/json' id='{}'>{}</script>\
		 <script src='/static/bundles/pages/index.js'></script>\
		 </body></html>",
		cx.container_element_id, cx.page_content, cx.initial_state_element_id, cx.encoded_state,
	))
}

/// Options that render with [`page_template`] after dispatching `actions`.
pub fn options_with(actions: Vec<CounterAction>) -> InitialHtmlOptions<CounterReducer> {
	InitialHtmlOptions::sync(page_template).dispatch_setup_events(Setup::sync(
		move |dispatch: &Dispatch<CounterReducer>| {
			for action in actions {
				dispatch.dispatch(action);
			}
			Ok::<_, Infallible>(())
		},
	))
}

/// Server-renders the page after `actions` and returns the document.
pub async fn server_document(actions: Vec<CounterAction>) -> MemoryDocument {
	let html = counter_renderer()
		.get_initial_html(options_with(actions))
		.await
		.unwrap();
	MemoryDocument::from_html(&html)
}
