//! The counter page component.

use crate::reducer::{CounterReducer, dec_counter, inc_counter};
use isomorphic::prelude::{
	Component, EventType, Page, PageElement, PageRenderer, PageSettings, StoreContext,
};

const NBSP: &str = "\u{a0}";

/// Root component of the counter page.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterPage;

impl Component<CounterReducer> for CounterPage {
	fn render(&self, cx: &StoreContext<CounterReducer>) -> Page {
		let state = cx.state();

		let user_name = state.user_name.as_deref().filter(|name| !name.is_empty());
		let heading = match user_name {
			Some(name) => format!("Hello, {}", name),
			None => "Hello".to_string(),
		};

		let mut counter_line = PageElement::new("p")
			.id("counter")
			.child(format!("The counter value is {}.{}", state.counter, NBSP));
		if state.interactive {
			let inc = cx.dispatcher();
			let dec = cx.dispatcher();
			counter_line = counter_line.child(
				PageElement::new("span")
					.child(
						PageElement::new("button")
							.id("inc")
							.on(EventType::Click, move |_| inc_counter(&inc))
							.child("increment"),
					)
					.child(
						PageElement::new("button")
							.id("dec")
							.on(EventType::Click, move |_| dec_counter(&dec))
							.child("decrement"),
					),
			);
		}

		PageElement::new("div")
			.child(PageElement::new("h1").child(heading))
			.child(user_name.is_none().then(user_name_hint))
			.child(counter_line)
			.child((!state.default_counter_set).then(default_counter_hint))
			.into_page()
	}

	fn name(&self) -> &'static str {
		"CounterPage"
	}
}

fn user_name_hint() -> PageElement {
	PageElement::new("p")
		.child("You did not specify a user name. Try adding it to the URL like: ")
		.child(
			PageElement::new("a")
				.attr("href", "/?userName=Andromeda")
				.child("/?userName=Andromeda"),
		)
		.child(".")
}

fn default_counter_hint() -> PageElement {
	PageElement::new("p")
		.child(format!("You can specify a default value in the counter with a{}", NBSP))
		.child(PageElement::new("code").child("counter"))
		.child(" query parameter, like ")
		.child(
			PageElement::new("a")
				.attr("href", "/?counter=100")
				.child("/?counter=100"),
		)
		.child(".")
}

/// The renderer for the counter page, with default element ids.
pub fn get_page() -> PageRenderer<CounterReducer> {
	PageRenderer::new(CounterReducer, CounterPage)
}

/// The renderer for the counter page, with the given element ids.
pub fn get_page_with(settings: PageSettings) -> PageRenderer<CounterReducer> {
	get_page().with_settings(settings)
}
