//! Document abstraction for the client side.
//!
//! [`Document`] is the small slice of a browser document that hydration needs:
//! look up an element's text by id, and mount a page tree into an element.
//! [`MemoryDocument`] implements it in memory for native targets and tests.
//! It can be built from server-rendered HTML, and it can fire events at
//! mounted elements.

use crate::component::{Callback, Event, EventType, Page};
use crate::engine::HtmlEngine;
use parking_lot::Mutex;
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The document operations used by hydration.
pub trait Document: Send + Sync {
	/// Returns the text content of the element with the given id.
	fn get_element_text(&self, id: &str) -> Option<String>;

	/// Returns whether an element with the given id exists.
	fn has_element(&self, id: &str) -> bool;

	/// Replaces the content of the element with the given id by `page`.
	///
	/// Returns `false`, without writing anything, if there is no such element.
	fn mount(&self, id: &str, page: Page) -> bool;
}

#[derive(Debug, Clone)]
enum Node {
	Static {
		inner_html: String,
		text: String,
		/// Ids of the parsed elements this one sits inside.
		ancestors: Vec<String>,
	},
	Mounted(Page),
}

#[derive(Debug, Default)]
struct DocumentState {
	elements: HashMap<String, Node>,
	writes: usize,
}

impl DocumentState {
	fn find_mounted(&self, id: &str) -> Option<&crate::component::PageElement> {
		self.elements.values().find_map(|node| match node {
			Node::Mounted(page) => page.find_by_id(id),
			Node::Static { .. } => None,
		})
	}
}

/// An in-memory [`Document`].
///
/// Clones share the same underlying document.
#[derive(Clone, Default)]
pub struct MemoryDocument {
	state: Arc<Mutex<DocumentState>>,
}

impl fmt::Debug for MemoryDocument {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.lock();
		let mut ids: Vec<&String> = state.elements.keys().collect();
		ids.sort();
		f.debug_struct("MemoryDocument")
			.field("elements", &ids)
			.field("writes", &state.writes)
			.finish()
	}
}

impl MemoryDocument {
	/// Creates an empty document.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a document from HTML, registering every element that carries an
	/// `id` attribute.
	///
	/// Element text is read the way `textContent` reads it: script and style
	/// bodies stay verbatim, comments are skipped and character references
	/// are decoded. When an id repeats, the first element wins.
	pub fn from_html(html: &str) -> Self {
		let document = Self::new();
		{
			let mut state = document.state.lock();
			for parsed in parse_elements_with_id(html) {
				state
					.elements
					.entry(parsed.id)
					.or_insert(Node::Static {
						inner_html: parsed.inner_html,
						text: parsed.text,
						ancestors: parsed.ancestors,
					});
			}
		}
		document
	}

	/// Adds an element holding `text`.
	pub fn with_element(self, id: impl Into<String>, text: impl Into<String>) -> Self {
		self.insert_element(id, text);
		self
	}

	/// Adds or replaces an element holding `text`.
	pub fn insert_element(&self, id: impl Into<String>, text: impl Into<String>) {
		let text = text.into();
		self.state.lock().elements.insert(
			id.into(),
			Node::Static {
				inner_html: crate::engine::escape_html(&text),
				text,
				ancestors: Vec::new(),
			},
		);
	}

	/// Removes an element. Returns whether it existed.
	pub fn remove_element(&self, id: &str) -> bool {
		self.state.lock().elements.remove(id).is_some()
	}

	/// Returns the markup currently inside the element with the given id.
	pub fn inner_html(&self, id: &str) -> Option<String> {
		let state = self.state.lock();
		match state.elements.get(id)? {
			Node::Static { inner_html, .. } => Some(inner_html.clone()),
			Node::Mounted(page) => Some(HtmlEngine.to_html(page)),
		}
	}

	/// Returns the page tree mounted in the element with the given id.
	pub fn mounted(&self, id: &str) -> Option<Page> {
		match self.state.lock().elements.get(id)? {
			Node::Mounted(page) => Some(page.clone()),
			Node::Static { .. } => None,
		}
	}

	/// Returns how many times content has been mounted.
	pub fn write_count(&self) -> usize {
		self.state.lock().writes
	}

	/// Fires `event_type` at the mounted element whose `id` attribute is
	/// `element_id`, and returns how many handlers ran.
	///
	/// Handlers run without the document lock held, so they may dispatch and
	/// trigger re-renders.
	pub fn trigger(&self, element_id: &str, event_type: EventType) -> usize {
		let handlers: Vec<Callback> = {
			let state = self.state.lock();
			let Some(el) = state.find_mounted(element_id) else {
				return 0;
			};
			el.event_handlers()
				.iter()
				.filter(|(kind, _)| *kind == event_type)
				.map(|(_, handler)| handler.clone())
				.collect()
		};

		let event = Event {
			event_type,
			target_id: Some(element_id.to_string()),
		};
		for handler in &handlers {
			handler.call(&event);
		}
		handlers.len()
	}
}

impl Document for MemoryDocument {
	fn get_element_text(&self, id: &str) -> Option<String> {
		let state = self.state.lock();
		if let Some(el) = state.find_mounted(id) {
			return Some(Page::Element(el.clone()).text_content());
		}
		match state.elements.get(id)? {
			Node::Static { text, .. } => Some(text.clone()),
			Node::Mounted(page) => Some(page.text_content()),
		}
	}

	fn has_element(&self, id: &str) -> bool {
		let state = self.state.lock();
		state.elements.contains_key(id) || state.find_mounted(id).is_some()
	}

	fn mount(&self, id: &str, page: Page) -> bool {
		let mut state = self.state.lock();
		let Some(node) = state.elements.get_mut(id) else {
			return false;
		};
		*node = Node::Mounted(page);
		state.writes += 1;

		// Elements parsed from inside the container are replaced by the mount.
		state.elements.retain(|_, node| match node {
			Node::Static { ancestors, .. } => !ancestors.iter().any(|a| a == id),
			Node::Mounted(_) => true,
		});
		true
	}
}

struct ParsedElement {
	id: String,
	inner_html: String,
	text: String,
	ancestors: Vec<String>,
}

fn parse_elements_with_id(html: &str) -> Vec<ParsedElement> {
	let parsed = Html::parse_document(html);
	parsed
		.root_element()
		.descendants()
		.filter_map(ElementRef::wrap)
		.filter_map(|el| {
			let id = el.value().id()?;
			Some(ParsedElement {
				id: id.to_string(),
				inner_html: el.inner_html(),
				text: el.text().collect(),
				ancestors: el
					.ancestors()
					.filter_map(ElementRef::wrap)
					.filter_map(|ancestor| ancestor.value().id())
					.map(str::to_string)
					.collect(),
			})
		})
		.collect()
}
