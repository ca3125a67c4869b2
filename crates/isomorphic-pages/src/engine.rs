//! View engines: turn a [`Page`] into markup or into a live document.

use crate::component::Page;
use crate::dom::Document;
use crate::error::BoxError;

/// Renders page trees.
///
/// `render_to_string` is the server half and `render_into` the client half.
/// Both must produce the same markup for the same tree so the client can take
/// over the server output in place.
pub trait ViewEngine: Send + Sync + 'static {
	/// Renders `page` to markup.
	fn render_to_string(&self, page: &Page) -> Result<String, BoxError>;

	/// Mounts `page` into the document element with id `container_id`,
	/// replacing whatever that element held before.
	fn render_into(
		&self,
		document: &dyn Document,
		container_id: &str,
		page: Page,
	) -> Result<(), BoxError>;
}

/// The default engine: plain HTML serialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEngine;

impl HtmlEngine {
	/// Creates the engine.
	pub fn new() -> Self {
		Self
	}

	/// Serializes `page` as HTML.
	pub fn to_html(&self, page: &Page) -> String {
		let mut output = String::new();
		write_page(&mut output, page);
		output
	}
}

impl ViewEngine for HtmlEngine {
	fn render_to_string(&self, page: &Page) -> Result<String, BoxError> {
		Ok(self.to_html(page))
	}

	fn render_into(
		&self,
		document: &dyn Document,
		container_id: &str,
		page: Page,
	) -> Result<(), BoxError> {
		if document.mount(container_id, page) {
			Ok(())
		} else {
			Err(format!("container element not found: #{}", container_id).into())
		}
	}
}

fn write_page(output: &mut String, page: &Page) {
	match page {
		Page::Element(el) => {
			output.push('<');
			output.push_str(el.tag_name());

			for (name, value) in el.attrs() {
				output.push(' ');
				output.push_str(name);
				output.push_str("=\"");
				output.push_str(&escape_html(value));
				output.push('"');
			}

			if el.is_void() {
				output.push_str(" />");
			} else {
				output.push('>');
				for child in el.child_pages() {
					write_page(output, child);
				}
				output.push_str("</");
				output.push_str(el.tag_name());
				output.push('>');
			}
		}
		Page::Text(text) => output.push_str(&escape_html(text)),
		Page::Fragment(children) => {
			for child in children {
				write_page(output, child);
			}
		}
		Page::Empty => {}
	}
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}
