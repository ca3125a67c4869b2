//! The HTML document around the server-rendered page.

use crate::reducer::CounterState;
use isomorphic::pages::escape_html;
use isomorphic::prelude::RenderContext;
use std::convert::Infallible;

/// Path of the client bundle that takes over the page.
pub const BUNDLE_PATH: &str = "/static/bundles/pages/index.js";

/// Assembles the full document from a render context.
///
/// `page_content` and `encoded_state` are inserted verbatim: the first is
/// already escaped markup and the second cannot close its `<script>` element.
pub fn render_document(cx: &RenderContext<CounterState>) -> String {
	format!(
		r#"<!DOCTYPE html>
<html lang='en'>
	<head>
		<meta charset="UTF-8" />
		<title>Example Isomorphic Page</title>
	</head>
	<body>
		<!-- Server-rendered page content -->
		<div id='{container_id}'>{content}</div>

		<!-- Initial state for the client -->
		<script type='application/json' id='{state_id}'>{state}</script>

		<script type='text/javascript' src='{bundle}'></script>
	</body>
</html>
"#,
		container_id = escape_html(&cx.container_element_id),
		content = cx.page_content,
		state_id = escape_html(&cx.initial_state_element_id),
		state = cx.encoded_state,
		bundle = BUNDLE_PATH,
	)
}

/// [`render_document`] in the shape the page renderer expects.
pub fn render(cx: RenderContext<CounterState>) -> Result<String, Infallible> {
	Ok(render_document(&cx))
}
