//! Integration tests for client hydration
//!
//! These tests hand server output to the client entry point and check that:
//! 1. The client store starts from exactly the server state
//! 2. The client takes over the container with identical markup
//! 3. Missing or corrupt server output fails loudly before anything is mounted
//! 4. Dispatches after hydration re-render the page

mod utils;

use isomorphic_pages::prelude::*;
use isomorphic_pages::state::decode_state;
use rstest::rstest;
use std::convert::Infallible;
use utils::{CounterAction, CounterReducer, CounterState, counter_renderer, server_document};

fn interactive_client() -> ClientOptions<CounterReducer> {
	ClientOptions::new().dispatch_client_setup_events(Setup::sync(
		|dispatch: &Dispatch<CounterReducer>| {
			dispatch.dispatch(CounterAction::SetInteractive(true));
			Ok::<_, Infallible>(())
		},
	))
}

#[rstest]
#[tokio::test]
async fn test_client_state_equals_server_state() {
	let document = server_document(vec![
		CounterAction::SetUserName("Ada".to_string()),
		CounterAction::SetCounter(5),
	])
	.await;
	let payload = document.get_element_text("initial-state").unwrap();
	let server_state: CounterState = decode_state(&payload).unwrap();

	let store = counter_renderer()
		.client_main(&document, ClientOptions::new())
		.await
		.unwrap();

	assert_eq!(store.state(), server_state);
	assert_eq!(store.state().counter, 5);
}

#[rstest]
#[tokio::test]
async fn test_hydrated_markup_matches_server_markup() {
	let document = server_document(vec![CounterAction::SetCounter(5)]).await;
	let server_markup = document.inner_html("container").unwrap();

	counter_renderer()
		.client_main(&document, ClientOptions::new())
		.await
		.unwrap();

	assert_eq!(document.inner_html("container").unwrap(), server_markup);
	assert!(document.mounted("container").is_some());
	assert_eq!(document.write_count(), 1);
}

/// A template whose container holds a comment with a closing tag in it and a
/// raw-text child, ahead of the rendered page.
fn noisy_template(cx: RenderContext<CounterState>) -> Result<String, Infallible> {
	Ok(format!(
		"<!DOCTYPE html><html><body>\
		 <div id='{}'><!-- </div> --><textarea id='draft'></div></textarea>{}</div>\
		 <p id='footer'>footer</p>\
		 <script type='application/json' id='{}'>{}</script>\
		 </body></html>",
		cx.container_element_id, cx.page_content, cx.initial_state_element_id, cx.encoded_state,
	))
}

#[rstest]
#[tokio::test]
async fn test_mount_prunes_every_server_descendant() {
	let options = InitialHtmlOptions::sync(noisy_template).dispatch_setup_events(Setup::sync(
		|dispatch: &Dispatch<CounterReducer>| {
			dispatch.dispatch(CounterAction::SetCounter(3));
			Ok::<_, Infallible>(())
		},
	));
	let html = counter_renderer().get_initial_html(options).await.unwrap();
	let document = MemoryDocument::from_html(&html);
	assert!(document.has_element("draft"));
	assert!(
		document
			.get_element_text("container")
			.unwrap()
			.contains("The counter is 3")
	);

	let store = counter_renderer()
		.client_main(&document, ClientOptions::new())
		.await
		.unwrap();

	assert_eq!(store.state().counter, 3);
	assert!(!document.has_element("draft"));
	assert!(document.has_element("footer"));
	assert_eq!(
		document.get_element_text("counter").as_deref(),
		Some("The counter is 3")
	);
	assert_eq!(
		document.inner_html("container").unwrap(),
		"<div class=\"counter-page\"><h1>Hello</h1><p id=\"counter\">The counter is 3</p></div>"
	);
	assert_eq!(document.write_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_setup_actions_are_not_replayed() {
	let document = server_document(vec![CounterAction::Increment, CounterAction::Increment]).await;

	let store = counter_renderer()
		.client_main(&document, ClientOptions::new())
		.await
		.unwrap();

	assert_eq!(store.state().counter, 2);
	assert_eq!(
		document.get_element_text("counter").as_deref(),
		Some("The counter is 2")
	);
}

#[rstest]
#[tokio::test]
async fn test_missing_state_element() {
	let document = MemoryDocument::from_html("<div id='container'><p>server</p></div>");

	let err = counter_renderer()
		.client_main(&document, ClientOptions::new())
		.await
		.unwrap_err();

	assert!(matches!(
		err,
		Error::Hydration(HydrationError::StateElementNotFound(ref id)) if id == "initial-state"
	));
	assert_eq!(document.write_count(), 0);
}

#[rstest]
#[case("{\"counter\":")]
#[case("")]
#[case("{\"counter\":\"five\",\"interactive\":false}")]
#[tokio::test]
async fn test_malformed_state(#[case] payload: &str) {
	let document = MemoryDocument::new()
		.with_element("container", "")
		.with_element("initial-state", payload);

	let err = counter_renderer()
		.client_main(&document, ClientOptions::new())
		.await
		.unwrap_err();

	assert!(matches!(
		err,
		Error::Hydration(HydrationError::MalformedState(_))
	));
	assert_eq!(document.write_count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_missing_container() {
	let document = server_document(vec![]).await;
	document.remove_element("container");

	let err = counter_renderer()
		.client_main(&document, ClientOptions::new())
		.await
		.unwrap_err();

	assert!(matches!(
		err,
		Error::Hydration(HydrationError::ContainerNotFound(ref id)) if id == "container"
	));
	assert_eq!(document.write_count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_custom_element_ids_round_trip() {
	let renderer = counter_renderer()
		.container_element_id("app")
		.initial_state_element_id("boot-state");
	let html = renderer
		.get_initial_html(utils::options_with(vec![CounterAction::SetCounter(8)]))
		.await
		.unwrap();
	let document = MemoryDocument::from_html(&html);

	let store = renderer
		.client_main(&document, ClientOptions::new())
		.await
		.unwrap();

	assert_eq!(store.state().counter, 8);
	assert!(document.mounted("app").is_some());
}

#[rstest]
#[tokio::test]
async fn test_client_setup_makes_page_interactive() {
	let document = server_document(vec![CounterAction::SetCounter(5)]).await;

	let store = counter_renderer()
		.client_main(&document, interactive_client())
		.await
		.unwrap();

	assert!(store.state().interactive);
	assert!(document.has_element("inc"));
	assert_eq!(document.write_count(), 2);
}

#[rstest]
#[tokio::test]
async fn test_dispatch_rerenders_page() {
	let document = server_document(vec![CounterAction::SetCounter(5)]).await;
	let store = counter_renderer()
		.client_main(&document, interactive_client())
		.await
		.unwrap();

	assert_eq!(document.trigger("inc", EventType::Click), 1);
	assert_eq!(document.trigger("inc", EventType::Click), 1);
	assert_eq!(document.trigger("dec", EventType::Click), 1);

	assert_eq!(store.state().counter, 6);
	assert_eq!(
		document.get_element_text("counter").as_deref(),
		Some("The counter is 6")
	);
	assert_eq!(document.write_count(), 5);
}

#[rstest]
#[tokio::test]
async fn test_unhandled_event_is_ignored() {
	let document = server_document(vec![]).await;
	counter_renderer()
		.client_main(&document, interactive_client())
		.await
		.unwrap();

	assert_eq!(document.trigger("inc", EventType::Input), 0);
	assert_eq!(document.trigger("missing", EventType::Click), 0);
	assert_eq!(document.write_count(), 2);
}

#[rstest]
#[tokio::test]
async fn test_client_setup_failure_after_mount() {
	let document = server_document(vec![]).await;

	let err = counter_renderer()
		.client_main(
			&document,
			ClientOptions::new().dispatch_client_setup_events(Setup::sync(
				|_: &Dispatch<CounterReducer>| Err::<(), _>("socket closed"),
			)),
		)
		.await
		.unwrap_err();

	assert!(matches!(err, Error::SetupDispatch(ref source) if source.to_string() == "socket closed"));
	assert_eq!(document.write_count(), 1);
}
