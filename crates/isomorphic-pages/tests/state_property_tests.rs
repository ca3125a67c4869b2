//! Property-based tests for state embedding
//!
//! Uses proptest to check that any state survives the trip through a server
//! rendered document, and that the encoded form can never close a tag.

mod utils;

use isomorphic_pages::prelude::*;
use isomorphic_pages::state::{decode_state, encode_state};
use proptest::prelude::*;
use proptest::proptest;
use std::collections::BTreeMap;
use utils::{CounterAction, CounterState, counter_renderer, options_with};

fn counter_state() -> impl Strategy<Value = CounterState> {
	(any::<i64>(), proptest::option::of(any::<String>()), any::<bool>()).prop_map(
		|(counter, user_name, interactive)| CounterState {
			counter,
			user_name,
			interactive,
		},
	)
}

proptest! {
	/// Property: decoding an encoded state yields the same state
	#[test]
	fn prop_state_round_trips(state in counter_state()) {
		let encoded = encode_state(&state).unwrap();
		let decoded: CounterState = decode_state(&encoded).unwrap();

		prop_assert_eq!(decoded, state);
	}

	/// Property: the encoded state never contains a closing-tag sequence
	#[test]
	fn prop_encoded_state_never_closes_tags(
		values in proptest::collection::btree_map(".*", ".*", 0..8)
	) {
		let values: BTreeMap<String, String> = values;
		let encoded = encode_state(&values).unwrap();

		prop_assert!(!encoded.contains("</"));
	}

	/// Property: strings built around closing tags survive the round trip
	#[test]
	fn prop_hostile_strings_round_trip(
		prefix in ".*",
		tag in "(script|style|SCRIPT|title)",
		suffix in ".*"
	) {
		let value = format!("{}</{}>{}", prefix, tag, suffix);
		let encoded = encode_state(&value).unwrap();

		prop_assert!(!encoded.contains("</"));
		prop_assert_eq!(decode_state::<String>(&encoded).unwrap(), value);
	}

	/// Property: a page rendered on the server hydrates to the same state
	#[test]
	fn prop_server_state_survives_hydration(
		counter in any::<i64>(),
		user_name in ".*"
	) {
		let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
		let renderer = counter_renderer();

		let (server_state, client_state) = runtime.block_on(async {
			let actions = vec![
				CounterAction::SetCounter(counter),
				CounterAction::SetUserName(user_name),
			];
			let html = renderer.get_initial_html(options_with(actions)).await.unwrap();
			let document = MemoryDocument::from_html(&html);
			let payload = document.get_element_text("initial-state").unwrap();
			let server_state: CounterState = decode_state(&payload).unwrap();

			let store = renderer.client_main(&document, ClientOptions::new()).await.unwrap();
			(server_state, store.state())
		});

		prop_assert_eq!(server_state.counter, counter);
		prop_assert_eq!(client_state, server_state);
	}
}
