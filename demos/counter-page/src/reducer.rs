//! Counter state, actions and the reducer that ties them together.

use isomorphic::prelude::{Dispatch, Reducer};
use serde::{Deserialize, Serialize};

/// State of the counter page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterState {
	pub counter: i64,
	pub default_counter_set: bool,
	pub interactive: bool,
	pub server_value: Option<serde_json::Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_name: Option<String>,
}

impl Default for CounterState {
	fn default() -> Self {
		Self {
			counter: 0,
			default_counter_set: false,
			interactive: false,
			server_value: None,
			user_name: None,
		}
	}
}

/// Actions understood by [`CounterReducer`].
///
/// Serialized as `{"type": "...", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum CounterAction {
	SetUserName(String),
	SetCounter(i64),
	IncCounter,
	DecCounter,
	SetInteractive,
	DefaultCounterSet,
}

const STEP: i64 = 1;

#[derive(Debug, Clone, Copy, Default)]
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
			CounterAction::SetUserName(name) => next.user_name = Some(name),
			CounterAction::SetCounter(value) => next.counter = value,
			CounterAction::IncCounter => next.counter = state.counter.saturating_add(STEP),
			CounterAction::DecCounter => next.counter = state.counter.saturating_sub(STEP),
			CounterAction::SetInteractive => next.interactive = true,
			CounterAction::DefaultCounterSet => next.default_counter_set = true,
		}
		next
	}
}

pub fn set_user_name(dispatch: &Dispatch<CounterReducer>, user_name: impl Into<String>) {
	dispatch.dispatch(CounterAction::SetUserName(user_name.into()));
}

pub fn set_counter(dispatch: &Dispatch<CounterReducer>, value: i64) {
	dispatch.dispatch(CounterAction::SetCounter(value));
}

pub fn inc_counter(dispatch: &Dispatch<CounterReducer>) {
	dispatch.dispatch(CounterAction::IncCounter);
}

pub fn dec_counter(dispatch: &Dispatch<CounterReducer>) {
	dispatch.dispatch(CounterAction::DecCounter);
}

pub fn set_interactive(dispatch: &Dispatch<CounterReducer>) {
	dispatch.dispatch(CounterAction::SetInteractive);
}

pub fn set_default_counter_set(dispatch: &Dispatch<CounterReducer>) {
	dispatch.dispatch(CounterAction::DefaultCounterSet);
}

#[cfg(test)]
mod tests {
	use super::*;
	use isomorphic::prelude::Store;
	use rstest::rstest;
	use std::sync::Arc;

	fn reduce_all(actions: Vec<CounterAction>) -> CounterState {
		actions
			.into_iter()
			.fold(CounterReducer.initial_state(), |state, action| {
				CounterReducer.reduce(&state, action)
			})
	}

	#[rstest]
	#[case(vec![], 0)]
	#[case(vec![CounterAction::IncCounter], 1)]
	#[case(vec![CounterAction::DecCounter, CounterAction::DecCounter], -2)]
	#[case(vec![CounterAction::SetCounter(100), CounterAction::IncCounter], 101)]
	#[case(vec![CounterAction::SetCounter(i64::MAX), CounterAction::IncCounter], i64::MAX)]
	fn test_counter_transitions(#[case] actions: Vec<CounterAction>, #[case] expected: i64) {
		assert_eq!(reduce_all(actions).counter, expected);
	}

	#[rstest]
	fn test_flags_and_user_name() {
		let state = reduce_all(vec![
			CounterAction::SetUserName("Andromeda".to_string()),
			CounterAction::SetInteractive,
			CounterAction::DefaultCounterSet,
		]);

		assert_eq!(state.user_name.as_deref(), Some("Andromeda"));
		assert!(state.interactive);
		assert!(state.default_counter_set);
	}

	#[rstest]
	fn test_reduce_leaves_input_untouched() {
		let state = CounterState::default();
		let _ = CounterReducer.reduce(&state, CounterAction::SetCounter(7));
		assert_eq!(state, CounterState::default());
	}

	#[rstest]
	fn test_default_state_json() {
		let json = serde_json::to_value(CounterState::default()).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"counter": 0,
				"defaultCounterSet": false,
				"interactive": false,
				"serverValue": null
			})
		);
	}

	#[rstest]
	#[case(CounterAction::IncCounter, r#"{"type":"inc-counter"}"#)]
	#[case(CounterAction::SetCounter(3), r#"{"type":"set-counter","payload":3}"#)]
	#[case(
		CounterAction::SetUserName("Ada".to_string()),
		r#"{"type":"set-user-name","payload":"Ada"}"#
	)]
	fn test_action_wire_format(#[case] action: CounterAction, #[case] expected: &str) {
		assert_eq!(serde_json::to_string(&action).unwrap(), expected);
		assert_eq!(serde_json::from_str::<CounterAction>(expected).unwrap(), action);
	}

	#[rstest]
	fn test_dispatch_helpers() {
		let store = Store::new(Arc::new(CounterReducer), None);
		let dispatch = store.dispatcher();

		set_user_name(&dispatch, "Ada");
		set_counter(&dispatch, 10);
		set_default_counter_set(&dispatch);
		inc_counter(&dispatch);
		inc_counter(&dispatch);
		dec_counter(&dispatch);
		set_interactive(&dispatch);

		let state = store.state();
		assert_eq!(state.counter, 11);
		assert_eq!(state.user_name.as_deref(), Some("Ada"));
		assert!(state.default_counter_set);
		assert!(state.interactive);
	}
}
