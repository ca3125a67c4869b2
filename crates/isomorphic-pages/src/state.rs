//! State encoding for embedding store state in server-rendered HTML.
//!
//! The encoded form is compact JSON in which every `</` has been rewritten to
//! `<\/`. HTML parsers end a `<script>` element at the first `</script`, so the
//! rewrite keeps the payload from closing its enclosing element early. `\/` is a
//! valid JSON escape, so the escaped text still decodes to the same value.
//!
//! Only the value is encoded here. Choosing the element that carries the
//! payload, and its id, belongs to the page template.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Failure to serialize store state.
#[derive(Debug, thiserror::Error)]
#[error("Failed to encode state: {0}")]
pub struct StateEncodeError(#[from] serde_json::Error);

/// An encoded state payload that does not parse into the expected state type.
#[derive(Debug, thiserror::Error)]
#[error("Malformed state payload at line {line}, column {column}: {source}")]
pub struct MalformedStateError {
	line: usize,
	column: usize,
	#[source]
	source: serde_json::Error,
}

impl MalformedStateError {
	/// Line of the payload where parsing stopped.
	pub fn line(&self) -> usize {
		self.line
	}

	/// Column of the payload where parsing stopped.
	pub fn column(&self) -> usize {
		self.column
	}
}

impl From<serde_json::Error> for MalformedStateError {
	fn from(source: serde_json::Error) -> Self {
		Self {
			line: source.line(),
			column: source.column(),
			source,
		}
	}
}

/// Encodes `state` into text that can be embedded verbatim in an HTML document.
///
/// The output never contains the sequence `</`.
///
/// # Example
///
/// ```
/// use isomorphic_pages::state::{decode_state, encode_state};
///
/// let encoded = encode_state(&vec!["</script>"]).unwrap();
/// assert_eq!(encoded, r#"["<\/script>"]"#);
///
/// let decoded: Vec<String> = decode_state(&encoded).unwrap();
/// assert_eq!(decoded, vec!["</script>".to_string()]);
/// ```
pub fn encode_state<S: Serialize + ?Sized>(state: &S) -> Result<String, StateEncodeError> {
	let json = serde_json::to_string(state)?;
	Ok(escape_json_for_script(&json))
}

/// Decodes state previously produced by [`encode_state`].
///
/// `text` is expected to be the text content of the payload element as read
/// from the document.
pub fn decode_state<S: DeserializeOwned>(text: &str) -> Result<S, MalformedStateError> {
	Ok(serde_json::from_str(text)?)
}

/// Rewrites `</` as `<\/` so JSON can live inside a `<script>` element.
fn escape_json_for_script(json: &str) -> String {
	json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::Deserialize;
	use serde_json::json;

	#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
	struct Profile {
		name: String,
		visits: u32,
		tags: Vec<String>,
	}

	#[rstest]
	#[case("</script>", "<\\/script>")]
	#[case(
		"</script><script>alert(1)</script>",
		"<\\/script><script>alert(1)<\\/script>"
	)]
	#[case(r#"{"name":"test"}"#, r#"{"name":"test"}"#)]
	fn test_escape_json_for_script(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_json_for_script(input), expected);
	}

	#[rstest]
	fn test_encode_state_is_compact_json() {
		let encoded = encode_state(&json!({"counter": 5})).unwrap();
		assert_eq!(encoded, r#"{"counter":5}"#);
	}

	#[rstest]
	fn test_encode_state_escapes_closing_tags() {
		let profile = Profile {
			name: "</script><img src=x onerror=alert(1)>".to_string(),
			visits: 3,
			tags: vec!["a</b".to_string()],
		};

		let encoded = encode_state(&profile).unwrap();

		assert!(!encoded.contains("</"));
		assert!(encoded.contains("<\\/script>"));
		let decoded: Profile = decode_state(&encoded).unwrap();
		assert_eq!(decoded, profile);
	}

	#[rstest]
	#[case("")]
	#[case("{")]
	#[case("{\"name\": 1}")]
	#[case("<script>")]
	fn test_decode_state_rejects_malformed(#[case] text: &str) {
		let result: Result<Profile, _> = decode_state(text);
		assert!(result.is_err());
	}

	#[rstest]
	fn test_malformed_state_reports_position() {
		let err = decode_state::<Profile>("{\n  \"name\": }").unwrap_err();
		assert_eq!(err.line(), 2);
		assert!(err.to_string().starts_with("Malformed state payload at line 2"));
	}

	#[rstest]
	fn test_encode_state_rejects_non_string_keys() {
		let mut map = std::collections::HashMap::new();
		map.insert(vec![1u8], 1);

		assert!(encode_state(&map).is_err());
	}
}
