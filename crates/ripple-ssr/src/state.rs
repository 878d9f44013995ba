//! Hydration payload.
//!
//! The server serializes captured signal values, per-component props and
//! free-form metadata into a JSON `<script>` element next to the rendered
//! markup. The client reads it back before hydrating.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `id` of the `<script>` element carrying the payload.
pub const STATE_SCRIPT_ID: &str = "__RIPPLE_STATE__";

/// State shipped from a server render to the hydrating client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsrState {
	/// Signal values keyed by signal id.
	signals: BTreeMap<String, Value>,
	/// Component props keyed by an application-chosen id.
	props: BTreeMap<String, Value>,
	/// Anything else the application wants to ship.
	metadata: BTreeMap<String, Value>,
}

impl SsrState {
	/// Creates an empty state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a signal value.
	pub fn add_signal(&mut self, id: impl Into<String>, value: impl Serialize) {
		insert(&mut self.signals, id.into(), value);
	}

	/// Adds component props.
	pub fn add_props(&mut self, id: impl Into<String>, props: impl Serialize) {
		insert(&mut self.props, id.into(), props);
	}

	/// Adds metadata.
	pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Serialize) {
		insert(&mut self.metadata, key.into(), value);
	}

	/// Gets a signal value by id.
	pub fn get_signal(&self, id: &str) -> Option<&Value> {
		self.signals.get(id)
	}

	/// Gets component props by id.
	pub fn get_props(&self, id: &str) -> Option<&Value> {
		self.props.get(id)
	}

	/// Gets metadata by key.
	pub fn get_metadata(&self, key: &str) -> Option<&Value> {
		self.metadata.get(key)
	}

	/// Returns the number of signal values.
	pub fn signal_count(&self) -> usize {
		self.signals.len()
	}

	/// Returns the number of props entries.
	pub fn props_count(&self) -> usize {
		self.props.len()
	}

	/// Returns `true` if nothing has been added.
	pub fn is_empty(&self) -> bool {
		self.signals.is_empty() && self.props.is_empty() && self.metadata.is_empty()
	}

	/// Serializes the state to JSON.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	/// Serializes the state to pretty-printed JSON.
	pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(self)
	}

	/// Deserializes state from JSON.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Renders the `<script>` element carrying this state.
	pub fn to_script_tag(&self) -> Result<String, serde_json::Error> {
		let json = self.to_json()?;
		Ok(format!(
			r#"<script id="{STATE_SCRIPT_ID}" type="application/json">{}</script>"#,
			escape_json_for_script(&json)
		))
	}

	/// Merges another state into this one. Entries of `other` win.
	pub fn merge(&mut self, other: SsrState) {
		self.signals.extend(other.signals);
		self.props.extend(other.props);
		self.metadata.extend(other.metadata);
	}
}

fn insert(map: &mut BTreeMap<String, Value>, key: String, value: impl Serialize) {
	match serde_json::to_value(value) {
		Ok(json) => {
			map.insert(key, json);
		}
		Err(error) => tracing::warn!(%key, %error, "skipping unserializable state entry"),
	}
}

/// Keeps `</script>` inside string values from closing the element early.
///
/// `<\/` is a valid JSON escape for `</`, so the payload still parses.
fn escape_json_for_script(json: &str) -> String {
	json.replace("</", "<\\/")
}
