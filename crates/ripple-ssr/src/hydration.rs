//! Client-side hydration of server-rendered pages.
//!
//! The client loads the server markup into its host document (see
//! [`ripple_dom::parse_fragment`]), restores signal values from the state
//! script and then calls [`hydrate`] with the same tree the server rendered.
//! Matching nodes are adopted instead of recreated; the returned [`Root`]
//! takes over from there.

use std::cell::RefCell;
use std::rc::Rc;

use ripple_core::{Child, RenderError, Root, RuntimeOptions};
use ripple_dom::Document;
use ripple_signals::WriteSignal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::state::{STATE_SCRIPT_ID, SsrState};

/// Errors that can occur during hydration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HydrationError {
	/// The container element was not found.
	#[error("hydration root element not found: {0}")]
	RootNotFound(String),

	/// The state payload could not be parsed or applied.
	#[error("failed to parse SSR state: {0}")]
	StateParseError(String),

	/// Rendering the tree failed.
	#[error(transparent)]
	Render(#[from] RenderError),
}

/// State restored from a server render.
#[derive(Debug, Default)]
pub struct HydrationContext {
	state: SsrState,
	hydrated: bool,
}

impl HydrationContext {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a context over an already parsed state.
	pub fn from_state(state: SsrState) -> Self {
		Self {
			state,
			hydrated: false,
		}
	}

	/// Reads the state script out of `document`.
	///
	/// A document without a state script yields an empty context.
	pub fn from_document(document: &Document) -> Result<Self, HydrationError> {
		let Some(script) = document.get_element_by_id(STATE_SCRIPT_ID) else {
			tracing::debug!("no hydration state script found");
			return Ok(Self::new());
		};
		let json = document.text_content(script);
		let state =
			SsrState::from_json(&json).map_err(|e| HydrationError::StateParseError(e.to_string()))?;
		tracing::debug!(signals = state.signal_count(), "hydration state loaded");
		Ok(Self::from_state(state))
	}

	/// Returns the restored state.
	pub fn state(&self) -> &SsrState {
		&self.state
	}

	/// Gets a signal value by id.
	pub fn get_signal(&self, id: &str) -> Option<&Value> {
		self.state.get_signal(id)
	}

	/// Gets component props by id.
	pub fn get_props(&self, id: &str) -> Option<&Value> {
		self.state.get_props(id)
	}

	/// Writes the server value of `signal`, if one was captured.
	///
	/// Returns whether a value was restored. Signals are matched by id, so
	/// the client must create its server signals in the same order as the
	/// server did.
	pub fn restore<T>(&self, signal: &WriteSignal<T>) -> Result<bool, HydrationError>
	where
		T: DeserializeOwned,
	{
		let id = signal.id().to_string();
		let Some(json) = self.state.get_signal(&id) else {
			return Ok(false);
		};
		let value = serde_json::from_value::<T>(json.clone())
			.map_err(|e| HydrationError::StateParseError(format!("signal {id}: {e}")))?;
		signal.set(value);
		Ok(true)
	}

	/// Marks hydration as complete.
	pub fn mark_hydrated(&mut self) {
		self.hydrated = true;
	}

	/// Returns `true` once hydration has completed.
	pub fn is_hydrated(&self) -> bool {
		self.hydrated
	}
}

/// A hydrated root together with the state it was hydrated with.
#[derive(Debug)]
pub struct Hydrated {
	/// The live root.
	pub root: Root,
	/// The restored state.
	pub context: HydrationContext,
}

/// Hydrates the element with id `container_id` against `app`.
pub fn hydrate(
	document: Rc<RefCell<Document>>,
	container_id: &str,
	app: impl Into<Child>,
) -> Result<Hydrated, HydrationError> {
	hydrate_with_options(document, container_id, app, RuntimeOptions::default())
}

/// Like [`hydrate`], with explicit runtime options.
pub fn hydrate_with_options(
	document: Rc<RefCell<Document>>,
	container_id: &str,
	app: impl Into<Child>,
	options: RuntimeOptions,
) -> Result<Hydrated, HydrationError> {
	let (container, mut context) = {
		let doc = document.borrow();
		let container = doc
			.get_element_by_id(container_id)
			.ok_or_else(|| HydrationError::RootNotFound(container_id.to_string()))?;
		(container, HydrationContext::from_document(&doc)?)
	};

	let root = Root::hydrate(document, container, app, options)?;
	context.mark_hydrated();
	Ok(Hydrated { root, context })
}

#[cfg(test)]
mod tests {
	use super::*;
	use ripple_core::VNode;
	use ripple_dom::parse_fragment;
	use ripple_signals::create_signal;
	use rstest::rstest;

	fn document(markup: &str) -> Rc<RefCell<Document>> {
		let mut doc = Document::new();
		let body = doc.body();
		parse_fragment(&mut doc, body, markup).unwrap();
		doc.clear_mutations();
		Rc::new(RefCell::new(doc))
	}

	#[rstest]
	fn test_missing_root_fails_fast() {
		let doc = document("<div id=\"other\"></div>");

		let err = hydrate(doc, "app", VNode::element("p")).unwrap_err();

		assert!(matches!(err, HydrationError::RootNotFound(ref id) if id == "app"));
		assert_eq!(err.to_string(), "hydration root element not found: app");
	}

	#[rstest]
	fn test_context_reads_state_script() {
		let doc = document(concat!(
			r#"<div id="app"></div>"#,
			r#"<script id="__RIPPLE_STATE__" type="application/json">"#,
			r#"{"signals":{"s9":"<\/b>"},"props":{"nav":{"open":true}}}"#,
			"</script>"
		));

		let context = HydrationContext::from_document(&doc.borrow()).unwrap();

		assert_eq!(context.get_signal("s9"), Some(&Value::from("</b>")));
		assert_eq!(context.get_props("nav").unwrap()["open"], true);
		assert!(!context.is_hydrated());
	}

	#[rstest]
	fn test_context_without_script_is_empty() {
		let doc = document(r#"<div id="app"></div>"#);
		let context = HydrationContext::from_document(&doc.borrow()).unwrap();
		assert!(context.state().is_empty());
	}

	#[rstest]
	fn test_malformed_state_is_reported() {
		let doc = document(r#"<script id="__RIPPLE_STATE__">{oops</script>"#);

		let err = HydrationContext::from_document(&doc.borrow()).unwrap_err();

		assert!(matches!(err, HydrationError::StateParseError(_)));
	}

	#[rstest]
	fn test_restore_sets_matching_signal() {
		let (read, write) = create_signal(0u32);
		let mut state = SsrState::new();
		state.add_signal(read.id().to_string(), 41);
		let context = HydrationContext::from_state(state);

		assert!(context.restore(&write).unwrap());
		assert_eq!(read.get(), 41);
	}

	#[rstest]
	fn test_restore_without_value_keeps_signal() {
		let (read, write) = create_signal("client".to_string());
		let context = HydrationContext::new();

		assert!(!context.restore(&write).unwrap());
		assert_eq!(read.get(), "client");
	}

	#[rstest]
	fn test_restore_with_wrong_type_fails() {
		let (read, write) = create_signal(0u32);
		let mut state = SsrState::new();
		state.add_signal(read.id().to_string(), "not a number");
		let context = HydrationContext::from_state(state);

		let err = context.restore(&write).unwrap_err();

		assert!(matches!(err, HydrationError::StateParseError(_)));
		assert_eq!(read.get(), 0);
	}

	#[rstest]
	fn test_hydrate_marks_context() {
		let doc = document(r#"<div id="app" data-ripple-root><p>hi</p></div>"#);

		let hydrated = hydrate(doc.clone(), "app", VNode::element("p").child("hi")).unwrap();

		assert!(hydrated.context.is_hydrated());
		assert_eq!(hydrated.root.inner_html(), "<p>hi</p>");
		assert!(doc.borrow().mutations().is_empty());
	}
}
