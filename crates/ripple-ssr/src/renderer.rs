//! Rendering a virtual tree to HTML on the server.

use ripple_core::{Child, NodeType, PropValue, RenderResult, Runtime, RuntimeOptions, VNode};
use ripple_dom::html::{RAW_TEXT_ELEMENTS, escape_attr, escape_text, is_void};
use ripple_signals::collect_server_signals;

use crate::state::SsrState;

/// Options for server rendering.
#[derive(Debug, Clone)]
pub struct SsrOptions {
	/// Whether [`SsrRenderer::render_page`] appends the state script.
	pub include_state_script: bool,
	/// `id` of the container element written by [`SsrRenderer::render_page`].
	pub container_id: String,
	/// Whether adjacent text nodes are separated by `<!---->`.
	pub text_separators: bool,
}

impl Default for SsrOptions {
	fn default() -> Self {
		Self {
			include_state_script: true,
			container_id: "app".to_string(),
			text_separators: true,
		}
	}
}

impl SsrOptions {
	/// Creates default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the container id.
	pub fn container_id(mut self, id: impl Into<String>) -> Self {
		self.container_id = id.into();
		self
	}

	/// Omits the state script from rendered pages.
	pub fn no_state_script(mut self) -> Self {
		self.include_state_script = false;
		self
	}

	/// Writes adjacent text nodes without separators.
	///
	/// The output is then only suitable for static pages: a hydrating client
	/// sees the merged text as one node.
	pub fn no_text_separators(mut self) -> Self {
		self.text_separators = false;
		self
	}
}

/// Renders virtual trees to HTML strings.
///
/// Components run with a private [`Runtime`]: hooks work as on the client,
/// but effects are discarded after every render and state updates never
/// cause a second pass.
pub struct SsrRenderer {
	options: SsrOptions,
	state: SsrState,
	runtime: Runtime,
}

impl Default for SsrRenderer {
	fn default() -> Self {
		Self::new()
	}
}

impl SsrRenderer {
	/// Creates a renderer with default options.
	pub fn new() -> Self {
		Self::with_options(SsrOptions::default())
	}

	/// Creates a renderer with custom options.
	pub fn with_options(options: SsrOptions) -> Self {
		Self {
			options,
			state: SsrState::new(),
			runtime: Runtime::new(RuntimeOptions::default()),
		}
	}

	/// Returns the options.
	pub fn options(&self) -> &SsrOptions {
		&self.options
	}

	/// Returns the state shipped with rendered pages.
	pub fn state(&self) -> &SsrState {
		&self.state
	}

	/// Returns the state for adding props or metadata.
	pub fn state_mut(&mut self) -> &mut SsrState {
		&mut self.state
	}

	/// Renders `app` to markup.
	pub fn render_to_string(&mut self, app: impl Into<Child>) -> RenderResult<String> {
		let app = app.into();
		let mut writer = Writer {
			runtime: &self.runtime,
			separators: self.options.text_separators,
			out: String::new(),
			after_text: false,
		};
		let result = writer.child(&app);
		let discarded = self.runtime.discard_effects();
		if discarded > 0 {
			tracing::debug!(discarded, "server render discarded effects");
		}
		result?;
		Ok(writer.out)
	}

	/// Renders `app` into its container, followed by the state script.
	///
	/// Values of live server signals are merged into the state first.
	pub fn render_page(&mut self, app: impl Into<Child>) -> RenderResult<String> {
		let body = self.render_to_string(app)?;
		for (id, value) in collect_server_signals() {
			self.state.add_signal(id, value);
		}

		let mut html = String::with_capacity(body.len() + 64);
		html.push_str("<div id=\"");
		html.push_str(&escape_attr(&self.options.container_id));
		html.push_str("\" data-ripple-root>");
		html.push_str(&body);
		html.push_str("</div>");

		if self.options.include_state_script && !self.state.is_empty() {
			match self.state.to_script_tag() {
				Ok(script) => html.push_str(&script),
				Err(error) => tracing::error!(%error, "failed to serialize hydration state"),
			}
		}
		Ok(html)
	}
}

struct Writer<'a> {
	runtime: &'a Runtime,
	separators: bool,
	out: String,
	/// Whether the last thing written was a text node.
	after_text: bool,
}

impl Writer<'_> {
	fn child(&mut self, child: &Child) -> RenderResult<()> {
		match child {
			Child::Node(vnode) => self.node(vnode),
			Child::Text(_) | Child::Int(_) | Child::Float(_) => {
				let text = child.text().unwrap_or_default();
				if text.is_empty() {
					return Ok(());
				}
				if self.after_text && self.separators {
					self.out.push_str("<!---->");
				}
				self.out.push_str(&escape_text(&text));
				self.after_text = true;
				Ok(())
			}
			Child::Null | Child::Bool(_) => Ok(()),
			Child::List(items) => items.iter().try_for_each(|item| self.child(item)),
		}
	}

	fn node(&mut self, vnode: &VNode) -> RenderResult<()> {
		match &vnode.ty {
			NodeType::Tag(tag) => self.element(tag, vnode),
			NodeType::Fragment => vnode.children.iter().try_for_each(|c| self.child(c)),
			NodeType::Component(component) => {
				let rendered = self
					.runtime
					.render_component(component, &vnode.component_props())?;
				self.child(&rendered)
			}
		}
	}

	fn element(&mut self, tag: &str, vnode: &VNode) -> RenderResult<()> {
		self.after_text = false;
		self.out.push('<');
		self.out.push_str(tag);
		for (name, value) in vnode.props.iter() {
			if matches!(value, PropValue::Handler(_) | PropValue::Ref(_)) {
				continue;
			}
			if let Some(attr) = value.as_attribute() {
				self.out.push(' ');
				self.out.push_str(name);
				self.out.push_str("=\"");
				self.out.push_str(&escape_attr(&attr));
				self.out.push('"');
			}
		}
		self.out.push('>');
		if is_void(tag) {
			return Ok(());
		}

		if RAW_TEXT_ELEMENTS.contains(&tag) {
			for child in &vnode.children {
				if let Some(text) = child.text() {
					self.out.push_str(&text);
				}
			}
		} else {
			for child in &vnode.children {
				self.child(child)?;
			}
		}

		self.out.push_str("</");
		self.out.push_str(tag);
		self.out.push('>');
		self.after_text = false;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::Cell;
	use std::rc::Rc;

	use ripple_core::{Component, Props, Scope};
	use rstest::rstest;

	fn render(app: impl Into<Child>) -> String {
		SsrRenderer::new().render_to_string(app).unwrap()
	}

	#[rstest]
	#[case::text(Child::from("a < b"), "a &lt; b")]
	#[case::int(Child::Int(7), "7")]
	#[case::empty_text(Child::from(""), "")]
	#[case::null(Child::Null, "")]
	#[case::bool(Child::Bool(false), "")]
	fn test_primitives(#[case] child: Child, #[case] expected: &str) {
		assert_eq!(render(child), expected);
	}

	#[rstest]
	fn test_attributes_are_escaped_and_handlers_skipped() {
		let html = render(
			VNode::element("a")
				.attr("href", "/q?a=1&b=\"2\"")
				.attr("hidden", true)
				.attr("draggable", false)
				.on("click", |_| {})
				.child("go"),
		);

		assert_eq!(
			html,
			r#"<a hidden="" href="/q?a=1&amp;b=&quot;2&quot;">go</a>"#
		);
	}

	#[rstest]
	fn test_void_elements_have_no_closing_tag() {
		let html = render(VNode::element("p").child(VNode::element("br")).child("x"));
		assert_eq!(html, "<p><br>x</p>");
	}

	#[rstest]
	fn test_adjacent_text_is_separated() {
		let html = render(VNode::element("p").child("a").child(1i64).child("c"));
		assert_eq!(html, "<p>a<!---->1<!---->c</p>");
	}

	#[rstest]
	fn test_separators_can_be_disabled() {
		let mut renderer = SsrRenderer::with_options(SsrOptions::new().no_text_separators());
		let html = renderer
			.render_to_string(VNode::element("p").child("a").child("b"))
			.unwrap();
		assert_eq!(html, "<p>ab</p>");
	}

	#[rstest]
	fn test_script_content_is_raw() {
		let html = render(VNode::element("script").child("if (a < b) {}"));
		assert_eq!(html, "<script>if (a < b) {}</script>");
	}

	#[rstest]
	fn test_components_render_with_hooks_and_no_effects() {
		let ran = Rc::new(Cell::new(false));
		let flag = ran.clone();
		let app = Component::new("Greeting", move |cx: &Scope, props: &Props| {
			let name = cx.use_state(props.get_str("name").unwrap_or("nobody").to_string())?;
			let flag = flag.clone();
			cx.use_effect(move || flag.set(true))?;
			Ok(VNode::element("h1").child(format!("Hi {}", name.get())).into())
		});
		let mut renderer = SsrRenderer::new();

		let html = renderer
			.render_to_string(VNode::component(app, Props::new().with("name", "Ada")))
			.unwrap();

		assert_eq!(html, "<h1>Hi Ada</h1>");
		assert!(!ran.get());
		assert_eq!(renderer.runtime.pending_effects(), 0);
	}
}
