//! Snapshot tests for server-rendered markup

use ripple_core::{Child, Component, Props, Scope, VNode};
use ripple_signals::{create_server_signal, reset_server_signals};
use ripple_ssr::{SsrOptions, SsrRenderer};
use rstest::rstest;
use serial_test::serial;

fn todo_list(items: &[(&'static str, bool)]) -> VNode {
	let item = Component::new("TodoItem", |_: &Scope, props: &Props| {
		let done = props.get_bool("done").unwrap_or_default();
		Ok(VNode::element("li")
			.attr("class", if done { "done" } else { "open" })
			.child(VNode::element("input").attr("type", "checkbox").attr("checked", done))
			.child(props.get_str("label").unwrap_or_default().to_string())
			.into())
	});
	VNode::element("ul").children(items.iter().map(|&(label, done)| {
		VNode::component(
			item.clone(),
			Props::new().with("label", label).with("done", done),
		)
		.key(label)
	}))
}

#[rstest]
fn test_nested_components_and_void_elements() {
	let html = SsrRenderer::new()
		.render_to_string(todo_list(&[("milk", true), ("bread & jam", false)]))
		.unwrap();

	insta::assert_snapshot!(html, @r#"<ul><li class="done"><input checked="" type="checkbox">milk</li><li class="open"><input type="checkbox">bread &amp; jam</li></ul>"#);
}

#[rstest]
fn test_fragments_and_mixed_text() {
	let app = VNode::fragment([
		Child::from("Total: "),
		Child::Int(3),
		Child::Null,
		VNode::element("em").child("items").into(),
		Child::from(" left"),
	]);

	let html = SsrRenderer::new().render_to_string(app).unwrap();

	insta::assert_snapshot!(html, @"Total: <!---->3<em>items</em> left");
}

#[rstest]
fn test_component_children_are_rendered() {
	let card = Component::new("Card", |_: &Scope, props: &Props| {
		Ok(VNode::element("div")
			.attr("class", "card")
			.children(props.children().to_vec())
			.into())
	});
	let app = VNode::component(card, Props::new()).child(VNode::element("p").child("body"));

	let html = SsrRenderer::new().render_to_string(app).unwrap();

	insta::assert_snapshot!(html, @r#"<div class="card"><p>body</p></div>"#);
}

#[rstest]
#[serial(server_signals)]
fn test_page_carries_server_signals() {
	reset_server_signals();
	let (title, _) = create_server_signal("</script> & co".to_string());
	let mut renderer = SsrRenderer::with_options(SsrOptions::new().container_id("root"));
	renderer.state_mut().add_metadata("route", "/about");

	let html = renderer
		.render_page(VNode::element("h1").child(title.get()))
		.unwrap();

	insta::assert_snapshot!(html, @r#"<div id="root" data-ripple-root><h1>&lt;/script&gt; &amp; co</h1></div><script id="__RIPPLE_STATE__" type="application/json">{"signals":{"s0":"<\/script> & co"},"props":{},"metadata":{"route":"/about"}}</script>"#);
}

#[rstest]
#[serial(server_signals)]
fn test_page_without_state_script() {
	reset_server_signals();
	let (_count, _) = create_server_signal(1);
	let mut renderer = SsrRenderer::with_options(SsrOptions::new().no_state_script());

	let html = renderer.render_page(VNode::element("main")).unwrap();

	assert_eq!(html, r#"<div id="app" data-ripple-root><main></main></div>"#);
	assert_eq!(renderer.state().signal_count(), 1);
}

#[rstest]
fn test_component_error_propagates() {
	let broken = Component::new("Broken", |_: &Scope, _: &Props| {
		Err(ripple_core::RenderError::component("Broken", "no data"))
	});

	let err = SsrRenderer::new()
		.render_to_string(VNode::component(broken, Props::new()))
		.unwrap_err();

	assert_eq!(err.to_string(), "component `Broken` failed: no data");
}
