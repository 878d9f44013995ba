//! Integration tests for the hook runtime
//!
//! Covers the call-order contract, the uniform invalid-hook-call error, and
//! the behaviour of each hook kind across re-renders of one instance.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ripple_core::{
	Child, Component, HookError, HookKind, Props, Ref, RenderError, RenderResult, Root, Runtime,
	RuntimeOptions, Scope, VNode,
};
use ripple_dom::{Document, Event};
use rstest::rstest;

fn root_with(options: RuntimeOptions) -> Root {
	let document = Rc::new(RefCell::new(Document::new()));
	let body = document.borrow().body();
	Root::with_options(document, body, options).unwrap()
}

fn root() -> Root {
	root_with(RuntimeOptions::default())
}

#[rstest]
fn test_every_hook_fails_outside_render() {
	let scope = Runtime::default().scope();

	assert_eq!(scope.use_state(0).unwrap_err(), HookError::InvalidHookCall);
	assert_eq!(scope.use_ref(0).unwrap_err(), HookError::InvalidHookCall);
	assert_eq!(scope.use_memo(|| 1).unwrap_err(), HookError::InvalidHookCall);
	assert_eq!(scope.use_effect(|| ()).unwrap_err(), HookError::InvalidHookCall);
	assert_eq!(scope.use_mount(|| ()).unwrap_err(), HookError::InvalidHookCall);
}

/// Scenario 3: the mount callback runs once across three re-renders
#[rstest]
fn test_mount_runs_once() {
	let mounts = Rc::new(Cell::new(0));
	let app = |mounts: Rc<Cell<i32>>, n: i64| {
		VNode::component(
			Component::new("Mounting", move |cx: &Scope, props: &Props| {
				let mounts = mounts.clone();
				cx.use_mount(move || mounts.set(mounts.get() + 1))?;
				Ok(Child::from(props.get_int("n").unwrap_or_default()))
			}),
			Props::new().with("n", n),
		)
	};
	let mut root = root();

	for n in 0..4 {
		root.render(app(mounts.clone(), n)).unwrap();
	}

	assert_eq!(mounts.get(), 1);
	assert_eq!(root.inner_html(), "3");
}

#[rstest]
fn test_ref_survives_renders_with_different_initial_values() {
	let seen: Rc<RefCell<Vec<Ref<i64>>>> = Rc::new(RefCell::new(Vec::new()));
	let app = |seen: Rc<RefCell<Vec<Ref<i64>>>>, initial: i64| {
		VNode::component(
			Component::new("Holder", move |cx: &Scope, props: &Props| {
				let holder = cx.use_ref(props.get_int("initial").unwrap_or_default())?;
				seen.borrow_mut().push(holder.clone());
				Ok(Child::Null)
			}),
			Props::new().with("initial", initial),
		)
	};
	let mut root = root();

	root.render(app(seen.clone(), 1)).unwrap();
	seen.borrow()[0].set(42);
	root.render(app(seen.clone(), 2)).unwrap();
	root.render(app(seen.clone(), 3)).unwrap();

	let seen = seen.borrow();
	assert_eq!(seen.len(), 3);
	assert!(seen.iter().all(|r| r.ptr_eq(&seen[0])));
	assert_eq!(seen[2].current(), 42);
}

#[rstest]
fn test_memo_recomputes_only_on_dep_change() {
	let computed = Rc::new(Cell::new(0));
	let app = |computed: Rc<Cell<i32>>, dep: i64, noise: i64| {
		VNode::component(
			Component::new("Memo", move |cx: &Scope, props: &Props| {
				let dep = props.get_int("dep").unwrap_or_default();
				let computed = computed.clone();
				let doubled = cx.use_memo_with(dep, move || {
					computed.set(computed.get() + 1);
					dep * 2
				})?;
				Ok(Child::from(*doubled))
			}),
			Props::new().with("dep", dep).with("noise", noise),
		)
	};
	let mut root = root();

	root.render(app(computed.clone(), 1, 0)).unwrap();
	root.render(app(computed.clone(), 1, 1)).unwrap();
	root.render(app(computed.clone(), 1, 2)).unwrap();
	assert_eq!(computed.get(), 1);

	root.render(app(computed.clone(), 5, 2)).unwrap();
	assert_eq!(computed.get(), 2);
	assert_eq!(root.inner_html(), "10");
}

#[rstest]
fn test_memo_without_deps_recomputes_every_render() {
	let computed = Rc::new(Cell::new(0));
	let counter = computed.clone();
	let component = Component::new("Always", move |cx: &Scope, _: &Props| {
		let counter = counter.clone();
		cx.use_memo(move || counter.set(counter.get() + 1))?;
		Ok(Child::Null)
	});
	let mut root = root();

	for _ in 0..3 {
		root.render(VNode::component(component.clone(), Props::new()))
			.unwrap();
	}

	assert_eq!(computed.get(), 3);
}

fn conditional(cx: &Scope, props: &Props) -> RenderResult<Child> {
	if props.get_bool("flip").unwrap_or(false) {
		cx.use_ref(0)?;
	} else {
		cx.use_state(0)?;
	}
	Ok(Child::Null)
}

fn conditional_app(flip: bool) -> VNode {
	VNode::component(
		Component::new("Conditional", conditional),
		Props::new().with("flip", flip),
	)
}

#[rstest]
fn test_order_mismatch_is_detected() {
	let mut root = root_with(RuntimeOptions::new().check_hook_order(true));
	root.render(conditional_app(false)).unwrap();

	let err = root.render(conditional_app(true)).unwrap_err();

	assert!(matches!(
		err,
		RenderError::Hook(HookError::OrderMismatch {
			index: 0,
			expected: HookKind::State,
			found: HookKind::Ref,
		})
	));
}

#[rstest]
fn test_order_mismatch_reinitialises_when_unchecked() {
	let mut root = root_with(RuntimeOptions::new().check_hook_order(false));
	root.render(conditional_app(false)).unwrap();

	assert!(root.render(conditional_app(true)).is_ok());
}

#[rstest]
fn test_reinitialised_effect_slot_runs_its_cleanup() {
	let cleanups = Rc::new(Cell::new(0));
	let app = |cleanups: Rc<Cell<i32>>, effect_first: bool| {
		VNode::component(
			Component::new("Shifting", move |cx: &Scope, props: &Props| {
				if props.get_bool("effect_first").unwrap_or(false) {
					let cleanups = cleanups.clone();
					cx.use_effect_with((), move || Some(move || cleanups.set(cleanups.get() + 1)))?;
				} else {
					cx.use_state(0)?;
				}
				Ok(Child::Null)
			}),
			Props::new().with("effect_first", effect_first),
		)
	};
	let mut root = root_with(RuntimeOptions::new().check_hook_order(false));
	root.render(app(cleanups.clone(), true)).unwrap();
	assert_eq!(cleanups.get(), 0);

	root.render(app(cleanups.clone(), false)).unwrap();
	assert_eq!(cleanups.get(), 1);

	root.unmount().unwrap();
	assert_eq!(cleanups.get(), 1);
}

#[rstest]
fn test_state_setter_rerenders_from_event() {
	fn toggle(cx: &Scope, _: &Props) -> RenderResult<Child> {
		let on = cx.use_state(false)?;
		let flip = on.clone();
		Ok(VNode::element("button")
			.attr("aria-pressed", if on.get() { "true" } else { "false" })
			.on("click", move |_: &Event| flip.update(|v| *v = !*v))
			.into())
	}
	let mut root = root();
	root.render(VNode::component(Component::new("Toggle", toggle), Props::new()))
		.unwrap();
	let button = root.doc().children(root.container())[0];

	let invoked = root.dispatch(&Event::new("click", button)).unwrap();

	assert_eq!(invoked, 1);
	assert_eq!(root.inner_html(), "<button aria-pressed=\"true\"></button>");
	assert_eq!(root.doc().children(root.container()), &[button]);
}

#[rstest]
fn test_state_is_per_instance() {
	fn counter(cx: &Scope, props: &Props) -> RenderResult<Child> {
		let count = cx.use_state(props.get_int("start").unwrap_or_default())?;
		let bump = count.clone();
		Ok(VNode::element("b")
			.on("click", move |_: &Event| bump.update(|n| *n += 1))
			.child(count.get())
			.into())
	}
	let pair = || {
		VNode::fragment(vec![
			VNode::component(Component::new("Counter", counter), Props::new().with("start", 10)),
			VNode::component(Component::new("Counter", counter), Props::new().with("start", 20)),
		])
	};
	let mut root = root();
	root.render(pair()).unwrap();
	let second = root.doc().children(root.container())[1];

	root.dispatch(&Event::new("click", second)).unwrap();

	assert_eq!(root.inner_html(), "<b>10</b><b>21</b>");
}

#[rstest]
fn test_runaway_updates_fail() {
	fn restless(cx: &Scope, _: &Props) -> RenderResult<Child> {
		let ticks = cx.use_state(0)?;
		cx.use_effect(move || ticks.update(|n| *n += 1))?;
		Ok(Child::Null)
	}
	let mut root = root_with(RuntimeOptions::new().max_update_depth(5));

	let err = root
		.render(VNode::component(Component::new("Restless", restless), Props::new()))
		.unwrap_err();

	assert!(matches!(err, RenderError::UpdateLoop(5)));
}

#[rstest]
fn test_effect_state_update_settles() {
	fn loader(cx: &Scope, _: &Props) -> RenderResult<Child> {
		let data = cx.use_state(None::<String>)?;
		let setter = data.clone();
		cx.use_effect_with((), move || setter.set(Some("loaded".to_string())))?;
		Ok(Child::from(data.get().unwrap_or_else(|| "loading".to_string())))
	}
	let mut root = root();

	root.render(VNode::component(Component::new("Loader", loader), Props::new()))
		.unwrap();

	assert_eq!(root.inner_html(), "loaded");
}
