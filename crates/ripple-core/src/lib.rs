//! Ripple Core - virtual DOM, hooks and reconciliation
//!
//! This crate implements the component model of Ripple:
//!
//! - **VNode model**: [`VNode`], [`Child`] and [`Props`], built with
//!   [`create_element`], the builder methods or the [`jsx`] functions
//! - **Hooks**: state, effects, memos, refs and mount callbacks, called on the
//!   [`Scope`] a component receives
//! - **Runtime**: the per-root component stack and effect queue
//! - **Reconciler**: diffs a new tree against the mounted one and applies the
//!   minimal set of changes to a [`ripple_dom::Document`]
//! - **Roots**: [`Root`] ties a tree, a container and a runtime together
//!
//! ## Architecture
//!
//! ```text
//! Root::render(app)
//!   └─ reconcile (patch / mount / unmount, keyed then positional)
//!        └─ component render: stack push → fn(&Scope, &Props) → stack pop
//!   └─ placement pass (moves only misplaced host nodes)
//!   └─ flush: run effects → re-render while state is dirty
//! ```
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use ripple_core::{Child, Component, Props, RenderResult, Root, Scope, VNode};
//! use ripple_dom::{Document, Event};
//!
//! fn counter(cx: &Scope, _: &Props) -> RenderResult<Child> {
//! 	let count = cx.use_state(0)?;
//! 	let increment = count.clone();
//! 	Ok(VNode::element("button")
//! 		.attr("id", "inc")
//! 		.on("click", move |_: &Event| increment.update(|n| *n += 1))
//! 		.child(count.get())
//! 		.into())
//! }
//!
//! let document = Rc::new(RefCell::new(Document::new()));
//! let body = document.borrow().body();
//! let mut root = Root::new(document.clone(), body).unwrap();
//! root.render(VNode::component(Component::new("Counter", counter), Props::new()))
//! 	.unwrap();
//!
//! let button = document.borrow().get_element_by_id("inc").unwrap();
//! root.dispatch(&Event::new("click", button)).unwrap();
//! assert_eq!(root.inner_html(), "<button id=\"inc\">1</button>");
//! ```

#![warn(missing_docs)]

pub mod effects;
pub mod error;
pub mod hooks;
pub mod instance;
pub mod jsx;
pub mod logging;
pub mod options;
pub mod refs;
pub mod root;
pub mod runtime;
pub mod stack;
pub mod vnode;

mod hydrate;
mod mounted;
mod reconcile;
mod render;

pub use effects::{Cleanup, EffectOutput, EffectQueue, FlushReport, cleanup_effects};
pub use error::{EffectError, HookError, HookKind, RenderError, RenderResult};
pub use hooks::{Scope, State, deps_changed};
pub use instance::{ComponentInstance, InstanceId, InstanceRef};
pub use jsx::{FRAGMENT, jsx, jsx_dev, jsxs};
pub use options::{OptionsError, RuntimeOptions};
pub use refs::{NodeRef, Ref};
pub use root::Root;
pub use runtime::{Runtime, UpdateHandle};
pub use stack::ComponentStack;
pub use vnode::{
	Child, Component, EventHandler, Key, NodeType, PropValue, Props, RenderFn, VNode,
	create_element,
};
