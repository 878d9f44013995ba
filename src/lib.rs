//! # Ripple
//!
//! A small React-like UI framework: components are plain closures returning
//! virtual nodes, state lives in hooks, and a keyed reconciler applies the
//! difference between renders to a host document.
//!
//! ## Crates
//!
//! - [`dom`]: the in-memory host document the reconciler mutates
//! - [`core`]: virtual nodes, the hook runtime, effects and the reconciler
//! - [`signals`]: standalone signals and server-signal capture
//! - [`ssr`]: server rendering and hydration (feature `ssr`)
//!
//! ## Feature Flags
//!
//! - `ssr` (default) - server rendering and hydration
//! - `debug-hooks` - per-hook `tracing` events in debug builds
//! - `full` - everything
//!
//! ## Example
//!
//! ```
//! use ripple::prelude::*;
//!
//! fn counter() -> VNode {
//!     VNode::component(
//!         Component::new("Counter", |cx: &Scope, _: &Props| {
//!             let count = cx.use_state(0i64)?;
//!             let on_click = count.clone();
//!             Ok(VNode::element("button")
//!                 .on("click", move |_| on_click.update(|n| *n += 1))
//!                 .child(count.get())
//!                 .into())
//!         }),
//!         Props::new(),
//!     )
//! }
//!
//! let document = std::rc::Rc::new(std::cell::RefCell::new(Document::new()));
//! let body = document.borrow().body();
//! let mut root = Root::new(document.clone(), body).unwrap();
//! root.render(counter()).unwrap();
//!
//! let button = document.borrow().children(body)[0];
//! root.dispatch(&Event::new("click", button)).unwrap();
//! assert_eq!(root.inner_html(), "<button>1</button>");
//! ```

#![warn(missing_docs)]

pub mod reactive;
#[cfg(feature = "ssr")]
pub mod ssr;

pub use ripple_core as core;
pub use ripple_dom as dom;
pub use ripple_signals as signals;

pub use reactive::bind_signal;

/// Common imports for applications.
pub mod prelude {
	pub use ripple_core::{
		Child, Component, EffectError, FRAGMENT, Key, NodeRef, Props, RenderError, RenderResult,
		Root, RuntimeOptions, Scope, State, VNode, jsx, jsxs,
	};
	pub use ripple_dom::{Document, Event, NodeId};
	pub use ripple_signals::{ReadSignal, WriteSignal, create_server_signal, create_signal};

	pub use crate::reactive::bind_signal;
	#[cfg(feature = "ssr")]
	pub use ripple_ssr::{HydrationContext, SsrRenderer, hydrate};
}
