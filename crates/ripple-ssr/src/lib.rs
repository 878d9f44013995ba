//! Ripple SSR - server rendering and hydration
//!
//! The server side renders a tree to a string with [`SsrRenderer`], wrapping
//! it in a container element and a JSON state script carrying captured
//! server signals. The client side parses that markup into its host document,
//! restores signal values through a [`HydrationContext`] and calls
//! [`hydrate`], which adopts the existing nodes and returns a live root.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use ripple_core::VNode;
//! use ripple_dom::{Document, parse_fragment};
//! use ripple_ssr::{SsrRenderer, hydrate};
//!
//! let app = || VNode::element("p").child("Hello, ").child("world");
//!
//! let html = SsrRenderer::new().render_page(app()).unwrap();
//! assert_eq!(html, r#"<div id="app" data-ripple-root><p>Hello, <!---->world</p></div>"#);
//!
//! let document = Rc::new(RefCell::new(Document::new()));
//! {
//!     let mut doc = document.borrow_mut();
//!     let body = doc.body();
//!     parse_fragment(&mut doc, body, &html).unwrap();
//! }
//! let hydrated = hydrate(document, "app", app()).unwrap();
//! assert_eq!(hydrated.root.inner_html(), "<p>Hello, world</p>");
//! ```

#![warn(missing_docs)]

pub mod hydration;
pub mod renderer;
pub mod state;

pub use hydration::{HydrationContext, HydrationError, Hydrated, hydrate, hydrate_with_options};
pub use renderer::{SsrOptions, SsrRenderer};
pub use state::{STATE_SCRIPT_ID, SsrState};
