//! Ripple DOM - in-memory host document
//!
//! The reconciler in `ripple-core` mutates a live DOM. Outside a browser that
//! DOM is this crate's [`Document`]: an arena of element, text and comment
//! nodes with the operations a browser exposes (create, insert, move, remove,
//! attributes, character data, listeners) and a [`Mutation`] log recording
//! every change, which makes reconciliation minimality observable.
//!
//! ## Modules
//!
//! - [`document`]: the node arena and its operations
//! - [`html`]: escaping and serialization
//! - [`parse`]: a fragment parser for server-rendered markup
//!
//! ## Example
//!
//! ```
//! use ripple_dom::{Document, html::outer_html};
//!
//! let mut doc = Document::new();
//! let p = doc.create_element("p");
//! let text = doc.create_text("hello");
//! doc.append_child(p, text).unwrap();
//! doc.append_child(doc.body(), p).unwrap();
//!
//! assert_eq!(outer_html(&doc, p), "<p>hello</p>");
//! ```

#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod html;
pub mod mutation;
pub mod node;
pub mod parse;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use mutation::Mutation;
pub use node::{Event, Listener, NodeId, NodeKind};
pub use parse::parse_fragment;
