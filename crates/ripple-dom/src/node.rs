//! Node identifiers, node payloads and DOM events.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Identifier of a node inside a [`Document`](crate::Document).
///
/// Ids are never reused within a document, so a stale id fails with
/// [`DomError::UnknownNode`](crate::DomError::UnknownNode) instead of
/// silently pointing at a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
	/// Returns the raw arena index.
	pub fn index(self) -> usize {
		self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// An event delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	/// Event name (e.g. `click`).
	pub name: String,
	/// The node the event was dispatched on.
	pub target: NodeId,
	/// Optional payload, e.g. the new value of an input.
	pub value: Option<String>,
}

impl Event {
	/// Creates an event without payload.
	pub fn new(name: impl Into<String>, target: NodeId) -> Self {
		Self {
			name: name.into(),
			target,
			value: None,
		}
	}

	/// Attaches a payload.
	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = Some(value.into());
		self
	}
}

/// A listener registered on an element.
pub type Listener = Rc<dyn Fn(&Event)>;

/// The kind-specific payload of a node.
pub(crate) enum NodeData {
	Element {
		tag: String,
		attrs: BTreeMap<String, String>,
		listeners: BTreeMap<String, Listener>,
	},
	Text(String),
	Comment(String),
}

impl fmt::Debug for NodeData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeData::Element {
				tag,
				attrs,
				listeners,
			} => f
				.debug_struct("Element")
				.field("tag", tag)
				.field("attrs", attrs)
				.field("listeners", &listeners.keys().collect::<Vec<_>>())
				.finish(),
			NodeData::Text(text) => f.debug_tuple("Text").field(text).finish(),
			NodeData::Comment(text) => f.debug_tuple("Comment").field(text).finish(),
		}
	}
}

/// Broad classification of a node, as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	/// An element with a tag name.
	Element,
	/// A text node.
	Text,
	/// A comment node.
	Comment,
}

#[derive(Debug)]
pub(crate) struct NodeEntry {
	pub(crate) data: NodeData,
	pub(crate) parent: Option<NodeId>,
	pub(crate) children: Vec<NodeId>,
}

impl NodeEntry {
	pub(crate) fn new(data: NodeData) -> Self {
		Self {
			data,
			parent: None,
			children: Vec::new(),
		}
	}

	pub(crate) fn kind(&self) -> NodeKind {
		match self.data {
			NodeData::Element { .. } => NodeKind::Element,
			NodeData::Text(_) => NodeKind::Text,
			NodeData::Comment(_) => NodeKind::Comment,
		}
	}
}
