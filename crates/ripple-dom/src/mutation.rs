//! Mutation log entries.
//!
//! Every structural or content change applied to a [`Document`](crate::Document)
//! is appended to its log. The reconciler's tests read the log to assert that a
//! diff touched exactly the nodes it had to.

use crate::node::NodeId;

/// A single recorded change to the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
	/// An element was created.
	CreateElement {
		/// New node.
		node: NodeId,
		/// Tag name.
		tag: String,
	},
	/// A text node was created.
	CreateText {
		/// New node.
		node: NodeId,
	},
	/// A comment node was created.
	CreateComment {
		/// New node.
		node: NodeId,
	},
	/// An attribute was added or changed.
	SetAttribute {
		/// Target element.
		node: NodeId,
		/// Attribute name.
		name: String,
	},
	/// An attribute was removed.
	RemoveAttribute {
		/// Target element.
		node: NodeId,
		/// Attribute name.
		name: String,
	},
	/// Character data was replaced.
	SetText {
		/// Target text node.
		node: NodeId,
	},
	/// A listener was attached or swapped.
	SetListener {
		/// Target element.
		node: NodeId,
		/// Event name.
		event: String,
	},
	/// A listener was detached.
	RemoveListener {
		/// Target element.
		node: NodeId,
		/// Event name.
		event: String,
	},
	/// A node was inserted (or moved) under a parent.
	Insert {
		/// New parent.
		parent: NodeId,
		/// Inserted node.
		node: NodeId,
	},
	/// A node was detached from its parent.
	Remove {
		/// Former parent.
		parent: NodeId,
		/// Removed node.
		node: NodeId,
	},
}

impl Mutation {
	/// Returns `true` for node creations.
	pub fn is_create(&self) -> bool {
		matches!(
			self,
			Mutation::CreateElement { .. }
				| Mutation::CreateText { .. }
				| Mutation::CreateComment { .. }
		)
	}

	/// Returns `true` for tree-shape changes (insert or remove).
	pub fn is_structural(&self) -> bool {
		matches!(self, Mutation::Insert { .. } | Mutation::Remove { .. })
	}
}
