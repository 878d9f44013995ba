//! Host document error types.

use thiserror::Error;

use crate::node::NodeId;

/// Result type for host document operations.
pub type DomResult<T> = Result<T, DomError>;

/// Errors raised by [`Document`](crate::Document) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DomError {
	/// The node id does not refer to a live node.
	#[error("unknown node: {0}")]
	UnknownNode(NodeId),

	/// The operation requires an element node.
	#[error("node {0} is not an element")]
	NotAnElement(NodeId),

	/// The operation requires a text or comment node.
	#[error("node {0} is not a character data node")]
	NotCharacterData(NodeId),

	/// The reference node is not a child of the given parent.
	#[error("node {child} is not a child of {parent}")]
	NotAChild {
		/// Expected parent.
		parent: NodeId,
		/// Offending child.
		child: NodeId,
	},

	/// Inserting the node would create a cycle.
	#[error("cannot insert {node} into its own subtree")]
	HierarchyRequest {
		/// Node being inserted.
		node: NodeId,
	},

	/// Markup could not be parsed.
	#[error("parse error at byte {position}: {message}")]
	Parse {
		/// Byte offset into the input.
		position: usize,
		/// What went wrong.
		message: String,
	},
}
