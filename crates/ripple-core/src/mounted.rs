//! The reconciler's record of what is on screen.
//!
//! A [`Mounted`] tree mirrors the last rendered [`Child`] tree and remembers
//! the host nodes and component instances it produced.

use std::borrow::Cow;

use ripple_dom::NodeId;

use crate::instance::InstanceRef;
use crate::vnode::{Child, Component, Key, NodeType, Props};

#[derive(Debug)]
pub(crate) enum Mounted {
	Element {
		tag: Cow<'static, str>,
		props: Props,
		node: NodeId,
		children: Vec<Mounted>,
		key: Option<Key>,
	},
	Text {
		text: String,
		node: NodeId,
	},
	/// Also used for lists that survive flattening.
	Fragment {
		children: Vec<Mounted>,
		key: Option<Key>,
	},
	Component {
		component: Component,
		instance: InstanceRef,
		child: Box<Mounted>,
		key: Option<Key>,
	},
	/// `Null` and booleans.
	Empty,
}

impl Mounted {
	pub(crate) fn key(&self) -> Option<&Key> {
		match self {
			Mounted::Element { key, .. }
			| Mounted::Fragment { key, .. }
			| Mounted::Component { key, .. } => key.as_ref(),
			Mounted::Text { .. } | Mounted::Empty => None,
		}
	}

	/// Appends the top-level host nodes, in document order.
	pub(crate) fn collect_nodes(&self, out: &mut Vec<NodeId>) {
		match self {
			Mounted::Element { node, .. } | Mounted::Text { node, .. } => out.push(*node),
			Mounted::Fragment { children, .. } => {
				for child in children {
					child.collect_nodes(out);
				}
			}
			Mounted::Component { child, .. } => child.collect_nodes(out),
			Mounted::Empty => {}
		}
	}

	pub(crate) fn first_node(&self) -> Option<NodeId> {
		match self {
			Mounted::Element { node, .. } | Mounted::Text { node, .. } => Some(*node),
			Mounted::Fragment { children, .. } => children.iter().find_map(Mounted::first_node),
			Mounted::Component { child, .. } => child.first_node(),
			Mounted::Empty => None,
		}
	}
}

pub(crate) fn nodes_of(list: &[Mounted]) -> Vec<NodeId> {
	let mut out = Vec::new();
	for mounted in list {
		mounted.collect_nodes(&mut out);
	}
	out
}

/// Returns `true` when `new` can be patched into `old` instead of replacing it.
pub(crate) fn same_type(old: &Mounted, new: &Child) -> bool {
	match (old, new) {
		(Mounted::Element { tag, .. }, Child::Node(node)) => {
			matches!(&node.ty, NodeType::Tag(t) if t == tag)
		}
		(Mounted::Text { .. }, Child::Text(_) | Child::Int(_) | Child::Float(_)) => true,
		(Mounted::Fragment { .. }, Child::List(_)) => true,
		(Mounted::Fragment { .. }, Child::Node(node)) => node.ty == NodeType::Fragment,
		(Mounted::Component { component, .. }, Child::Node(node)) => {
			matches!(&node.ty, NodeType::Component(c) if c == component)
		}
		(Mounted::Empty, Child::Null | Child::Bool(_)) => true,
		_ => false,
	}
}
