//! The JSX runtime contract.
//!
//! A JSX compiler lowers `<Tag {...props}>{children}</Tag>` into calls of
//! [`jsx`] (single child) or [`jsxs`] (static child list), passing children
//! inside the props under `children` and the key separately. [`jsx_dev`] is
//! the development-mode entry point with the same behaviour.

use crate::vnode::{Child, Key, NodeType, PropValue, Props, VNode, create_element};

/// The fragment marker, `<>...</>`.
pub const FRAGMENT: NodeType = NodeType::Fragment;

/// Builds a node with a single (or no) child.
pub fn jsx(ty: impl Into<NodeType>, props: Props, key: Option<Key>) -> VNode {
	build(ty.into(), props, key)
}

/// Builds a node whose `children` prop is a static list.
pub fn jsxs(ty: impl Into<NodeType>, props: Props, key: Option<Key>) -> VNode {
	build(ty.into(), props, key)
}

/// Development-mode variant of [`jsx`].
pub fn jsx_dev(ty: impl Into<NodeType>, props: Props, key: Option<Key>) -> VNode {
	build(ty.into(), props, key)
}

fn build(ty: NodeType, mut props: Props, key: Option<Key>) -> VNode {
	let children = match props.remove("children") {
		Some(PropValue::Children(children)) => children,
		Some(other) => {
			props.insert("children", other);
			Vec::new()
		}
		None => Vec::new(),
	};
	let mut node = create_element(ty, props, children.into_iter().map(Child::from));
	if key.is_some() {
		node.key = key;
	}
	node
}
