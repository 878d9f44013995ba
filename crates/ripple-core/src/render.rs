//! Initial mount and teardown.

use ripple_dom::{Document, NodeId};

use crate::effects::cleanup_effects;
use crate::error::RenderResult;
use crate::mounted::{Mounted, nodes_of};
use crate::runtime::Runtime;
use crate::vnode::{Child, NodeType, PropValue, Props, VNode};

/// Applies virtual trees to a host document.
pub(crate) struct Renderer<'a> {
	pub(crate) doc: &'a mut Document,
	pub(crate) runtime: &'a Runtime,
}

impl<'a> Renderer<'a> {
	pub(crate) fn new(doc: &'a mut Document, runtime: &'a Runtime) -> Self {
		Self { doc, runtime }
	}

	/// Creates host nodes for `child`. Top-level nodes are left detached;
	/// the caller places them.
	pub(crate) fn mount(&mut self, child: &Child) -> RenderResult<Mounted> {
		match child {
			Child::Node(vnode) => self.mount_node(vnode),
			Child::Text(_) | Child::Int(_) | Child::Float(_) => {
				let text = child.text().unwrap_or_default().into_owned();
				let node = self.doc.create_text(text.clone());
				Ok(Mounted::Text { text, node })
			}
			Child::Null | Child::Bool(_) => Ok(Mounted::Empty),
			Child::List(items) => Ok(Mounted::Fragment {
				children: self.mount_all(items)?,
				key: None,
			}),
		}
	}

	fn mount_all(&mut self, items: &[Child]) -> RenderResult<Vec<Mounted>> {
		let mut mounted = Vec::with_capacity(items.len());
		for item in items {
			match self.mount(item) {
				Ok(child) => mounted.push(child),
				Err(error) => {
					self.discard_all(mounted);
					return Err(error);
				}
			}
		}
		Ok(mounted)
	}

	fn mount_node(&mut self, vnode: &VNode) -> RenderResult<Mounted> {
		match &vnode.ty {
			NodeType::Tag(tag) => {
				let node = self.doc.create_element(tag.as_ref());
				let mut children = Vec::new();
				let result = self.fill_element(node, vnode, &mut children);
				let mounted = Mounted::Element {
					tag: tag.clone(),
					props: vnode.props.clone(),
					node,
					children,
					key: vnode.key.clone(),
				};
				self.keep_or_discard(mounted, result)
			}
			NodeType::Fragment => Ok(Mounted::Fragment {
				children: self.mount_all(&vnode.children)?,
				key: vnode.key.clone(),
			}),
			NodeType::Component(component) => {
				let instance = self.runtime.new_instance(component.clone());
				let rendered = self
					.runtime
					.render_instance(&instance, &vnode.component_props())?;
				let child = self.mount(&rendered)?;
				instance.borrow_mut().dom = child.first_node();
				tracing::debug!(
					component = component.name(),
					id = %instance.borrow().id(),
					"component mounted"
				);
				Ok(Mounted::Component {
					component: component.clone(),
					instance,
					child: Box::new(child),
					key: vnode.key.clone(),
				})
			}
		}
	}

	fn fill_element(
		&mut self,
		node: NodeId,
		vnode: &VNode,
		children: &mut Vec<Mounted>,
	) -> RenderResult<()> {
		self.patch_props(node, &Props::new(), &vnode.props)?;
		*children = self.mount_all(&vnode.children)?;
		for child in nodes_of(children.as_slice()) {
			self.doc.append_child(node, child)?;
		}
		Ok(())
	}

	/// Tears down `mounted`: effect cleanups run (parents before children),
	/// node refs are cleared and the top-level host nodes are released.
	pub(crate) fn unmount(&mut self, mounted: Mounted) -> RenderResult<()> {
		teardown(&mounted);
		for node in nodes_of(std::slice::from_ref(&mounted)) {
			self.doc.release(node)?;
		}
		Ok(())
	}

	/// Unmounts a subtree on an error path. Failures to release nodes are
	/// logged, since the original error is the one reported.
	pub(crate) fn discard(&mut self, mounted: Mounted) {
		if let Err(error) = self.unmount(mounted) {
			tracing::warn!(%error, "failed to release an abandoned subtree");
		}
	}

	pub(crate) fn discard_all(&mut self, list: impl IntoIterator<Item = Mounted>) {
		for mounted in list {
			self.discard(mounted);
		}
	}

	/// Returns `mounted` if `result` is `Ok`, otherwise unmounts it and
	/// passes the error on.
	pub(crate) fn keep_or_discard(
		&mut self,
		mounted: Mounted,
		result: RenderResult<()>,
	) -> RenderResult<Mounted> {
		match result {
			Ok(()) => Ok(mounted),
			Err(error) => {
				self.discard(mounted);
				Err(error)
			}
		}
	}

	/// Brings the props of `node` from `old` to `new`.
	pub(crate) fn patch_props(&mut self, node: NodeId, old: &Props, new: &Props) -> RenderResult<()> {
		for (name, value) in old.iter() {
			if !new.contains(name) {
				self.clear_prop(node, name, value)?;
			}
		}
		for (name, value) in new.iter() {
			let previous = old.get(name);
			if previous == Some(value) {
				continue;
			}
			match previous {
				Some(previous) if category(previous) != category(value) => {
					self.clear_prop(node, name, previous)?;
				}
				_ => {}
			}
			match value {
				PropValue::Handler(handler) => {
					self.doc
						.set_listener(node, event_name(name), handler.listener())?;
				}
				PropValue::Ref(node_ref) => {
					if let Some(PropValue::Ref(previous)) = previous {
						previous.set(None);
					}
					node_ref.set(Some(node));
				}
				PropValue::Children(_) => {}
				attr => match attr.as_attribute() {
					Some(text) => self.doc.set_attribute(node, name, text.into_owned())?,
					None => self.doc.remove_attribute(node, name)?,
				},
			}
		}
		Ok(())
	}

	fn clear_prop(&mut self, node: NodeId, name: &str, value: &PropValue) -> RenderResult<()> {
		match value {
			PropValue::Handler(_) => self.doc.remove_listener(node, &event_name(name))?,
			PropValue::Ref(node_ref) => node_ref.set(None),
			PropValue::Children(_) => {}
			_ => self.doc.remove_attribute(node, name)?,
		}
		Ok(())
	}
}

#[derive(PartialEq)]
enum PropCategory {
	Attribute,
	Listener,
	Ref,
	Ignored,
}

fn category(value: &PropValue) -> PropCategory {
	match value {
		PropValue::Handler(_) => PropCategory::Listener,
		PropValue::Ref(_) => PropCategory::Ref,
		PropValue::Children(_) => PropCategory::Ignored,
		_ => PropCategory::Attribute,
	}
}

/// `onClick`, `on:click` and `onclick` all listen for `click`.
pub(crate) fn event_name(prop: &str) -> String {
	let name = prop.strip_prefix("on").unwrap_or(prop);
	let name = name.strip_prefix(':').unwrap_or(name);
	name.to_ascii_lowercase()
}

/// Runs effect cleanups and clears refs, without touching the document.
fn teardown(mounted: &Mounted) {
	match mounted {
		Mounted::Component {
			component,
			instance,
			child,
			..
		} => {
			tracing::debug!(component = component.name(), "component unmounted");
			cleanup_effects(instance);
			teardown(child);
		}
		Mounted::Element {
			props, children, ..
		} => {
			for (_, value) in props.iter() {
				if let PropValue::Ref(node_ref) = value {
					node_ref.set(None);
				}
			}
			children.iter().for_each(teardown);
		}
		Mounted::Fragment { children, .. } => children.iter().for_each(teardown),
		Mounted::Text { .. } | Mounted::Empty => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("onclick", "click")]
	#[case("onClick", "click")]
	#[case("on:input", "input")]
	#[case("onMouseEnter", "mouseenter")]
	fn test_event_name(#[case] prop: &str, #[case] expected: &str) {
		assert_eq!(event_name(prop), expected);
	}

	#[rstest]
	fn test_mount_element_tree() {
		let mut doc = Document::new();
		let runtime = Runtime::default();
		let tree: Child = VNode::element("ul")
			.attr("class", "list")
			.attr("hidden", false)
			.children(vec!["a", "b"])
			.into();

		let mounted = Renderer::new(&mut doc, &runtime).mount(&tree).unwrap();
		let Mounted::Element { node, children, .. } = &mounted else {
			panic!("expected element");
		};

		assert_eq!(children.len(), 2);
		assert_eq!(doc.parent(*node), None);
		assert_eq!(doc.attribute(*node, "class"), Some("list"));
		assert_eq!(doc.attribute(*node, "hidden"), None);
		assert_eq!(doc.text_content(*node), "ab");
	}

	#[rstest]
	fn test_null_and_bool_render_nothing() {
		let mut doc = Document::new();
		let runtime = Runtime::default();
		let mut renderer = Renderer::new(&mut doc, &runtime);
		for child in [Child::Null, Child::Bool(true), Child::Bool(false)] {
			assert!(matches!(renderer.mount(&child).unwrap(), Mounted::Empty));
		}
	}
}
