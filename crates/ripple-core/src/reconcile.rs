//! Diffing a new virtual tree against the mounted one.
//!
//! `patch` updates a single mounted node in place when the types agree and
//! replaces it otherwise. Lists of children are matched by key first and then
//! by position among unkeyed children. Patching never moves host nodes; a
//! placement pass per element level moves or inserts only the nodes whose
//! sibling position is wrong, so re-applying an identical tree leaves the
//! document untouched.

use std::collections::{HashMap, VecDeque};

use ripple_dom::NodeId;

use crate::error::RenderResult;
use crate::mounted::{Mounted, nodes_of, same_type};
use crate::render::Renderer;
use crate::vnode::{Child, Key, NodeType};

impl Renderer<'_> {
	/// Reconciles the children of a host element (or container) and places
	/// their nodes before `anchor`.
	pub(crate) fn reconcile_children(
		&mut self,
		parent: NodeId,
		old: Vec<Mounted>,
		new: &[Child],
		anchor: Option<NodeId>,
	) -> RenderResult<Vec<Mounted>> {
		let list = self.reconcile_list(old, new)?;
		match self.place(parent, &list, anchor) {
			Ok(()) => Ok(list),
			Err(error) => {
				self.discard_all(list);
				Err(error)
			}
		}
	}

	/// Matches `new` against `old` and patches, mounts or unmounts each
	/// child. Host nodes are not moved.
	///
	/// On error every old and new entry of the list has been unmounted, so
	/// the caller is left with nothing to clean up.
	pub(crate) fn reconcile_list(
		&mut self,
		old: Vec<Mounted>,
		new: &[Child],
	) -> RenderResult<Vec<Mounted>> {
		let mut slots: Vec<Option<Mounted>> = Vec::with_capacity(old.len());
		let mut keyed: HashMap<Key, usize> = HashMap::new();
		let mut unkeyed: VecDeque<usize> = VecDeque::new();
		for (index, mounted) in old.into_iter().enumerate() {
			match mounted.key() {
				Some(key) => {
					keyed.insert(key.clone(), index);
				}
				None => unkeyed.push_back(index),
			}
			slots.push(Some(mounted));
		}

		let mut result = Vec::with_capacity(new.len());
		for child in new {
			let matched = match child.key() {
				Some(key) => keyed.remove(key),
				None => unkeyed.pop_front(),
			}
			.and_then(|index| slots[index].take());

			let mounted = match matched {
				Some(old) => self.patch(old, child),
				None => self.mount(child),
			};
			match mounted {
				Ok(mounted) => result.push(mounted),
				Err(error) => {
					self.discard_all(result);
					self.discard_all(slots.into_iter().flatten());
					return Err(error);
				}
			}
		}

		let mut leftovers = slots.into_iter().flatten();
		while let Some(leftover) = leftovers.next() {
			if let Err(error) = self.unmount(leftover) {
				self.discard_all(leftovers);
				self.discard_all(result);
				return Err(error);
			}
		}
		Ok(result)
	}

	/// Updates `old` to render `new`, replacing it if the types differ.
	///
	/// Like [`reconcile_list`](Self::reconcile_list), a failed patch leaves
	/// neither `old` nor anything it created mounted.
	pub(crate) fn patch(&mut self, old: Mounted, new: &Child) -> RenderResult<Mounted> {
		if !same_type(&old, new) {
			tracing::debug!(key = ?new.key(), "replacing subtree");
			let replacement = match self.mount(new) {
				Ok(replacement) => replacement,
				Err(error) => {
					self.discard(old);
					return Err(error);
				}
			};
			let result = self.unmount(old);
			return self.keep_or_discard(replacement, result);
		}

		match (old, new) {
			(
				Mounted::Element {
					tag,
					props,
					node,
					children,
					..
				},
				Child::Node(vnode),
			) => {
				let children = match self.patch_props(node, &props, &vnode.props) {
					Ok(()) => self.reconcile_children(node, children, &vnode.children, None),
					Err(error) => {
						self.discard_all(children);
						Err(error)
					}
				};
				let (children, result) = match children {
					Ok(children) => (children, Ok(())),
					Err(error) => (Vec::new(), Err(error)),
				};
				let mounted = Mounted::Element {
					tag,
					props: vnode.props.clone(),
					node,
					children,
					key: vnode.key.clone(),
				};
				self.keep_or_discard(mounted, result)
			}
			(Mounted::Text { text, node }, new) => {
				let next = new.text().unwrap_or_default();
				if next != text.as_str() {
					let result = self.doc.set_text(node, next.as_ref()).map_err(Into::into);
					let mounted = Mounted::Text {
						text: next.into_owned(),
						node,
					};
					return self.keep_or_discard(mounted, result);
				}
				Ok(Mounted::Text { text, node })
			}
			(Mounted::Fragment { children, .. }, Child::List(items)) => Ok(Mounted::Fragment {
				children: self.reconcile_list(children, items)?,
				key: None,
			}),
			(Mounted::Fragment { children, .. }, Child::Node(vnode)) => Ok(Mounted::Fragment {
				children: self.reconcile_list(children, &vnode.children)?,
				key: vnode.key.clone(),
			}),
			(
				Mounted::Component {
					component,
					instance,
					child,
					..
				},
				Child::Node(vnode),
			) => {
				let rendered = match self
					.runtime
					.render_instance(&instance, &vnode.component_props())
				{
					Ok(rendered) => rendered,
					Err(error) => {
						self.discard(Mounted::Component {
							component,
							instance,
							child,
							key: None,
						});
						return Err(error);
					}
				};
				let child = match self.patch(*child, &rendered) {
					Ok(child) => child,
					Err(error) => {
						self.discard(Mounted::Component {
							component,
							instance,
							child: Box::new(Mounted::Empty),
							key: None,
						});
						return Err(error);
					}
				};
				instance.borrow_mut().dom = child.first_node();
				let component = match &vnode.ty {
					NodeType::Component(next) => next.clone(),
					_ => component,
				};
				Ok(Mounted::Component {
					component,
					instance,
					child: Box::new(child),
					key: vnode.key.clone(),
				})
			}
			(old, _) => Ok(old),
		}
	}

	/// Moves the top-level nodes of `list` under `parent` so that they sit,
	/// in order, right before `anchor`. Nodes already in place are left
	/// alone.
	pub(crate) fn place(
		&mut self,
		parent: NodeId,
		list: &[Mounted],
		anchor: Option<NodeId>,
	) -> RenderResult<()> {
		let mut next = anchor;
		for node in nodes_of(list).into_iter().rev() {
			if self.doc.parent(node) != Some(parent) || self.doc.next_sibling(node) != next {
				self.doc.insert_before(parent, node, next)?;
			}
			next = Some(node);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ripple_dom::{Document, Mutation};
	use rstest::rstest;

	use crate::runtime::Runtime;
	use crate::vnode::VNode;

	fn list(keys: &[&'static str]) -> Child {
		VNode::element("ul")
			.children(
				keys.iter()
					.map(|k| VNode::element("li").key(*k).child(*k)),
			)
			.into()
	}

	fn commit(doc: &mut Document, runtime: &Runtime, old: Vec<Mounted>, new: &Child) -> Vec<Mounted> {
		let body = doc.body();
		Renderer::new(doc, runtime)
			.reconcile_children(body, old, std::slice::from_ref(new), None)
			.unwrap()
	}

	#[rstest]
	fn test_identical_tree_records_no_mutations() {
		let mut doc = Document::new();
		let runtime = Runtime::default();
		let tree = list(&["a", "b", "c"]);
		let mounted = commit(&mut doc, &runtime, Vec::new(), &tree);
		doc.clear_mutations();

		commit(&mut doc, &runtime, mounted, &tree);

		assert!(doc.mutations().is_empty(), "{:?}", doc.mutations());
	}

	#[rstest]
	fn test_keyed_reorder_moves_without_recreating() {
		let mut doc = Document::new();
		let runtime = Runtime::default();
		let mounted = commit(&mut doc, &runtime, Vec::new(), &list(&["a", "b", "c"]));
		let ul = doc.children(doc.body())[0];
		let before = doc.children(ul).to_vec();
		doc.clear_mutations();

		commit(&mut doc, &runtime, mounted, &list(&["c", "a", "b"]));

		let after = doc.children(ul).to_vec();
		assert_eq!(after, vec![before[2], before[0], before[1]]);
		assert!(doc.mutations().iter().all(|m| !m.is_create()));
		assert_eq!(doc.text_content(ul), "cab");
	}

	#[rstest]
	fn test_type_change_replaces() {
		let mut doc = Document::new();
		let runtime = Runtime::default();
		let mounted = commit(&mut doc, &runtime, Vec::new(), &VNode::element("p").child("x").into());
		let old = doc.children(doc.body())[0];

		commit(&mut doc, &runtime, mounted, &VNode::element("div").child("x").into());

		let new = doc.children(doc.body())[0];
		assert_ne!(old, new);
		assert!(!doc.contains(old));
		assert_eq!(doc.tag(new), Some("div"));
	}

	#[rstest]
	fn test_text_update_sets_text_only() {
		let mut doc = Document::new();
		let runtime = Runtime::default();
		let mounted = commit(&mut doc, &runtime, Vec::new(), &VNode::element("p").child("one").into());
		doc.clear_mutations();

		commit(&mut doc, &runtime, mounted, &VNode::element("p").child("two").into());

		assert!(matches!(doc.mutations(), [Mutation::SetText { .. }]));
		assert_eq!(doc.text_content(doc.body()), "two");
	}
}
