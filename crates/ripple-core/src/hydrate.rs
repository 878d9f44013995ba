//! Adopting server-rendered markup.
//!
//! Hydration walks the existing children of a host element alongside a
//! virtual tree. Matching nodes are adopted as they are (attributes are
//! corrected, listeners and refs attached); nodes that do not match are
//! replaced and reported with a warning. Empty comments are text separators
//! written by the server renderer and are removed.

use ripple_dom::{NodeId, NodeKind};

use crate::error::RenderResult;
use crate::mounted::Mounted;
use crate::render::Renderer;
use crate::vnode::{Child, NodeType, PropValue, Props, VNode};

/// Position within the existing children of one host element.
struct Cursor {
	nodes: Vec<NodeId>,
	pos: usize,
}

impl Renderer<'_> {
	/// Hydrates the existing children of `parent` against `children`.
	pub(crate) fn hydrate_children(
		&mut self,
		parent: NodeId,
		children: &[Child],
	) -> RenderResult<Vec<Mounted>> {
		let mut cursor = Cursor {
			nodes: self.doc.children(parent).to_vec(),
			pos: 0,
		};
		let mut list = Vec::with_capacity(children.len());
		for child in children {
			list.push(self.hydrate(&mut cursor, child)?);
		}

		for &leftover in &cursor.nodes[cursor.pos..] {
			if self.is_separator(leftover) {
				self.doc.release(leftover)?;
				continue;
			}
			tracing::warn!(node = %leftover, "hydration: removing unexpected server node");
			self.doc.release(leftover)?;
		}

		self.place(parent, &list, None)?;
		Ok(list)
	}

	fn hydrate(&mut self, cursor: &mut Cursor, child: &Child) -> RenderResult<Mounted> {
		match child {
			Child::Null | Child::Bool(_) => Ok(Mounted::Empty),
			Child::List(items) => {
				let children = items
					.iter()
					.map(|item| self.hydrate(cursor, item))
					.collect::<RenderResult<_>>()?;
				Ok(Mounted::Fragment {
					children,
					key: None,
				})
			}
			Child::Text(_) | Child::Int(_) | Child::Float(_) => {
				let text = child.text().unwrap_or_default().into_owned();
				// The server writes nothing for empty text.
				if text.is_empty() {
					return self.mount(child);
				}
				match self.next_existing(cursor)? {
					Some(node) if self.doc.kind(node)? == NodeKind::Text => {
						if self.doc.text(node) != Some(text.as_str()) {
							tracing::warn!(%node, expected = %text, "hydration: text content differs");
							self.doc.set_text(node, text.clone())?;
						}
						cursor.pos += 1;
						Ok(Mounted::Text { text, node })
					}
					existing => self.replace_existing(cursor, existing, child),
				}
			}
			Child::Node(vnode) => match &vnode.ty {
				NodeType::Tag(tag) => match self.next_existing(cursor)? {
					Some(node) if self.doc.tag(node) == Some(tag.as_ref()) => {
						cursor.pos += 1;
						self.adopt_element(node, vnode)
					}
					existing => self.replace_existing(cursor, existing, child),
				},
				NodeType::Fragment => {
					let children = vnode
						.children
						.iter()
						.map(|item| self.hydrate(cursor, item))
						.collect::<RenderResult<_>>()?;
					Ok(Mounted::Fragment {
						children,
						key: vnode.key.clone(),
					})
				}
				NodeType::Component(component) => {
					let instance = self.runtime.new_instance(component.clone());
					let rendered = self
						.runtime
						.render_instance(&instance, &vnode.component_props())?;
					let child = self.hydrate(cursor, &rendered)?;
					instance.borrow_mut().dom = child.first_node();
					Ok(Mounted::Component {
						component: component.clone(),
						instance,
						child: Box::new(child),
						key: vnode.key.clone(),
					})
				}
			},
		}
	}

	fn adopt_element(&mut self, node: NodeId, vnode: &VNode) -> RenderResult<Mounted> {
		let stale: Vec<String> = self
			.doc
			.attributes(node)
			.into_iter()
			.filter(|(name, _)| {
				vnode
					.props
					.get(name)
					.and_then(PropValue::as_attribute)
					.is_none()
			})
			.map(|(name, _)| name.to_string())
			.collect();
		for name in stale {
			tracing::warn!(%node, attribute = %name, "hydration: removing stale attribute");
			self.doc.remove_attribute(node, &name)?;
		}
		self.patch_props(node, &Props::new(), &vnode.props)?;

		let children = self.hydrate_children(node, &vnode.children)?;
		Ok(Mounted::Element {
			tag: match &vnode.ty {
				NodeType::Tag(tag) => tag.clone(),
				_ => Default::default(),
			},
			props: vnode.props.clone(),
			node,
			children,
			key: vnode.key.clone(),
		})
	}

	/// Mounts `child` fresh, consuming the mismatched node at the cursor.
	fn replace_existing(
		&mut self,
		cursor: &mut Cursor,
		existing: Option<NodeId>,
		child: &Child,
	) -> RenderResult<Mounted> {
		if let Some(node) = existing {
			tracing::warn!(
				%node,
				expected = %describe(child),
				found = ?self.doc.tag(node).unwrap_or("#text"),
				"hydration mismatch: replacing server node"
			);
			cursor.pos += 1;
			self.doc.release(node)?;
		}
		self.mount(child)
	}

	/// Returns the next existing node, dropping text separators on the way.
	fn next_existing(&mut self, cursor: &mut Cursor) -> RenderResult<Option<NodeId>> {
		while let Some(&node) = cursor.nodes.get(cursor.pos) {
			if !self.is_separator(node) {
				return Ok(Some(node));
			}
			self.doc.release(node)?;
			cursor.pos += 1;
		}
		Ok(None)
	}

	fn is_separator(&self, node: NodeId) -> bool {
		matches!(self.doc.kind(node), Ok(NodeKind::Comment)) && self.doc.text(node) == Some("")
	}
}

fn describe(child: &Child) -> String {
	match child {
		Child::Node(VNode {
			ty: NodeType::Tag(tag),
			..
		}) => tag.to_string(),
		Child::Node(_) => "#fragment".to_string(),
		_ => "#text".to_string(),
	}
}
