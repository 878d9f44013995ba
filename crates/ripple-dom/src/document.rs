//! The host document arena.

use std::collections::BTreeMap;

use crate::error::{DomError, DomResult};
use crate::mutation::Mutation;
use crate::node::{Event, Listener, NodeData, NodeEntry, NodeId, NodeKind};

/// An in-memory DOM tree.
///
/// Nodes live in an arena indexed by [`NodeId`]. A freshly created document
/// contains a single `body` element that acts as the root for id lookups and
/// serialization. Nodes created with the `create_*` methods start detached and
/// are attached with [`append_child`](Self::append_child) or
/// [`insert_before`](Self::insert_before).
#[derive(Debug)]
pub struct Document {
	nodes: Vec<Option<NodeEntry>>,
	body: NodeId,
	mutations: Vec<Mutation>,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Creates a document containing an empty `body`.
	pub fn new() -> Self {
		let mut doc = Self {
			nodes: Vec::new(),
			body: NodeId(0),
			mutations: Vec::new(),
		};
		doc.body = doc.alloc(NodeData::Element {
			tag: "body".to_string(),
			attrs: BTreeMap::new(),
			listeners: BTreeMap::new(),
		});
		doc
	}

	/// Returns the `body` element.
	pub fn body(&self) -> NodeId {
		self.body
	}

	fn alloc(&mut self, data: NodeData) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(Some(NodeEntry::new(data)));
		id
	}

	fn entry(&self, node: NodeId) -> DomResult<&NodeEntry> {
		self.nodes
			.get(node.0)
			.and_then(Option::as_ref)
			.ok_or(DomError::UnknownNode(node))
	}

	fn entry_mut(&mut self, node: NodeId) -> DomResult<&mut NodeEntry> {
		self.nodes
			.get_mut(node.0)
			.and_then(Option::as_mut)
			.ok_or(DomError::UnknownNode(node))
	}

	/// Returns `true` if the id refers to a live node.
	pub fn contains(&self, node: NodeId) -> bool {
		self.entry(node).is_ok()
	}

	// ---------------------------------------------------------------------
	// Creation
	// ---------------------------------------------------------------------

	/// Creates a detached element.
	pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
		let tag = tag.into();
		let node = self.alloc(NodeData::Element {
			tag: tag.clone(),
			attrs: BTreeMap::new(),
			listeners: BTreeMap::new(),
		});
		self.mutations.push(Mutation::CreateElement { node, tag });
		node
	}

	/// Creates a detached text node.
	pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
		let node = self.alloc(NodeData::Text(text.into()));
		self.mutations.push(Mutation::CreateText { node });
		node
	}

	/// Creates a detached comment node.
	pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
		let node = self.alloc(NodeData::Comment(text.into()));
		self.mutations.push(Mutation::CreateComment { node });
		node
	}

	// ---------------------------------------------------------------------
	// Inspection
	// ---------------------------------------------------------------------

	/// Returns the node kind.
	pub fn kind(&self, node: NodeId) -> DomResult<NodeKind> {
		Ok(self.entry(node)?.kind())
	}

	/// Returns the tag name of an element, `None` for other nodes.
	pub fn tag(&self, node: NodeId) -> Option<&str> {
		match &self.entry(node).ok()?.data {
			NodeData::Element { tag, .. } => Some(tag),
			_ => None,
		}
	}

	/// Returns the character data of a text or comment node.
	pub fn text(&self, node: NodeId) -> Option<&str> {
		match &self.entry(node).ok()?.data {
			NodeData::Text(text) | NodeData::Comment(text) => Some(text),
			NodeData::Element { .. } => None,
		}
	}

	/// Returns an attribute value.
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		match &self.entry(node).ok()?.data {
			NodeData::Element { attrs, .. } => attrs.get(name).map(String::as_str),
			_ => None,
		}
	}

	/// Returns all attributes of an element in name order.
	pub fn attributes(&self, node: NodeId) -> Vec<(&str, &str)> {
		match self.entry(node).map(|e| &e.data) {
			Ok(NodeData::Element { attrs, .. }) => attrs
				.iter()
				.map(|(k, v)| (k.as_str(), v.as_str()))
				.collect(),
			_ => Vec::new(),
		}
	}

	/// Returns the listener registered for an event, if any.
	pub fn listener(&self, node: NodeId, event: &str) -> Option<Listener> {
		match &self.entry(node).ok()?.data {
			NodeData::Element { listeners, .. } => listeners.get(event).cloned(),
			_ => None,
		}
	}

	/// Returns the parent of a node.
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.entry(node).ok()?.parent
	}

	/// Returns the children of a node.
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		self.entry(node)
			.map(|e| e.children.as_slice())
			.unwrap_or(&[])
	}

	/// Returns the sibling following `node` under its parent.
	pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
		let parent = self.parent(node)?;
		let siblings = self.children(parent);
		let pos = siblings.iter().position(|&c| c == node)?;
		siblings.get(pos + 1).copied()
	}

	/// Concatenates the text of all descendant text nodes.
	pub fn text_content(&self, node: NodeId) -> String {
		let mut out = String::new();
		self.collect_text(node, &mut out);
		out
	}

	fn collect_text(&self, node: NodeId, out: &mut String) {
		let Ok(entry) = self.entry(node) else {
			return;
		};
		match &entry.data {
			NodeData::Text(text) => out.push_str(text),
			NodeData::Comment(_) => {}
			NodeData::Element { .. } => {
				for &child in &entry.children {
					self.collect_text(child, out);
				}
			}
		}
	}

	/// Finds the first attached element whose `id` attribute matches.
	pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
		self.find_in(self.body, &|doc, node| doc.attribute(node, "id") == Some(id))
	}

	/// Finds the first descendant of `root` (inclusive) matching `pred`, in
	/// document order.
	pub fn find_in(
		&self,
		root: NodeId,
		pred: &dyn Fn(&Document, NodeId) -> bool,
	) -> Option<NodeId> {
		if pred(self, root) {
			return Some(root);
		}
		self.children(root)
			.iter()
			.find_map(|&child| self.find_in(child, pred))
	}

	/// Returns `true` if `ancestor` is `node` or one of its ancestors.
	pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
		let mut cursor = Some(node);
		while let Some(current) = cursor {
			if current == ancestor {
				return true;
			}
			cursor = self.parent(current);
		}
		false
	}

	// ---------------------------------------------------------------------
	// Content mutation
	// ---------------------------------------------------------------------

	/// Sets an attribute. Setting an identical value records nothing.
	pub fn set_attribute(
		&mut self,
		node: NodeId,
		name: impl Into<String>,
		value: impl Into<String>,
	) -> DomResult<()> {
		let name = name.into();
		let value = value.into();
		let NodeData::Element { attrs, .. } = &mut self.entry_mut(node)?.data else {
			return Err(DomError::NotAnElement(node));
		};
		if attrs.get(&name) == Some(&value) {
			return Ok(());
		}
		attrs.insert(name.clone(), value);
		self.mutations.push(Mutation::SetAttribute { node, name });
		Ok(())
	}

	/// Removes an attribute if present.
	pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<()> {
		let NodeData::Element { attrs, .. } = &mut self.entry_mut(node)?.data else {
			return Err(DomError::NotAnElement(node));
		};
		if attrs.remove(name).is_some() {
			self.mutations.push(Mutation::RemoveAttribute {
				node,
				name: name.to_string(),
			});
		}
		Ok(())
	}

	/// Replaces the character data of a text or comment node.
	pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> DomResult<()> {
		let text = text.into();
		match &mut self.entry_mut(node)?.data {
			NodeData::Text(current) | NodeData::Comment(current) => {
				if *current == text {
					return Ok(());
				}
				*current = text;
			}
			NodeData::Element { .. } => return Err(DomError::NotCharacterData(node)),
		}
		self.mutations.push(Mutation::SetText { node });
		Ok(())
	}

	/// Attaches a listener, replacing any previous one for the same event.
	pub fn set_listener(
		&mut self,
		node: NodeId,
		event: impl Into<String>,
		listener: Listener,
	) -> DomResult<()> {
		let event = event.into();
		let NodeData::Element { listeners, .. } = &mut self.entry_mut(node)?.data else {
			return Err(DomError::NotAnElement(node));
		};
		listeners.insert(event.clone(), listener);
		self.mutations.push(Mutation::SetListener { node, event });
		Ok(())
	}

	/// Detaches the listener for an event if present.
	pub fn remove_listener(&mut self, node: NodeId, event: &str) -> DomResult<()> {
		let NodeData::Element { listeners, .. } = &mut self.entry_mut(node)?.data else {
			return Err(DomError::NotAnElement(node));
		};
		if listeners.remove(event).is_some() {
			self.mutations.push(Mutation::RemoveListener {
				node,
				event: event.to_string(),
			});
		}
		Ok(())
	}

	// ---------------------------------------------------------------------
	// Tree mutation
	// ---------------------------------------------------------------------

	/// Appends `child` as the last child of `parent`, detaching it first.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
		self.insert_before(parent, child, None)
	}

	/// Inserts `child` before `reference` under `parent`, or appends it when
	/// `reference` is `None`. The child is detached from its current parent
	/// first, so this doubles as a move.
	pub fn insert_before(
		&mut self,
		parent: NodeId,
		child: NodeId,
		reference: Option<NodeId>,
	) -> DomResult<()> {
		if !matches!(self.entry(parent)?.data, NodeData::Element { .. }) {
			return Err(DomError::NotAnElement(parent));
		}
		self.entry(child)?;
		if self.is_inclusive_ancestor(child, parent) {
			return Err(DomError::HierarchyRequest { node: child });
		}
		if let Some(reference) = reference {
			if reference == child {
				return Ok(());
			}
			if self.parent(reference) != Some(parent) {
				return Err(DomError::NotAChild {
					parent,
					child: reference,
				});
			}
		}

		self.detach(child)?;

		let siblings = &mut self.entry_mut(parent)?.children;
		let index = reference
			.and_then(|r| siblings.iter().position(|&c| c == r))
			.unwrap_or(siblings.len());
		siblings.insert(index, child);
		self.entry_mut(child)?.parent = Some(parent);
		self.mutations.push(Mutation::Insert {
			parent,
			node: child,
		});
		Ok(())
	}

	/// Detaches `child` from `parent`.
	pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
		if self.parent(child) != Some(parent) {
			return Err(DomError::NotAChild { parent, child });
		}
		self.detach(child)
	}

	/// Replaces `old` under `parent` with `new`.
	pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> DomResult<()> {
		self.insert_before(parent, new, Some(old))?;
		self.remove_child(parent, old)
	}

	fn detach(&mut self, node: NodeId) -> DomResult<()> {
		let Some(parent) = self.entry(node)?.parent else {
			return Ok(());
		};
		self.entry_mut(parent)?.children.retain(|&c| c != node);
		self.entry_mut(node)?.parent = None;
		self.mutations.push(Mutation::Remove { parent, node });
		Ok(())
	}

	/// Detaches a node and frees its whole subtree. Ids of freed nodes become
	/// unknown.
	pub fn release(&mut self, node: NodeId) -> DomResult<()> {
		self.detach(node)?;
		let mut stack = vec![node];
		while let Some(current) = stack.pop() {
			if let Some(entry) = self.nodes.get_mut(current.0).and_then(Option::take) {
				stack.extend(entry.children);
			}
		}
		Ok(())
	}

	// ---------------------------------------------------------------------
	// Events
	// ---------------------------------------------------------------------

	/// Collects the listeners an event on `target` reaches, innermost first
	/// (bubbling order).
	///
	/// Listeners are returned rather than invoked so callers can release any
	/// borrow of the document before running user code.
	pub fn bubble_path(&self, target: NodeId, event: &str) -> Vec<Listener> {
		let mut path = Vec::new();
		let mut cursor = Some(target);
		while let Some(node) = cursor {
			if let Some(listener) = self.listener(node, event) {
				path.push(listener);
			}
			cursor = self.parent(node);
		}
		path
	}

	/// Dispatches an event directly against this document.
	///
	/// Listeners must not need access to the document itself; use
	/// [`bubble_path`](Self::bubble_path) when they do. Returns the number of
	/// listeners invoked.
	pub fn dispatch(&self, event: &Event) -> usize {
		let path = self.bubble_path(event.target, &event.name);
		for listener in &path {
			listener(event);
		}
		path.len()
	}

	// ---------------------------------------------------------------------
	// Mutation log
	// ---------------------------------------------------------------------

	/// Returns the mutations recorded since the last drain.
	pub fn mutations(&self) -> &[Mutation] {
		&self.mutations
	}

	/// Drains the mutation log.
	pub fn take_mutations(&mut self) -> Vec<Mutation> {
		std::mem::take(&mut self.mutations)
	}

	/// Discards the mutation log.
	pub fn clear_mutations(&mut self) {
		self.mutations.clear();
	}
}
