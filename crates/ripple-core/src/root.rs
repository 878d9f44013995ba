//! Render roots.

use std::cell::{Ref as CellRef, RefCell};
use std::fmt;
use std::mem;
use std::rc::Rc;
use std::slice;

use ripple_dom::{Document, Event, NodeId, NodeKind, html};

use crate::effects::FlushReport;
use crate::error::{RenderError, RenderResult};
use crate::mounted::Mounted;
use crate::options::RuntimeOptions;
use crate::render::Renderer;
use crate::runtime::Runtime;
use crate::vnode::Child;

/// A tree rendered into a host container.
///
/// The root owns the mounted tree and the [`Runtime`] its components share.
/// Rendering is synchronous: [`render`](Self::render) diffs the new tree
/// against the mounted one, applies the changes and then (unless
/// [`RuntimeOptions::flush_effects_on_commit`] is disabled) runs queued
/// effects and any re-renders they trigger.
///
/// ## Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use ripple_core::{Root, VNode};
/// use ripple_dom::Document;
///
/// let document = Rc::new(RefCell::new(Document::new()));
/// let body = document.borrow().body();
/// let mut root = Root::new(document, body).unwrap();
///
/// root.render(VNode::element("h1").child("Hello")).unwrap();
/// assert_eq!(root.inner_html(), "<h1>Hello</h1>");
/// ```
pub struct Root {
	document: Rc<RefCell<Document>>,
	container: NodeId,
	runtime: Runtime,
	tree: Vec<Mounted>,
	app: Option<Child>,
}

impl Root {
	/// Creates a root rendering into `container`.
	pub fn new(document: Rc<RefCell<Document>>, container: NodeId) -> RenderResult<Self> {
		Self::with_options(document, container, RuntimeOptions::default())
	}

	/// Creates a root with explicit runtime options.
	pub fn with_options(
		document: Rc<RefCell<Document>>,
		container: NodeId,
		options: RuntimeOptions,
	) -> RenderResult<Self> {
		if !matches!(document.borrow().kind(container), Ok(NodeKind::Element)) {
			return Err(RenderError::MissingContainer(container.to_string()));
		}
		Ok(Self {
			document,
			container,
			runtime: Runtime::new(options),
			tree: Vec::new(),
			app: None,
		})
	}

	/// Creates a root rendering into the element with the given `id`.
	pub fn from_id(
		document: Rc<RefCell<Document>>,
		id: &str,
		options: RuntimeOptions,
	) -> RenderResult<Self> {
		let container = document
			.borrow()
			.get_element_by_id(id)
			.ok_or_else(|| RenderError::MissingContainer(format!("#{id}")))?;
		Self::with_options(document, container, options)
	}

	/// Adopts the markup already inside `container` instead of creating it.
	///
	/// Matching server-rendered nodes are kept; mismatches are replaced and
	/// logged. The returned root behaves like one created with
	/// [`render`](Self::render).
	pub fn hydrate(
		document: Rc<RefCell<Document>>,
		container: NodeId,
		app: impl Into<Child>,
		options: RuntimeOptions,
	) -> RenderResult<Self> {
		let mut root = Self::with_options(document, container, options)?;
		let app = app.into();
		{
			let mut doc = root.document.borrow_mut();
			let mut renderer = Renderer::new(&mut doc, &root.runtime);
			root.tree = renderer.hydrate_children(root.container, slice::from_ref(&app))?;
		}
		root.app = Some(app);
		tracing::debug!(container = %root.container, "root hydrated");
		root.settle()?;
		Ok(root)
	}

	/// Renders `app`, replacing whatever this root rendered before.
	///
	/// If rendering fails the previous tree is unmounted (its effect
	/// cleanups run) and the root is left empty; a later call starts over.
	pub fn render(&mut self, app: impl Into<Child>) -> RenderResult<()> {
		self.app = Some(app.into());
		self.commit()?;
		self.settle()?;
		Ok(())
	}

	/// Runs queued effects and re-renders while state updates are pending.
	///
	/// Fails with [`RenderError::UpdateLoop`] when updates keep scheduling
	/// re-renders for more than
	/// [`max_update_depth`](RuntimeOptions::max_update_depth) passes.
	pub fn flush(&mut self) -> RenderResult<FlushReport> {
		let limit = self.runtime.options().max_update_depth;
		let mut report = FlushReport::default();
		let mut passes = 0;
		loop {
			report.merge(self.runtime.run_effects());
			if !self.runtime.take_dirty() {
				return Ok(report);
			}
			passes += 1;
			if passes > limit {
				tracing::error!(passes = limit, "update loop detected");
				return Err(RenderError::UpdateLoop(limit));
			}
			self.commit()?;
		}
	}

	/// Re-renders the current tree if a state update is pending, without
	/// running effects.
	pub fn update(&mut self) -> RenderResult<bool> {
		if !self.runtime.take_dirty() {
			return Ok(false);
		}
		self.commit()?;
		Ok(true)
	}

	/// Dispatches an event from its target up through its ancestors, then
	/// applies any state updates the handlers made.
	///
	/// Returns the number of listeners invoked.
	pub fn dispatch(&mut self, event: &Event) -> RenderResult<usize> {
		let listeners = self
			.document
			.borrow()
			.bubble_path(event.target, &event.name);
		for listener in &listeners {
			listener(event);
		}
		self.settle()?;
		Ok(listeners.len())
	}

	/// Unmounts everything: effect cleanups run, host nodes are removed and
	/// pending effects are dropped.
	pub fn unmount(&mut self) -> RenderResult<()> {
		let tree = mem::take(&mut self.tree);
		self.app = None;
		{
			let mut doc = self.document.borrow_mut();
			let mut renderer = Renderer::new(&mut doc, &self.runtime);
			for mounted in tree {
				renderer.unmount(mounted)?;
			}
		}
		self.runtime.discard_effects();
		self.runtime.take_dirty();
		Ok(())
	}

	/// Returns the shared document.
	pub fn document(&self) -> &Rc<RefCell<Document>> {
		&self.document
	}

	/// Borrows the document.
	pub fn doc(&self) -> CellRef<'_, Document> {
		self.document.borrow()
	}

	/// Returns the container node.
	pub fn container(&self) -> NodeId {
		self.container
	}

	/// Returns the runtime shared by this root's components.
	pub fn runtime(&self) -> &Runtime {
		&self.runtime
	}

	/// Returns the number of effects waiting for a flush.
	pub fn pending_effects(&self) -> usize {
		self.runtime.pending_effects()
	}

	/// Serializes the container's children.
	pub fn inner_html(&self) -> String {
		html::inner_html(&self.document.borrow(), self.container)
	}

	/// Reconciles the current app against the mounted tree.
	///
	/// A failed pass unmounts everything it touched, so the root is left
	/// empty rather than holding a half-patched tree. Effects queued by the
	/// failed pass are dropped.
	fn commit(&mut self) -> RenderResult<()> {
		self.runtime.take_dirty();
		let old = mem::take(&mut self.tree);
		let result = {
			let mut doc = self.document.borrow_mut();
			let mut renderer = Renderer::new(&mut doc, &self.runtime);
			let children = match &self.app {
				Some(app) => slice::from_ref(app),
				None => &[],
			};
			renderer.reconcile_children(self.container, old, children, None)
		};
		match result {
			Ok(tree) => {
				self.tree = tree;
				Ok(())
			}
			Err(error) => {
				let discarded = self.runtime.discard_effects();
				self.runtime.take_dirty();
				tracing::error!(%error, discarded, "render failed, root unmounted");
				Err(error)
			}
		}
	}

	fn settle(&mut self) -> RenderResult<()> {
		if self.runtime.options().flush_effects_on_commit {
			self.flush()?;
		} else {
			self.update()?;
		}
		Ok(())
	}
}

impl fmt::Debug for Root {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Root")
			.field("container", &self.container)
			.field("runtime", &self.runtime)
			.field("mounted", &self.tree.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_missing_container() {
		let document = Rc::new(RefCell::new(Document::new()));
		let text = document.borrow_mut().create_text("not an element");

		assert!(matches!(
			Root::new(document.clone(), text),
			Err(RenderError::MissingContainer(_))
		));
		assert!(matches!(
			Root::from_id(document, "app", RuntimeOptions::default()),
			Err(RenderError::MissingContainer(id)) if id == "#app"
		));
	}

	#[rstest]
	fn test_unmount_clears_container() {
		let document = Rc::new(RefCell::new(Document::new()));
		let body = document.borrow().body();
		let mut root = Root::new(document, body).unwrap();
		root.render(crate::VNode::element("p").child("x")).unwrap();
		assert_eq!(root.inner_html(), "<p>x</p>");

		root.unmount().unwrap();

		assert_eq!(root.inner_html(), "");
	}
}
