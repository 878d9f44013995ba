//! Component instances and their hook slots.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ripple_dom::NodeId;

use crate::effects::Cleanup;
use crate::error::HookKind;
use crate::vnode::{Child, Component};

/// Identifier of a component instance, unique within a runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u64);

impl fmt::Display for InstanceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "c{}", self.0)
	}
}

/// Shared handle to a component instance.
pub type InstanceRef = Rc<RefCell<ComponentInstance>>;

/// The effect slot of a hook array.
pub(crate) struct EffectSlot {
	pub(crate) deps: Option<Box<dyn Any>>,
	/// Filled when the queued effect runs.
	pub(crate) cleanup: Rc<RefCell<Option<Cleanup>>>,
}

/// One entry of a component's hook array.
pub(crate) enum Hook {
	/// `Rc<RefCell<T>>` behind the `State<T>` handle.
	State(Rc<dyn Any>),
	Effect(EffectSlot),
	Memo {
		/// `Rc<T>`
		value: Rc<dyn Any>,
		deps: Option<Box<dyn Any>>,
	},
	/// `Rc<RefCell<T>>` behind the `Ref<T>` handle.
	Ref(Rc<dyn Any>),
	Mount {
		has_run: bool,
	},
}

impl Hook {
	pub(crate) fn kind(&self) -> HookKind {
		match self {
			Hook::State(_) => HookKind::State,
			Hook::Effect(_) => HookKind::Effect,
			Hook::Memo { .. } => HookKind::Memo,
			Hook::Ref(_) => HookKind::Ref,
			Hook::Mount { .. } => HookKind::Mount,
		}
	}
}

/// A mounted component occurrence.
///
/// Created on first mount and mutated in place on every re-render, so hook
/// slots survive between renders.
pub struct ComponentInstance {
	id: InstanceId,
	render: Component,
	pub(crate) hooks: Vec<Hook>,
	pub(crate) cursor: usize,
	pub(crate) vnode: Option<Child>,
	pub(crate) dom: Option<NodeId>,
}

impl ComponentInstance {
	pub(crate) fn new(id: InstanceId, render: Component) -> Self {
		Self {
			id,
			render,
			hooks: Vec::new(),
			cursor: 0,
			vnode: None,
			dom: None,
		}
	}

	/// Returns the instance id.
	pub fn id(&self) -> InstanceId {
		self.id
	}

	/// Returns the component name.
	pub fn name(&self) -> &str {
		self.render.name()
	}

	/// Returns the component this instance renders.
	pub fn component(&self) -> &Component {
		&self.render
	}

	/// Returns the number of hook slots.
	pub fn hook_count(&self) -> usize {
		self.hooks.len()
	}

	/// Returns the hook cursor of the current (or last) render.
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	/// Returns the tree produced by the last render.
	pub fn vnode(&self) -> Option<&Child> {
		self.vnode.as_ref()
	}

	/// Returns the first host node of the rendered output.
	pub fn dom(&self) -> Option<NodeId> {
		self.dom
	}

	/// Starts a render pass.
	pub(crate) fn begin_render(&mut self) {
		self.cursor = 0;
	}

	/// Claims the next slot index.
	pub(crate) fn advance(&mut self) -> usize {
		let index = self.cursor;
		self.cursor += 1;
		index
	}

	pub(crate) fn set_hook(&mut self, index: usize, hook: Hook) {
		if index < self.hooks.len() {
			self.hooks[index] = hook;
		} else {
			self.hooks.push(hook);
		}
	}
}

impl fmt::Debug for ComponentInstance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentInstance")
			.field("id", &self.id)
			.field("name", &self.name())
			.field("hooks", &self.hooks.len())
			.field("cursor", &self.cursor)
			.field("dom", &self.dom)
			.finish()
	}
}
