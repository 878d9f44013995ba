//! Ref hook: use_ref

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use super::Scope;
use crate::error::{HookError, HookKind};
use crate::instance::Hook;
use crate::refs::{NodeRef, Ref};

impl Scope {
	/// Returns a mutable container that keeps its identity across renders.
	///
	/// `initial` is used on the first render only. Writing to the container
	/// does not schedule a re-render.
	pub fn use_ref<T: 'static>(&self, initial: T) -> Result<Ref<T>, HookError> {
		let slot = self.claim(HookKind::Ref)?;

		if slot.existing {
			let stored = match slot.instance.borrow().hooks.get(slot.index) {
				Some(Hook::Ref(value)) => Rc::clone(value),
				_ => return Err(type_mismatch(slot.index)),
			};
			return stored
				.downcast::<RefCell<T>>()
				.map(Ref::from_rc)
				.map_err(|_| type_mismatch(slot.index));
		}

		let container = Ref::new(initial);
		let stored: Rc<dyn Any> = container.inner().clone();
		slot.instance
			.borrow_mut()
			.set_hook(slot.index, Hook::Ref(stored));
		Ok(container)
	}

	/// Returns a ref for attaching to an element via
	/// [`VNode::node_ref`](crate::VNode::node_ref).
	pub fn use_node_ref(&self) -> Result<NodeRef, HookError> {
		self.use_ref(None)
	}
}

fn type_mismatch(index: usize) -> HookError {
	HookError::TypeMismatch {
		index,
		kind: HookKind::Ref,
	}
}
