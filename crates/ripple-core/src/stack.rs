//! The stack of components currently rendering.
//!
//! The top frame is the instance whose hooks are being called. Nested
//! component renders push on top of their parent and pop when they return.

use std::rc::Rc;

use crate::error::HookError;
use crate::instance::InstanceRef;

/// Stack of rendering instances, owned by a [`Runtime`](crate::Runtime).
#[derive(Debug, Default)]
pub struct ComponentStack {
	frames: Vec<InstanceRef>,
}

impl ComponentStack {
	/// Creates an empty stack.
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes `instance` current.
	///
	/// If the instance is already on the stack, every frame from its position
	/// upward is dropped before it is pushed again, so re-entering a
	/// component never leaves stale frames above it.
	pub fn set_current(&mut self, instance: InstanceRef) {
		if let Some(position) = self.position(&instance) {
			self.frames.truncate(position);
		}
		self.frames.push(instance);
	}

	/// Pops the current instance. No-op on an empty stack.
	pub fn reset_current(&mut self) {
		self.frames.pop();
	}

	/// Returns the current instance.
	pub fn current(&self) -> Result<InstanceRef, HookError> {
		self.frames
			.last()
			.cloned()
			.ok_or(HookError::InvalidHookCall)
	}

	/// Replaces `old` with `new` wherever it sits on the stack.
	pub fn update_in_stack(&mut self, old: &InstanceRef, new: InstanceRef) {
		if let Some(position) = self.position(old) {
			self.frames[position] = new;
		}
	}

	/// Clears the stack.
	pub fn reset(&mut self) {
		self.frames.clear();
	}

	/// Returns the number of frames.
	pub fn depth(&self) -> usize {
		self.frames.len()
	}

	/// Returns `true` if no component is rendering.
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	fn position(&self, instance: &InstanceRef) -> Option<usize> {
		self.frames.iter().position(|f| Rc::ptr_eq(f, instance))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::RefCell;

	use rstest::{fixture, rstest};

	use crate::error::RenderResult;
	use crate::hooks::Scope;
	use crate::instance::{ComponentInstance, InstanceId};
	use crate::vnode::{Child, Component, Props};

	fn blank(_: &Scope, _: &Props) -> RenderResult<Child> {
		Ok(Child::Null)
	}

	fn instance(id: u64) -> InstanceRef {
		Rc::new(RefCell::new(ComponentInstance::new(
			InstanceId(id),
			Component::new("Blank", blank),
		)))
	}

	#[fixture]
	fn stack() -> ComponentStack {
		ComponentStack::new()
	}

	#[rstest]
	fn test_current_on_empty_stack_fails(stack: ComponentStack) {
		assert_eq!(stack.current().unwrap_err(), HookError::InvalidHookCall);
	}

	#[rstest]
	fn test_push_pop(mut stack: ComponentStack) {
		let a = instance(1);
		let b = instance(2);
		stack.set_current(a.clone());
		stack.set_current(b.clone());
		assert!(Rc::ptr_eq(&stack.current().unwrap(), &b));

		stack.reset_current();
		assert!(Rc::ptr_eq(&stack.current().unwrap(), &a));

		stack.reset_current();
		stack.reset_current();
		assert!(stack.is_empty());
	}

	#[rstest]
	fn test_set_current_truncates_to_existing_frame(mut stack: ComponentStack) {
		let a = instance(1);
		let b = instance(2);
		let c = instance(3);
		stack.set_current(a.clone());
		stack.set_current(b.clone());
		stack.set_current(c);

		stack.set_current(b.clone());

		assert_eq!(stack.depth(), 2);
		assert!(Rc::ptr_eq(&stack.current().unwrap(), &b));
	}

	#[rstest]
	fn test_update_in_stack(mut stack: ComponentStack) {
		let a = instance(1);
		let b = instance(2);
		let replacement = instance(3);
		stack.set_current(a.clone());
		stack.set_current(b);
		stack.update_in_stack(&a, replacement.clone());
		stack.reset_current();
		assert!(Rc::ptr_eq(&stack.current().unwrap(), &replacement));

		stack.update_in_stack(&instance(9), instance(10));
		assert_eq!(stack.depth(), 1);

		stack.reset();
		assert!(stack.is_empty());
	}
}
