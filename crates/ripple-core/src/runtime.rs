//! Per-root runtime state.
//!
//! ## Architecture
//!
//! A [`Runtime`] bundles everything a render root shares between component
//! renders:
//!
//! 1. **Component stack**: the instance whose hooks are being called
//! 2. **Effect queue**: effects waiting for the current commit to finish
//! 3. **Dirty flag**: set by state setters, consumed by the root's flush loop
//! 4. **Instance ids**: a counter for [`InstanceId`]s
//!
//! Handles are cheap clones of one shared allocation. Nothing here is global,
//! so independent roots (and server renders) never observe each other.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::effects::{EffectQueue, FlushReport, run_batch};
use crate::error::{EffectError, HookError, RenderResult};
use crate::hooks::Scope;
use crate::instance::{ComponentInstance, InstanceId, InstanceRef};
use crate::options::RuntimeOptions;
use crate::stack::ComponentStack;
use crate::vnode::{Child, Component, Props};

struct RuntimeInner {
	options: RuntimeOptions,
	stack: RefCell<ComponentStack>,
	effects: RefCell<EffectQueue>,
	dirty: Cell<bool>,
	next_instance: Cell<u64>,
}

/// Shared state of one render root.
#[derive(Clone)]
pub struct Runtime {
	inner: Rc<RuntimeInner>,
}

impl Runtime {
	/// Creates a runtime.
	pub fn new(options: RuntimeOptions) -> Self {
		Self {
			inner: Rc::new(RuntimeInner {
				options,
				stack: RefCell::new(ComponentStack::new()),
				effects: RefCell::new(EffectQueue::new()),
				dirty: Cell::new(false),
				next_instance: Cell::new(0),
			}),
		}
	}

	/// Returns the options this runtime was created with.
	pub fn options(&self) -> &RuntimeOptions {
		&self.inner.options
	}

	/// Returns the instance currently rendering.
	pub fn current(&self) -> Result<InstanceRef, HookError> {
		self.inner.stack.borrow().current()
	}

	/// Returns the depth of the component stack.
	pub fn stack_depth(&self) -> usize {
		self.inner.stack.borrow().depth()
	}

	/// Returns a hook scope bound to this runtime.
	pub fn scope(&self) -> Scope {
		Scope::new(self.clone())
	}

	/// Queues an effect for the next flush.
	pub fn queue_effect(&self, effect: impl FnOnce() -> Result<(), EffectError> + 'static) {
		self.inner.effects.borrow_mut().queue(effect);
	}

	/// Returns the number of queued effects.
	pub fn pending_effects(&self) -> usize {
		self.inner.effects.borrow().len()
	}

	/// Runs queued effects until the queue stays empty.
	///
	/// The queue is taken before each batch runs, so effects may queue
	/// further effects (they run in a following batch) without re-borrowing.
	pub fn run_effects(&self) -> FlushReport {
		let mut report = FlushReport::default();
		loop {
			let batch = self.inner.effects.borrow_mut().take();
			if batch.is_empty() {
				return report;
			}
			report.merge(run_batch(batch));
		}
	}

	/// Drops queued effects without running them.
	pub fn discard_effects(&self) -> usize {
		let mut effects = self.inner.effects.borrow_mut();
		let dropped = effects.len();
		effects.clear();
		dropped
	}

	/// Marks the root as needing a re-render.
	pub fn mark_dirty(&self) {
		self.inner.dirty.set(true);
	}

	/// Returns whether a re-render is pending.
	pub fn is_dirty(&self) -> bool {
		self.inner.dirty.get()
	}

	/// Clears and returns the dirty flag.
	pub fn take_dirty(&self) -> bool {
		self.inner.dirty.replace(false)
	}

	/// Returns a weak handle that schedules re-renders.
	pub fn update_handle(&self) -> UpdateHandle {
		UpdateHandle(Rc::downgrade(&self.inner))
	}

	pub(crate) fn new_instance(&self, component: Component) -> InstanceRef {
		let id = self.inner.next_instance.get();
		self.inner.next_instance.set(id + 1);
		Rc::new(RefCell::new(ComponentInstance::new(
			InstanceId(id),
			component,
		)))
	}

	/// Renders `instance` once: resets its hook cursor, makes it current,
	/// invokes the component and pops it again. The result is recorded as
	/// the instance's last tree.
	pub(crate) fn render_instance(
		&self,
		instance: &InstanceRef,
		props: &Props,
	) -> RenderResult<Child> {
		let component = {
			let mut inst = instance.borrow_mut();
			inst.begin_render();
			inst.component().clone()
		};

		self.inner.stack.borrow_mut().set_current(instance.clone());
		let scope = self.scope();
		let result = component.call(&scope, props);
		self.inner.stack.borrow_mut().reset_current();
		let child = result?;

		let mut inst = instance.borrow_mut();
		if self.inner.options.check_hook_order && inst.cursor != inst.hooks.len() {
			tracing::warn!(
				component = inst.name(),
				called = inst.cursor,
				slots = inst.hooks.len(),
				"component called fewer hooks than on a previous render"
			);
		}
		inst.vnode = Some(child.clone());
		Ok(child)
	}

	/// Renders a component outside any root, with a fresh instance.
	///
	/// Used for server rendering: hooks work, but effects are only queued
	/// and the instance is dropped afterwards.
	pub fn render_component(&self, component: &Component, props: &Props) -> RenderResult<Child> {
		let instance = self.new_instance(component.clone());
		self.render_instance(&instance, props)
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new(RuntimeOptions::default())
	}
}

impl fmt::Debug for Runtime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Runtime")
			.field("options", &self.inner.options)
			.field("stack", &self.inner.stack.borrow().depth())
			.field("effects", &self.inner.effects.borrow().len())
			.field("dirty", &self.inner.dirty.get())
			.finish()
	}
}

/// Schedules re-renders of a root without keeping it alive.
#[derive(Clone)]
pub struct UpdateHandle(Weak<RuntimeInner>);

impl UpdateHandle {
	/// Marks the root dirty. Returns `false` if the root is gone.
	pub fn schedule(&self) -> bool {
		match self.0.upgrade() {
			Some(inner) => {
				inner.dirty.set(true);
				true
			}
			None => false,
		}
	}
}

impl fmt::Debug for UpdateHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("UpdateHandle")
			.field(&(self.0.strong_count() > 0))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_run_effects_drains_nested_batches() {
		let runtime = Runtime::default();
		let log = Rc::new(RefCell::new(Vec::new()));

		let inner_runtime = runtime.clone();
		let outer_log = log.clone();
		runtime.queue_effect(move || {
			outer_log.borrow_mut().push("outer");
			let nested_log = outer_log.clone();
			inner_runtime.queue_effect(move || {
				nested_log.borrow_mut().push("nested");
				Ok(())
			});
			Ok(())
		});

		let report = runtime.run_effects();

		assert_eq!(*log.borrow(), vec!["outer", "nested"]);
		assert_eq!(report.ran, 2);
		assert_eq!(runtime.pending_effects(), 0);
	}

	#[rstest]
	fn test_update_handle_marks_dirty_until_dropped() {
		let runtime = Runtime::default();
		let handle = runtime.update_handle();

		assert!(handle.schedule());
		assert!(runtime.take_dirty());
		assert!(!runtime.is_dirty());

		drop(runtime);
		assert!(!handle.schedule());
	}

	#[rstest]
	fn test_current_outside_render_fails() {
		let runtime = Runtime::default();
		assert_eq!(runtime.current().unwrap_err(), HookError::InvalidHookCall);
	}
}
