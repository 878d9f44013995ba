//! State hook: use_state

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::Scope;
use crate::error::{HookError, HookKind};
use crate::instance::Hook;
use crate::runtime::UpdateHandle;

/// A state value owned by a component instance.
///
/// Reading never schedules anything. Writing replaces the value and marks
/// the owning root dirty, so the next flush re-renders it. Handles can be
/// cloned into event handlers and effects.
pub struct State<T> {
	value: Rc<RefCell<T>>,
	updater: UpdateHandle,
}

impl<T> State<T> {
	/// Returns a copy of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Reads the current value by reference.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.borrow())
	}

	/// Replaces the value and schedules a re-render.
	pub fn set(&self, value: T) {
		*self.value.borrow_mut() = value;
		self.updater.schedule();
	}

	/// Mutates the value in place and schedules a re-render.
	pub fn update(&self, f: impl FnOnce(&mut T)) {
		f(&mut self.value.borrow_mut());
		self.updater.schedule();
	}

	/// Returns `true` if both handles refer to the same slot.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.value, &other.value)
	}
}

impl<T> Clone for State<T> {
	fn clone(&self) -> Self {
		Self {
			value: Rc::clone(&self.value),
			updater: self.updater.clone(),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value.try_borrow() {
			Ok(value) => f.debug_tuple("State").field(&*value).finish(),
			Err(_) => f.write_str("State(<borrowed>)"),
		}
	}
}

impl Scope {
	/// Declares a state value, initialised to `initial` on first render.
	///
	/// # Example
	///
	/// ```ignore
	/// fn counter(cx: &Scope, _: &Props) -> RenderResult<Child> {
	///     let count = cx.use_state(0)?;
	///     let on_click = {
	///         let count = count.clone();
	///         move |_: &Event| count.update(|n| *n += 1)
	///     };
	///     Ok(VNode::element("button")
	///         .on("click", on_click)
	///         .child(count.get())
	///         .into())
	/// }
	/// ```
	pub fn use_state<T: 'static>(&self, initial: T) -> Result<State<T>, HookError> {
		self.use_state_with(|| initial)
	}

	/// Like [`use_state`](Self::use_state), computing the initial value
	/// lazily. `init` runs on the first render only.
	pub fn use_state_with<T: 'static>(
		&self,
		init: impl FnOnce() -> T,
	) -> Result<State<T>, HookError> {
		let slot = self.claim(HookKind::State)?;
		let updater = self.runtime().update_handle();

		if slot.existing {
			let stored = match slot.instance.borrow().hooks.get(slot.index) {
				Some(Hook::State(value)) => Rc::clone(value),
				_ => return Err(type_mismatch(slot.index)),
			};
			let value = stored
				.downcast::<RefCell<T>>()
				.map_err(|_| type_mismatch(slot.index))?;
			return Ok(State { value, updater });
		}

		let value = Rc::new(RefCell::new(init()));
		slot.instance
			.borrow_mut()
			.set_hook(slot.index, Hook::State(value.clone() as Rc<dyn Any>));
		crate::hook_trace!(index = slot.index, "state initialised");
		Ok(State { value, updater })
	}
}

fn type_mismatch(index: usize) -> HookError {
	HookError::TypeMismatch {
		index,
		kind: HookKind::State,
	}
}
