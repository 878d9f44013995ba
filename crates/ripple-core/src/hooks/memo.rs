//! Memo hooks: use_memo and use_memo_with

use std::any::Any;
use std::rc::Rc;

use super::{Scope, deps_changed};
use crate::error::{HookError, HookKind};
use crate::instance::Hook;

impl Scope {
	/// Computes a value on every render.
	///
	/// Without dependencies there is nothing to compare against, so this is
	/// equivalent to calling `f` directly; it still occupies a hook slot.
	pub fn use_memo<T: 'static>(&self, f: impl FnOnce() -> T) -> Result<Rc<T>, HookError> {
		self.memo(None::<()>, f)
	}

	/// Returns a cached value, recomputing it only when `deps` changed.
	///
	/// # Arguments
	///
	/// * `deps` - Compared with `PartialEq` against the previous render's deps
	/// * `f` - Produces the value
	///
	/// # Example
	///
	/// ```ignore
	/// let total = cx.use_memo_with(items.clone(), || items.iter().sum::<i64>())?;
	/// ```
	pub fn use_memo_with<D, T>(&self, deps: D, f: impl FnOnce() -> T) -> Result<Rc<T>, HookError>
	where
		D: PartialEq + 'static,
		T: 'static,
	{
		self.memo(Some(deps), f)
	}

	fn memo<D, T>(&self, deps: Option<D>, f: impl FnOnce() -> T) -> Result<Rc<T>, HookError>
	where
		D: PartialEq + 'static,
		T: 'static,
	{
		let slot = self.claim(HookKind::Memo)?;

		if slot.existing {
			let cached = match slot.instance.borrow().hooks.get(slot.index) {
				Some(Hook::Memo { value, deps: prev }) if !deps_changed(prev.as_deref(), deps.as_ref()) => {
					Some(Rc::clone(value))
				}
				_ => None,
			};
			if let Some(value) = cached {
				return value.downcast::<T>().map_err(|_| HookError::TypeMismatch {
					index: slot.index,
					kind: HookKind::Memo,
				});
			}
		}

		let value = Rc::new(f());
		crate::hook_trace!(index = slot.index, "memo computed");
		slot.instance.borrow_mut().set_hook(
			slot.index,
			Hook::Memo {
				value: value.clone() as Rc<dyn Any>,
				deps: deps.map(|d| Box::new(d) as Box<dyn Any>),
			},
		);
		Ok(value)
	}
}
