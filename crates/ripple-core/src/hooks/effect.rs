//! Effect hooks: use_effect and use_effect_with

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use super::{Scope, deps_changed};
use crate::effects::EffectOutput;
use crate::error::{HookError, HookKind};
use crate::instance::{EffectSlot, Hook};

impl Scope {
	/// Runs a side effect after every commit.
	///
	/// The effect is queued during render and runs once the render pass has
	/// been applied to the host document. It may return a cleanup
	/// (`Option<impl FnOnce()>`), which runs before the effect runs again and
	/// when the component unmounts. Returning `Err` logs the failure without
	/// affecting other effects.
	///
	/// # Example
	///
	/// ```ignore
	/// cx.use_effect(move || {
	///     let subscription = source.subscribe(on_change);
	///     Some(move || drop(subscription))
	/// })?;
	/// ```
	pub fn use_effect<F, R>(&self, f: F) -> Result<(), HookError>
	where
		F: FnOnce() -> R + 'static,
		R: EffectOutput,
	{
		self.effect(None::<()>, f)
	}

	/// Runs a side effect after commit whenever `deps` changed.
	///
	/// Pass `()` to run the effect once after the first commit.
	pub fn use_effect_with<D, F, R>(&self, deps: D, f: F) -> Result<(), HookError>
	where
		D: PartialEq + 'static,
		F: FnOnce() -> R + 'static,
		R: EffectOutput,
	{
		self.effect(Some(deps), f)
	}

	fn effect<D, F, R>(&self, deps: Option<D>, f: F) -> Result<(), HookError>
	where
		D: PartialEq + 'static,
		F: FnOnce() -> R + 'static,
		R: EffectOutput,
	{
		let slot = self.claim(HookKind::Effect)?;

		let previous_cleanup = {
			let inst = slot.instance.borrow();
			match inst.hooks.get(slot.index) {
				Some(Hook::Effect(prev)) if slot.existing => {
					if !deps_changed(prev.deps.as_deref(), deps.as_ref()) {
						return Ok(());
					}
					prev.cleanup.take()
				}
				_ => None,
			}
		};

		let cleanup = Rc::new(RefCell::new(None));
		slot.instance.borrow_mut().set_hook(
			slot.index,
			Hook::Effect(EffectSlot {
				deps: deps.map(|d| Box::new(d) as Box<dyn Any>),
				cleanup: cleanup.clone(),
			}),
		);

		if let Some(previous) = previous_cleanup {
			previous();
		}

		crate::hook_trace!(index = slot.index, "effect queued");
		self.runtime().queue_effect(move || {
			let next = f().into_cleanup()?;
			*cleanup.borrow_mut() = next;
			Ok(())
		});
		Ok(())
	}
}
