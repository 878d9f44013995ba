//! Hooks.
//!
//! Hooks are methods on the [`Scope`] a component receives. Each call claims
//! the next slot of the rendering instance's hook array, so hooks must be
//! called unconditionally and in the same order on every render. When
//! [`RuntimeOptions::check_hook_order`](crate::RuntimeOptions::check_hook_order)
//! is enabled a slot whose kind changed between renders fails with
//! [`HookError::OrderMismatch`]; otherwise the slot is re-initialised, after
//! running the cleanup of an effect it held.
//!
//! Every hook fails with [`HookError::InvalidHookCall`] when no component is
//! rendering.
//!
//! ## Available Hooks
//!
//! | Hook | Purpose |
//! |------|---------|
//! | [`Scope::use_state`] | Local state that schedules a re-render when set |
//! | [`Scope::use_effect`] / [`Scope::use_effect_with`] | Side effects run after commit |
//! | [`Scope::use_memo`] / [`Scope::use_memo_with`] | Cached computations |
//! | [`Scope::use_ref`] | A mutable container stable across renders |
//! | [`Scope::use_mount`] | A callback run once, on first render |

mod effect;
mod memo;
mod mount;
mod reference;
mod state;

pub use state::State;

use std::any::Any;
use std::fmt;

use crate::error::{HookError, HookKind};
use crate::instance::{Hook, InstanceRef};
use crate::runtime::Runtime;

/// The hook context handed to a rendering component.
#[derive(Clone)]
pub struct Scope {
	runtime: Runtime,
}

/// A claimed hook slot.
pub(crate) struct Slot {
	pub(crate) instance: InstanceRef,
	pub(crate) index: usize,
	/// `true` when the slot already holds a hook of the requested kind.
	pub(crate) existing: bool,
}

impl Scope {
	pub(crate) fn new(runtime: Runtime) -> Self {
		Self { runtime }
	}

	/// Returns the runtime this scope belongs to.
	pub fn runtime(&self) -> &Runtime {
		&self.runtime
	}

	/// Claims the next hook slot of the current instance.
	pub(crate) fn claim(&self, kind: HookKind) -> Result<Slot, HookError> {
		let instance = self.runtime.current()?;
		let (index, existing, stale_cleanup) = {
			let mut inst = instance.borrow_mut();
			let index = inst.advance();
			match inst.hooks.get(index) {
				None => (index, false, None),
				Some(hook) if hook.kind() == kind => (index, true, None),
				Some(hook) => {
					let expected = hook.kind();
					if self.runtime.options().check_hook_order {
						return Err(HookError::OrderMismatch {
							index,
							expected,
							found: kind,
						});
					}
					crate::hook_trace!(index, %expected, found = %kind, "re-initialising hook slot");
					let cleanup = match hook {
						Hook::Effect(slot) => slot.cleanup.take(),
						_ => None,
					};
					(index, false, cleanup)
				}
			}
		};
		// Runs before the slot is overwritten.
		if let Some(cleanup) = stale_cleanup {
			cleanup();
		}
		Ok(Slot {
			instance,
			index,
			existing,
		})
	}
}

impl fmt::Debug for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Scope")
			.field("depth", &self.runtime.stack_depth())
			.finish()
	}
}

/// Decides whether a dependency-tracked hook must rerun.
///
/// Returns `true` when either side is absent, when the stored dependencies
/// have a different type, or when they compare unequal.
pub fn deps_changed<D: PartialEq + 'static>(prev: Option<&dyn Any>, next: Option<&D>) -> bool {
	match (prev, next) {
		(Some(prev), Some(next)) => prev.downcast_ref::<D>().is_none_or(|p| p != next),
		_ => true,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(None, Some(1), true)]
	#[case(Some(1), None, true)]
	#[case(Some(1), Some(1), false)]
	#[case(Some(1), Some(2), true)]
	fn test_deps_changed(
		#[case] prev: Option<i32>,
		#[case] next: Option<i32>,
		#[case] expected: bool,
	) {
		let prev = prev.map(|p| Box::new(p) as Box<dyn Any>);
		assert_eq!(deps_changed(prev.as_deref(), next.as_ref()), expected);
	}

	#[rstest]
	fn test_deps_changed_on_type_change() {
		let prev: Box<dyn Any> = Box::new(1_u8);
		assert!(deps_changed(Some(&*prev), Some(&1_i32)));
	}

	#[rstest]
	fn test_claim_outside_render_fails() {
		let scope = Runtime::default().scope();
		assert_eq!(
			scope.claim(HookKind::State).err(),
			Some(HookError::InvalidHookCall)
		);
	}
}
