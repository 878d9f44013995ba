//! Mount hook: use_mount

use super::Scope;
use crate::error::{HookError, HookKind};
use crate::instance::Hook;

impl Scope {
	/// Runs `f` once, during the first render of the component.
	///
	/// The callback runs synchronously inside the render, before anything is
	/// committed. Use [`use_effect_with`](Self::use_effect_with) with `()`
	/// deps for work that needs the committed DOM.
	pub fn use_mount(&self, f: impl FnOnce()) -> Result<(), HookError> {
		let slot = self.claim(HookKind::Mount)?;
		if slot.existing {
			return Ok(());
		}

		slot.instance
			.borrow_mut()
			.set_hook(slot.index, Hook::Mount { has_run: false });
		f();
		if let Some(Hook::Mount { has_run }) = slot.instance.borrow_mut().hooks.get_mut(slot.index) {
			*has_run = true;
		}
		Ok(())
	}
}
