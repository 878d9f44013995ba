//! Runtime configuration.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading [`RuntimeOptions`].
#[derive(Debug, Error)]
pub enum OptionsError {
	/// The TOML document could not be parsed.
	#[error("invalid runtime options: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Options for a render root.
///
/// Every field has a default, so a partial TOML table is enough:
///
/// ```
/// use ripple_core::RuntimeOptions;
///
/// let options = RuntimeOptions::from_toml_str("max_update_depth = 10").unwrap();
/// assert_eq!(options.max_update_depth, 10);
/// assert!(options.flush_effects_on_commit);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeOptions {
	/// Fail with [`HookError::OrderMismatch`](crate::HookError::OrderMismatch)
	/// when a hook slot changes kind between renders. When disabled the slot
	/// is silently re-initialised.
	pub check_hook_order: bool,
	/// How many consecutive re-render passes a single flush may trigger
	/// before failing with [`RenderError::UpdateLoop`](crate::RenderError::UpdateLoop).
	pub max_update_depth: usize,
	/// Run queued effects right after each commit. When disabled effects
	/// wait for an explicit [`Root::flush`](crate::Root::flush).
	pub flush_effects_on_commit: bool,
}

impl Default for RuntimeOptions {
	fn default() -> Self {
		Self {
			check_hook_order: cfg!(debug_assertions),
			max_update_depth: 50,
			flush_effects_on_commit: true,
		}
	}
}

impl RuntimeOptions {
	/// Creates default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Enables or disables hook order checking.
	pub fn check_hook_order(mut self, enabled: bool) -> Self {
		self.check_hook_order = enabled;
		self
	}

	/// Sets the maximum number of re-render passes per flush.
	pub fn max_update_depth(mut self, depth: usize) -> Self {
		self.max_update_depth = depth;
		self
	}

	/// Defers effects until an explicit flush.
	pub fn manual_flush(mut self) -> Self {
		self.flush_effects_on_commit = false;
		self
	}

	/// Parses options from a TOML table.
	pub fn from_toml_str(input: &str) -> Result<Self, OptionsError> {
		Ok(toml::from_str(input)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let options = RuntimeOptions::default();
		assert_eq!(options.check_hook_order, cfg!(debug_assertions));
		assert_eq!(options.max_update_depth, 50);
		assert!(options.flush_effects_on_commit);
	}

	#[rstest]
	fn test_builder() {
		let options = RuntimeOptions::new()
			.check_hook_order(false)
			.max_update_depth(3)
			.manual_flush();
		assert!(!options.check_hook_order);
		assert_eq!(options.max_update_depth, 3);
		assert!(!options.flush_effects_on_commit);
	}

	#[rstest]
	fn test_from_toml() {
		let options = RuntimeOptions::from_toml_str(
			"check_hook_order = true\nflush_effects_on_commit = false\n",
		)
		.unwrap();
		assert!(options.check_hook_order);
		assert!(!options.flush_effects_on_commit);
		assert_eq!(options.max_update_depth, 50);
	}

	#[rstest]
	fn test_from_toml_rejects_bad_types() {
		let err = RuntimeOptions::from_toml_str("max_update_depth = \"ten\"").unwrap_err();
		assert!(err.to_string().starts_with("invalid runtime options"));
	}
}
