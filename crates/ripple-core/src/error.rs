//! Error types for rendering, hooks and effects.

use std::fmt;

use ripple_dom::DomError;
use thiserror::Error;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// The kind of a hook slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
	/// `use_state`
	State,
	/// `use_effect` / `use_effect_with`
	Effect,
	/// `use_memo` / `use_memo_with`
	Memo,
	/// `use_ref`
	Ref,
	/// `use_mount`
	Mount,
}

impl fmt::Display for HookKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			HookKind::State => "use_state",
			HookKind::Effect => "use_effect",
			HookKind::Memo => "use_memo",
			HookKind::Ref => "use_ref",
			HookKind::Mount => "use_mount",
		};
		f.write_str(name)
	}
}

/// Errors raised by hook calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum HookError {
	/// A hook was called while no component was rendering.
	#[error("invalid hook call: hooks can only be called while a component is rendering")]
	InvalidHookCall,

	/// The hook at this index is of a different kind than on the previous
	/// render, i.e. hooks were called conditionally or in a different order.
	#[error("hook order changed at index {index}: slot holds {expected}, called {found}")]
	OrderMismatch {
		/// Slot index.
		index: usize,
		/// Kind stored in the slot.
		expected: HookKind,
		/// Kind of the hook being called.
		found: HookKind,
	},

	/// The hook at this index stores a different value type than requested.
	#[error("hook at index {index} ({kind}) changed its value type between renders")]
	TypeMismatch {
		/// Slot index.
		index: usize,
		/// Hook kind.
		kind: HookKind,
	},
}

/// A failure reported by an effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("effect failed: {0}")]
pub struct EffectError(pub String);

impl EffectError {
	/// Creates an effect error from any displayable message.
	pub fn new(message: impl fmt::Display) -> Self {
		Self(message.to_string())
	}
}

/// Errors raised while rendering or reconciling.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
	/// A hook failed inside a component.
	#[error(transparent)]
	Hook(#[from] HookError),

	/// The host document rejected an operation.
	#[error(transparent)]
	Dom(#[from] DomError),

	/// The container to render into does not exist.
	#[error("host container not found: {0}")]
	MissingContainer(String),

	/// A component returned an error.
	#[error("component `{component}` failed: {message}")]
	Component {
		/// Component name.
		component: String,
		/// Error message.
		message: String,
	},

	/// State updates kept scheduling re-renders.
	#[error("maximum update depth exceeded after {0} re-render passes")]
	UpdateLoop(usize),
}

impl RenderError {
	/// Creates a component error.
	pub fn component(component: impl Into<String>, message: impl fmt::Display) -> Self {
		Self::Component {
			component: component.into(),
			message: message.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_order_mismatch_message() {
		let err = HookError::OrderMismatch {
			index: 2,
			expected: HookKind::Memo,
			found: HookKind::Effect,
		};
		assert_eq!(
			err.to_string(),
			"hook order changed at index 2: slot holds use_memo, called use_effect"
		);
	}

	#[rstest]
	fn test_hook_error_converts_into_render_error() {
		let err: RenderError = HookError::InvalidHookCall.into();
		assert!(matches!(err, RenderError::Hook(HookError::InvalidHookCall)));
		assert!(err.to_string().starts_with("invalid hook call"));
	}
}
