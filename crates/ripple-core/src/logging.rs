//! Logging helpers.
//!
//! Structured events go through [`tracing`] directly. The [`hook_trace!`]
//! macro is for per-hook chatter that is too noisy even for `trace` level in
//! normal builds.
//!
//! | Macro | Debug Assertions | Feature Required | Output |
//! |-------|------------------|------------------|--------|
//! | `hook_trace!` | Required | `debug-hooks` | `tracing::trace!` on target `ripple::hooks` |
//!
//! ## Example
//!
//! ```ignore
//! use ripple_core::hook_trace;
//!
//! hook_trace!(index = 3, kind = %HookKind::Memo, "memo recomputed");
//! ```

#[doc(hidden)]
pub use tracing as __tracing;

/// Emits a hook-level trace event (requires `debug-hooks` feature + `debug_assertions`).
///
/// Accepts the same arguments as [`tracing::trace!`].
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks"))]
macro_rules! hook_trace {
	($($arg:tt)*) => {{
		$crate::logging::__tracing::trace!(target: "ripple::hooks", $($arg)*);
	}};
}

/// No-op hook_trace when conditions are not met
#[macro_export]
#[cfg(not(all(debug_assertions, feature = "debug-hooks")))]
macro_rules! hook_trace {
	($($arg:tt)*) => {{}};
}
