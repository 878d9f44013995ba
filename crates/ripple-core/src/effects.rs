//! Deferred effects.
//!
//! Effects registered during a render are queued and run only after the
//! render pass has been committed to the host document. A failing effect is
//! logged and does not prevent later effects from running.

use std::fmt;
use std::mem;

use crate::error::EffectError;
use crate::instance::{Hook, InstanceRef};

/// A cleanup returned by an effect.
pub type Cleanup = Box<dyn FnOnce()>;

/// A queued effect.
pub type QueuedEffect = Box<dyn FnOnce() -> Result<(), EffectError>>;

/// Values an effect callback may return.
///
/// * `()`: no cleanup
/// * `Option<F>`: an optional cleanup closure
/// * `Result<T, E>`: a fallible effect; `Err` is logged by the queue
pub trait EffectOutput {
	/// Converts the output into an optional cleanup.
	fn into_cleanup(self) -> Result<Option<Cleanup>, EffectError>;
}

impl EffectOutput for () {
	fn into_cleanup(self) -> Result<Option<Cleanup>, EffectError> {
		Ok(None)
	}
}

impl<C: FnOnce() + 'static> EffectOutput for Option<C> {
	fn into_cleanup(self) -> Result<Option<Cleanup>, EffectError> {
		Ok(self.map(|c| Box::new(c) as Cleanup))
	}
}

impl<T: EffectOutput, E: fmt::Display> EffectOutput for Result<T, E> {
	fn into_cleanup(self) -> Result<Option<Cleanup>, EffectError> {
		self.map_err(EffectError::new)?.into_cleanup()
	}
}

/// Outcome of running a batch of effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
	/// Effects executed.
	pub ran: usize,
	/// Effects that returned an error.
	pub failed: usize,
}

impl FlushReport {
	pub(crate) fn merge(&mut self, other: FlushReport) {
		self.ran += other.ran;
		self.failed += other.failed;
	}
}

/// FIFO queue of deferred effects.
#[derive(Default)]
pub struct EffectQueue {
	pending: Vec<QueuedEffect>,
}

impl EffectQueue {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an effect.
	pub fn queue(&mut self, effect: impl FnOnce() -> Result<(), EffectError> + 'static) {
		self.pending.push(Box::new(effect));
	}

	/// Returns the number of pending effects.
	pub fn len(&self) -> usize {
		self.pending.len()
	}

	/// Returns `true` if nothing is pending.
	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}

	/// Drops every pending effect without running it.
	pub fn clear(&mut self) {
		self.pending.clear();
	}

	/// Takes the pending effects, leaving the queue empty.
	pub fn take(&mut self) -> Vec<QueuedEffect> {
		mem::take(&mut self.pending)
	}

	/// Runs every pending effect in FIFO order and empties the queue.
	///
	/// Effects queued while running land in the (already emptied) queue and
	/// wait for the next call.
	pub fn run(&mut self) -> FlushReport {
		run_batch(self.take())
	}
}

impl fmt::Debug for EffectQueue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EffectQueue")
			.field("pending", &self.pending.len())
			.finish()
	}
}

/// Runs a batch of effects in order, logging failures.
pub fn run_batch(batch: Vec<QueuedEffect>) -> FlushReport {
	let mut report = FlushReport::default();
	for effect in batch {
		report.ran += 1;
		if let Err(error) = effect() {
			report.failed += 1;
			tracing::error!(%error, "effect failed");
		}
	}
	report
}

/// Runs and clears every effect cleanup held by `instance`.
///
/// Cleanups are collected first and invoked with no borrow of the instance
/// held, so they may freely touch state handles.
pub fn cleanup_effects(instance: &InstanceRef) {
	let cleanups: Vec<Cleanup> = instance
		.borrow()
		.hooks
		.iter()
		.filter_map(|hook| match hook {
			Hook::Effect(slot) => slot.cleanup.take(),
			_ => None,
		})
		.collect();
	for cleanup in cleanups {
		cleanup();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::RefCell;
	use std::rc::Rc;

	use rstest::rstest;

	#[rstest]
	fn test_run_is_fifo_and_isolates_failures() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let mut queue = EffectQueue::new();
		for (i, fail) in [(1, false), (2, true), (3, false)] {
			let log = log.clone();
			queue.queue(move || {
				log.borrow_mut().push(i);
				if fail {
					Err(EffectError::new("boom"))
				} else {
					Ok(())
				}
			});
		}

		let report = queue.run();

		assert_eq!(*log.borrow(), vec![1, 2, 3]);
		assert_eq!(report, FlushReport { ran: 3, failed: 1 });
		assert!(queue.is_empty());
	}

	#[rstest]
	fn test_effect_output_conversions() {
		assert!(().into_cleanup().unwrap().is_none());
		assert!(Some(|| {}).into_cleanup().unwrap().is_some());
		assert!(None::<fn()>.into_cleanup().unwrap().is_none());

		let failed: Result<(), &str> = Err("nope");
		assert_eq!(
			failed.into_cleanup().err(),
			Some(EffectError("nope".to_string()))
		);
	}

	#[rstest]
	fn test_clear_drops_without_running() {
		let ran = Rc::new(RefCell::new(false));
		let mut queue = EffectQueue::new();
		let flag = ran.clone();
		queue.queue(move || {
			*flag.borrow_mut() = true;
			Ok(())
		});
		assert_eq!(queue.len(), 1);

		queue.clear();

		assert_eq!(queue.run(), FlushReport::default());
		assert!(!*ran.borrow());
	}
}
