//! Server-signal capture.
//!
//! A server signal is an ordinary signal whose getter is also registered in a
//! thread-local registry. After a server render, [`collect_server_signals`]
//! snapshots every live registered value as JSON so it can be shipped to the
//! client with the rendered markup.
//!
//! The registry holds weak references: dropping every handle of a signal
//! removes it from later snapshots. Call [`reset_server_signals`] between
//! independent renders (and in tests) to start from a clean registry.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::signal::{ReadSignal, SignalId, WriteSignal, create_signal, reset_signal_ids};

type Snapshot = Box<dyn Fn() -> Option<Value>>;

thread_local! {
	static SERVER_SIGNALS: RefCell<BTreeMap<SignalId, Snapshot>> = RefCell::new(BTreeMap::new());
}

/// Creates a signal and registers it for server capture.
pub fn create_server_signal<T>(value: T) -> (ReadSignal<T>, WriteSignal<T>)
where
	T: Serialize + 'static,
{
	let (read, write) = create_signal(value);
	let id = read.id();
	let weak = Rc::downgrade(&read.inner);
	let snapshot: Snapshot = Box::new(move || {
		let inner = weak.upgrade()?;
		let value = inner.value.try_borrow().ok()?;
		match serde_json::to_value(&*value) {
			Ok(json) => Some(json),
			Err(error) => {
				tracing::warn!(signal = %id, %error, "server signal is not serializable");
				None
			}
		}
	});
	SERVER_SIGNALS.with(|registry| registry.borrow_mut().insert(id, snapshot));
	(read, write)
}

/// Snapshots every live server signal, keyed by signal id (`"s0"`, `"s1"`, ...).
pub fn collect_server_signals() -> BTreeMap<String, Value> {
	SERVER_SIGNALS.with(|registry| {
		registry
			.borrow()
			.iter()
			.filter_map(|(id, snapshot)| snapshot().map(|value| (id.to_string(), value)))
			.collect()
	})
}

/// Clears the registry and restarts signal id assignment.
pub fn reset_server_signals() {
	SERVER_SIGNALS.with(|registry| registry.borrow_mut().clear());
	reset_signal_ids();
}

/// Returns the number of registered server signals, live or not.
pub fn server_signal_count() -> usize {
	SERVER_SIGNALS.with(|registry| registry.borrow().len())
}
