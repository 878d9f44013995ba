//! Connecting signals to render roots.

use ripple_core::Root;
use ripple_signals::{ReadSignal, Subscription};

/// Schedules a re-render of `root` whenever `signal` is written.
///
/// The subscription holds the root weakly; dropping the root leaves it
/// inert. Apply the scheduled update with [`Root::update`] or
/// [`Root::flush`].
pub fn bind_signal<T: 'static>(signal: &ReadSignal<T>, root: &Root) -> Subscription {
	let handle = root.runtime().update_handle();
	signal.subscribe(move || {
		if !handle.schedule() {
			tracing::debug!("signal write after its root was dropped");
		}
	})
}
