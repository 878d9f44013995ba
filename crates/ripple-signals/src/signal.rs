//! Signal - a getter/setter pair over one shared value
//!
//! Signals are independent of the hook system: they can be created anywhere,
//! including plain modules and server code, and notify subscribers
//! synchronously when written.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use ripple_signals::create_signal;
//!
//! let (count, set_count) = create_signal(0);
//! let seen = Rc::new(Cell::new(0));
//! let sink = seen.clone();
//! let _subscription = count.subscribe(move || sink.set(sink.get() + 1));
//!
//! set_count.set(2);
//! set_count.update(|n| *n += 1);
//!
//! assert_eq!(count.get(), 3);
//! assert_eq!(seen.get(), 2);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Subscriber = Rc<dyn Fn()>;

thread_local! {
	static NEXT_SIGNAL_ID: Cell<u64> = const { Cell::new(0) };
}

/// Unique identifier of a signal within a thread.
///
/// Ids are handed out in creation order, so a server render and the client
/// hydration that follows it assign the same ids when they create their
/// signals in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignalId(u64);

impl SignalId {
	fn next() -> Self {
		NEXT_SIGNAL_ID.with(|next| {
			let id = next.get();
			next.set(id + 1);
			Self(id)
		})
	}

	/// Returns the raw id.
	pub fn as_u64(self) -> u64 {
		self.0
	}
}

impl fmt::Display for SignalId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "s{}", self.0)
	}
}

/// Restarts id assignment at zero.
pub(crate) fn reset_signal_ids() {
	NEXT_SIGNAL_ID.with(|next| next.set(0));
}

pub(crate) struct SignalInner<T> {
	id: SignalId,
	pub(crate) value: RefCell<T>,
	subscribers: RefCell<Vec<(u64, Subscriber)>>,
	next_subscriber: Cell<u64>,
}

impl<T> SignalInner<T> {
	fn notify(&self) {
		let subscribers: Vec<Subscriber> = self
			.subscribers
			.borrow()
			.iter()
			.map(|(_, s)| Rc::clone(s))
			.collect();
		for subscriber in subscribers {
			subscriber();
		}
	}
}

/// The read half of a signal.
pub struct ReadSignal<T> {
	pub(crate) inner: Rc<SignalInner<T>>,
}

/// The write half of a signal.
pub struct WriteSignal<T> {
	inner: Rc<SignalInner<T>>,
}

/// Creates a signal, returning its read and write halves.
pub fn create_signal<T: 'static>(value: T) -> (ReadSignal<T>, WriteSignal<T>) {
	let inner = Rc::new(SignalInner {
		id: SignalId::next(),
		value: RefCell::new(value),
		subscribers: RefCell::new(Vec::new()),
		next_subscriber: Cell::new(0),
	});
	(
		ReadSignal {
			inner: Rc::clone(&inner),
		},
		WriteSignal { inner },
	)
}

impl<T> ReadSignal<T> {
	/// Returns the signal id.
	pub fn id(&self) -> SignalId {
		self.inner.id
	}

	/// Returns a copy of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.inner.value.borrow().clone()
	}

	/// Reads the current value by reference.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.inner.value.borrow())
	}

	/// Calls `f` after every write until the returned [`Subscription`] is
	/// dropped.
	pub fn subscribe(&self, f: impl Fn() + 'static) -> Subscription
	where
		T: 'static,
	{
		let key = self.inner.next_subscriber.get();
		self.inner.next_subscriber.set(key + 1);
		self.inner.subscribers.borrow_mut().push((key, Rc::new(f)));

		let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
		Subscription {
			unsubscribe: Some(Box::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner.subscribers.borrow_mut().retain(|(k, _)| *k != key);
				}
			})),
		}
	}

	/// Returns the number of live subscriptions.
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}
}

impl<T> WriteSignal<T> {
	/// Returns the signal id.
	pub fn id(&self) -> SignalId {
		self.inner.id
	}

	/// Replaces the value and notifies subscribers.
	pub fn set(&self, value: T) {
		*self.inner.value.borrow_mut() = value;
		self.inner.notify();
	}

	/// Mutates the value in place and notifies subscribers.
	pub fn update(&self, f: impl FnOnce(&mut T)) {
		f(&mut self.inner.value.borrow_mut());
		self.inner.notify();
	}
}

impl<T> Clone for ReadSignal<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T> Clone for WriteSignal<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T> PartialEq for ReadSignal<T> {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl<T: fmt::Debug> fmt::Debug for ReadSignal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("ReadSignal");
		s.field("id", &self.inner.id);
		match self.inner.value.try_borrow() {
			Ok(value) => s.field("value", &*value),
			Err(_) => s.field("value", &"<borrowed>"),
		};
		s.finish()
	}
}

impl<T> fmt::Debug for WriteSignal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WriteSignal")
			.field("id", &self.inner.id)
			.finish()
	}
}

/// Keeps a subscriber registered; unsubscribes when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
	unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// Keeps the subscriber registered for the lifetime of the signal.
	pub fn detach(mut self) {
		self.unsubscribe = None;
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(unsubscribe) = self.unsubscribe.take() {
			unsubscribe();
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.unsubscribe.is_some())
			.finish()
	}
}
