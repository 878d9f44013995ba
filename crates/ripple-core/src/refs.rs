//! Mutable containers shared across renders.

use std::cell::{Ref as CellRef, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use ripple_dom::NodeId;

/// A mutable container with a stable identity.
///
/// Returned by [`Scope::use_ref`](crate::Scope::use_ref). Cloning yields a
/// handle to the same container; equality is identity.
pub struct Ref<T>(Rc<RefCell<T>>);

/// A ref that receives the host node of the element it is attached to.
pub type NodeRef = Ref<Option<NodeId>>;

impl<T> Ref<T> {
	/// Creates a new container.
	pub fn new(value: T) -> Self {
		Self(Rc::new(RefCell::new(value)))
	}

	pub(crate) fn from_rc(inner: Rc<RefCell<T>>) -> Self {
		Self(inner)
	}

	pub(crate) fn inner(&self) -> &Rc<RefCell<T>> {
		&self.0
	}

	/// Borrows the current value.
	pub fn borrow(&self) -> CellRef<'_, T> {
		self.0.borrow()
	}

	/// Mutably borrows the current value.
	pub fn borrow_mut(&self) -> RefMut<'_, T> {
		self.0.borrow_mut()
	}

	/// Replaces the current value.
	pub fn set(&self, value: T) {
		*self.0.borrow_mut() = value;
	}

	/// Returns `true` if both handles point at the same container.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl<T: Clone> Ref<T> {
	/// Returns a copy of the current value.
	pub fn current(&self) -> T {
		self.0.borrow().clone()
	}
}

impl<T> Clone for Ref<T> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}

impl<T> PartialEq for Ref<T> {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0.try_borrow() {
			Ok(value) => f.debug_tuple("Ref").field(&*value).finish(),
			Err(_) => f.write_str("Ref(<borrowed>)"),
		}
	}
}

impl<T: Default> Default for Ref<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}
