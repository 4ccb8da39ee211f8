//! Mutable cells with a permanent identity.
//!
//! A [`Pointer`] is what a mutable slot hands out. Every render of the same
//! instance gets a handle to the same cell, and writes mutate it in place,
//! so any handle taken earlier observes them.

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::Rc;

use super::deps::DepKey;

/// Shared handle to a per-instance mutable cell.
///
/// Reads and writes borrow the cell only for the duration of the call.
/// Calling [`Pointer::set`] from inside a [`Pointer::with`] closure on the
/// same cell panics.
pub struct Pointer<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> Pointer<T> {
    /// Create a new cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(value)),
        }
    }

    /// Overwrite the current value.
    pub fn set(&self, value: T) {
        *self.cell.borrow_mut() = value;
    }

    /// Overwrite the current value and return the previous one.
    pub fn replace(&self, value: T) -> T {
        self.cell.replace(value)
    }

    /// Run `f` with a reference to the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow())
    }

    /// Whether both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone> Pointer<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.cell.borrow().clone()
    }
}

impl<T: 'static> Pointer<T> {
    /// Dependency key on the identity of this cell.
    pub fn dep_key(&self) -> DepKey {
        DepKey::of(&self.cell)
    }
}

impl<T> Clone for Pointer<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: Debug> Debug for Pointer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pointer")
            .field("current", &*self.cell.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_cell() {
        let pointer = Pointer::new(1);
        let other = pointer.clone();

        other.set(2);
        assert_eq!(pointer.get(), 2);
        assert!(pointer.ptr_eq(&other));
        assert_eq!(pointer.dep_key(), other.dep_key());
    }

    #[test]
    fn replace_returns_previous() {
        let pointer = Pointer::new(String::from("a"));
        assert_eq!(pointer.replace(String::from("b")), "a");
        assert_eq!(pointer.with(|s| s.len()), 1);
    }

    #[test]
    fn separate_cells_are_distinct() {
        let a = Pointer::new(0);
        let b = Pointer::new(0);
        assert!(!a.ptr_eq(&b));
        assert_ne!(a.dep_key(), b.dep_key());
    }
}
