//! Stable getters over the latest rendered value.

use std::fmt::{self, Debug};

use crate::error::HookError;
use crate::host::{DepKey, Deps, Host, Pointer};

/// Accessor for the most recently committed value of a binding.
///
/// The getter returned by [`use_stable_getter`] is the same handle on every
/// render of its instance, so it can be used as a dependency without ever
/// invalidating anything. Reading it returns the value written by the latest
/// priority commit, or the initial value if no commit has run yet.
///
/// A value that holds its own getter keeps the cell alive through an `Rc`
/// cycle, even after its instance is unmounted.
pub struct StableGetter<T> {
    pointer: Pointer<T>,
}

impl<T: Clone> StableGetter<T> {
    /// Get a clone of the latest value.
    pub fn get(&self) -> T {
        self.pointer.get()
    }
}

impl<T> StableGetter<T> {
    /// Run `f` with a reference to the latest value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.pointer.with(f)
    }

    /// Whether both getters are the same handle.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.pointer.ptr_eq(&other.pointer)
    }
}

impl<T: 'static> StableGetter<T> {
    /// Dependency key on the identity of this getter.
    pub fn dep_key(&self) -> DepKey {
        self.pointer.dep_key()
    }
}

impl<T> Clone for StableGetter<T> {
    fn clone(&self) -> Self {
        Self {
            pointer: self.pointer.clone(),
        }
    }
}

impl<T: Debug> Debug for StableGetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StableGetter")
            .field("latest", &self.pointer)
            .finish()
    }
}

/// Track the latest value of `value` behind a getter of permanent identity.
///
/// Each render schedules a priority-commit write of `value` into the
/// instance's cell, so ordinary commit callbacks of the same update already
/// read the new value through the getter.
pub fn use_stable_getter<H, T>(host: &mut H, value: T) -> Result<StableGetter<T>, HookError>
where
    H: Host,
    T: Clone + 'static,
{
    let pointer = host.mutable_slot(|| value.clone())?;

    let target = pointer.clone();
    host.on_priority_commit(Deps::Always, move || target.set(value))?;

    host.memo_slot(Deps::once(), move || Ok(StableGetter { pointer }))
}
