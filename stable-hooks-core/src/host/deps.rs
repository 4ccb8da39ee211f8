//! Dependency keys for memo slots and commit callbacks.
//!
//! A slot re-runs its computation (or its commit callback) only when its
//! dependency list differs from the one recorded last time. Keys compare in
//! one of two ways:
//!
//! - [`DepKey::Ref`] compares by reference identity (`Rc` pointer), which is
//!   how a host notices that a new allocation was handed to it.
//! - [`DepKey::Signature`] compares by value, so two equal signatures are the
//!   same key even if they were computed from different allocations.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::stable::Signature;

/// A single dependency key.
#[derive(Clone)]
pub enum DepKey {
    /// Identity of a shared allocation. Holding the `Rc` keeps the address
    /// from being reused while the key is recorded in a slot.
    Ref(Rc<dyn Any>),

    /// A value-compared signature.
    Signature(Signature),
}

impl DepKey {
    /// Key on the identity of `value`.
    pub fn of<T: 'static>(value: &Rc<T>) -> Self {
        Self::Ref(Rc::clone(value) as Rc<dyn Any>)
    }

    /// Key on the content of `signature`.
    pub fn signature(signature: Signature) -> Self {
        Self::Signature(signature)
    }
}

impl PartialEq for DepKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ref(a), Self::Ref(b)) => Rc::ptr_eq(a, b),
            (Self::Signature(a), Self::Signature(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for DepKey {}

impl fmt::Debug for DepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ref(value) => write!(f, "Ref({:p})", Rc::as_ptr(value)),
            Self::Signature(signature) => f.debug_tuple("Signature").field(signature).finish(),
        }
    }
}

/// The dependency list of a memo slot or commit callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deps {
    /// Changed on every render.
    Always,

    /// Changed when any key differs from the previously recorded list.
    /// An empty list never changes, so the slot runs once per instance.
    Keys(SmallVec<[DepKey; 2]>),
}

impl Deps {
    /// An empty key list: compute on mount only.
    pub fn once() -> Self {
        Self::Keys(SmallVec::new())
    }

    /// A single-key list.
    pub fn key(key: DepKey) -> Self {
        let mut keys = SmallVec::new();
        keys.push(key);
        Self::Keys(keys)
    }

    /// Build a key list from any iterator of keys.
    pub fn keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = DepKey>,
    {
        Self::Keys(keys.into_iter().collect())
    }

    /// Whether these deps differ from `previous`.
    pub fn changed_since(&self, previous: &Deps) -> bool {
        match (self, previous) {
            (Self::Keys(current), Self::Keys(previous)) => current != previous,
            _ => true,
        }
    }
}

impl FromIterator<DepKey> for Deps {
    fn from_iter<I: IntoIterator<Item = DepKey>>(iter: I) -> Self {
        Self::keys(iter)
    }
}
