//! Stable Primitives
//!
//! Hooks that decouple the identity of a value from how often its component
//! re-renders.
//!
//! # Values
//!
//! [`use_stable_value`] returns the same `Rc` for as long as the signature
//! of the rendered value does not change. Consumers keyed on the returned
//! `Rc` see exactly one change per distinct signature.
//!
//! # Getters
//!
//! [`use_stable_getter`] returns one [`StableGetter`] per instance. Reading
//! it yields the latest committed value. The write happens in the
//! priority-commit phase, before any ordinary commit callback of the same
//! update can read it.
//!
//! # Callbacks
//!
//! [`use_stable_callback`] stores the latest closure in a getter and returns
//! one [`StableCallback`] per instance that dispatches through it. There is
//! no separate mechanism for closures: they are just another getter value.

mod callback;
mod getter;
pub mod signature;
mod value;

pub use callback::{use_stable_callback, Callback, StableCallback, WeakCallback};
pub use getter::{use_stable_getter, StableGetter};
pub use signature::Signature;
pub use value::{use_stable_value, use_stable_value_msgpack, use_stable_value_with};
