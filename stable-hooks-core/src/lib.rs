//! Stable Hooks Core
//!
//! Component runtimes that re-invoke a render function many times per
//! logical update produce structurally equal but freshly allocated values
//! and closures on every call. Anything keyed on identity (memoized work,
//! dependency-gated side effects) then re-runs for nothing.
//!
//! This crate provides three hooks that separate identity from render
//! frequency:
//!
//! - [`use_stable_value`]: one `Rc` per distinct signature of the input
//! - [`use_stable_getter`]: a permanent accessor for the latest value
//! - [`use_stable_callback`]: a permanent callable running the latest closure
//!
//! # Architecture
//!
//! - `host`: the [`Host`] trait hooks are written against, plus a reference
//!   implementation ([`Runtime`], [`Scope`]) with a two-phase commit
//! - `stable`: the three hooks and the signature policies
//! - `config`: limits and validation switches for the reference host
//! - `error`: [`HookError`] and [`SignatureError`]
//!
//! # Example
//!
//! ```rust
//! use stable_hooks::{use_stable_callback, use_stable_getter, Runtime};
//!
//! let mut runtime = Runtime::new();
//! let id = runtime.mount();
//!
//! let (getter, callback) = runtime
//!     .render(id, |cx| {
//!         let label = String::from("first");
//!         let getter = use_stable_getter(cx, label.clone())?;
//!         let callback = use_stable_callback(cx, move |()| label.len())?;
//!         Ok((getter, callback))
//!     })
//!     .unwrap();
//!
//! runtime
//!     .render(id, |cx| {
//!         let label = String::from("second!");
//!         use_stable_getter(cx, label.clone())?;
//!         use_stable_callback(cx, move |()| label.len())?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! // Handles from the first render observe the second render.
//! assert_eq!(getter.get(), "second!");
//! assert_eq!(callback.call(()), 7);
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod stable;

pub use config::RuntimeConfig;
pub use error::{HookError, SignatureError};
pub use host::{CommitPhase, DepKey, Deps, Host, HookKind, InstanceId, Pointer, Runtime, Scope};
pub use stable::{
    use_stable_callback, use_stable_getter, use_stable_value, use_stable_value_msgpack,
    use_stable_value_with, Callback, Signature, StableCallback, StableGetter, WeakCallback,
};
