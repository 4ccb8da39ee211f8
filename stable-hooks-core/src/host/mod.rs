//! Host Boundary
//!
//! Hooks never talk to a rendering engine directly. They are written against
//! the [`Host`] trait, which is the minimal substrate a component runtime has
//! to provide:
//!
//! - **memo slots**: a per-instance cache recomputed only when its deps change
//! - **mutable slots**: a per-instance cell that does not trigger re-renders
//! - **commit callbacks**: side effects run after a render is accepted, in
//!   two phases (priority first, then normal)
//!
//! # Reference Host
//!
//! [`Runtime`] and [`Scope`] implement the trait with an explicit two-phase
//! update protocol. A render collects commit callbacks; [`Runtime::commit`]
//! runs every priority callback of the update before any normal one. Other
//! runtimes can implement [`Host`] themselves as long as they keep that
//! ordering.
//!
//! # Threading
//!
//! Everything here is single-threaded. Slots and handles use `Rc` and
//! `RefCell`, so the compiler keeps them on the thread that owns the runtime.

mod deps;
mod instance;
mod pointer;
mod runtime;

pub use deps::{DepKey, Deps};
pub use instance::{CommitPhase, HookKind, InstanceId};
pub use pointer::Pointer;
pub use runtime::{Runtime, Scope};

use crate::error::HookError;

/// The substrate hooks are written against.
///
/// Every method claims the next slot of the current render, so calls must
/// happen in the same order on every render of an instance.
pub trait Host {
    /// Return the cached value of this slot, recomputing it with `compute`
    /// when `deps` changed since the previous render.
    ///
    /// If `compute` fails the slot keeps its previous value (or is not
    /// created at all on the first render) and the error is returned.
    fn memo_slot<T, F>(&mut self, deps: Deps, compute: F) -> Result<T, HookError>
    where
        T: Clone + 'static,
        F: FnOnce() -> Result<T, HookError>;

    /// Return the mutable cell of this slot, creating it with `init` on the
    /// first render.
    fn mutable_slot<T, F>(&mut self, init: F) -> Result<Pointer<T>, HookError>
    where
        T: 'static,
        F: FnOnce() -> T;

    /// Run `effect` in the normal phase of this update's commit if `deps`
    /// changed since the callback last ran.
    fn on_commit<F>(&mut self, deps: Deps, effect: F) -> Result<(), HookError>
    where
        F: FnOnce() + 'static;

    /// Like [`Host::on_commit`], but runs before every normal callback of the
    /// same update.
    fn on_priority_commit<F>(&mut self, deps: Deps, effect: F) -> Result<(), HookError>
    where
        F: FnOnce() + 'static;
}
