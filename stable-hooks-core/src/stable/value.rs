//! Signature-gated stable values.
//!
//! A component that builds a fresh `Rc` on every render hands downstream
//! consumers a new identity each time, even when the content is unchanged.
//! [`use_stable_value_with`] collapses such a stream into one identity per
//! distinct signature.
//!
//! Two memo slots back each call:
//!
//! 1. keyed by the identity of the input `Rc`, caching its signature, so the
//!    same allocation is never signed twice in a row;
//! 2. keyed by that signature, caching the stable value, so a new allocation
//!    with an unchanged signature returns the old allocation.

use std::rc::Rc;

use serde::Serialize;
use tracing::trace;

use super::signature::{self, Signature};
use crate::error::{HookError, SignatureError};
use crate::host::{DepKey, Deps, Host};

/// Stabilize `value` using its JSON signature.
///
/// See [`signature`](super::signature) for the encoder's collision and
/// failure modes.
pub fn use_stable_value<H, T>(host: &mut H, value: Rc<T>) -> Result<Rc<T>, HookError>
where
    H: Host,
    T: Serialize + 'static,
{
    use_stable_value_with(host, value, |value: &T| signature::json(value))
}

/// Stabilize `value` using its MessagePack signature.
pub fn use_stable_value_msgpack<H, T>(host: &mut H, value: Rc<T>) -> Result<Rc<T>, HookError>
where
    H: Host,
    T: Serialize + 'static,
{
    use_stable_value_with(host, value, |value: &T| signature::msgpack(value))
}

/// Stabilize `value` using a caller-supplied signature function.
///
/// Returns the previously returned `Rc` when the signature of `value` equals
/// the previous signature, and `value` itself otherwise. `signature_fn` runs
/// only when `value` is a different allocation than on the previous render.
///
/// A failing `signature_fn` aborts with [`HookError::Signature`]; the
/// previous stable value stays in place.
pub fn use_stable_value_with<H, T, F>(
    host: &mut H,
    value: Rc<T>,
    signature_fn: F,
) -> Result<Rc<T>, HookError>
where
    H: Host,
    T: 'static,
    F: FnOnce(&T) -> Result<Signature, SignatureError>,
{
    let input = Rc::clone(&value);
    let signature = host.memo_slot(Deps::key(DepKey::of(&value)), move || {
        Ok(signature_fn(&input)?)
    })?;

    host.memo_slot(Deps::key(DepKey::signature(signature)), move || {
        trace!(type_name = std::any::type_name::<T>(), "signature changed, value adopted");
        Ok(value)
    })
}
