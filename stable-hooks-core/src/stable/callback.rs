//! Stable callbacks that dispatch to the latest closure.

use std::fmt;
use std::rc::{Rc, Weak};

use super::getter::{use_stable_getter, StableGetter};
use crate::error::HookError;
use crate::host::{DepKey, Deps, Host};

/// A shared callable taking its arguments as one value (use a tuple for
/// several arguments).
pub type Callback<A, R> = Rc<dyn Fn(A) -> R>;

/// A callable of permanent identity that always runs the latest closure.
///
/// The proxy holds the getter of the closure, never the closure itself, so a
/// proxy obtained on the first render executes the closure of the latest
/// committed render.
pub struct StableCallback<A, R> {
    getter: Rc<StableGetter<Callback<A, R>>>,
}

impl<A, R> StableCallback<A, R> {
    /// Invoke the latest committed closure with `args`.
    ///
    /// Whatever the closure returns (including an `Err`) is returned as is,
    /// and a panic in the closure unwinds through this call.
    pub fn call(&self, args: A) -> R {
        // The getter borrow ends here, so the closure may re-enter the host.
        let current = self.getter.get();
        (*current)(args)
    }

    /// Whether both proxies are the same handle.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.getter, &other.getter)
    }

    /// A handle that does not keep the proxy alive.
    pub fn downgrade(&self) -> WeakCallback<A, R> {
        WeakCallback {
            getter: Rc::downgrade(&self.getter),
        }
    }
}

impl<A: 'static, R: 'static> StableCallback<A, R> {
    /// Dependency key on the identity of this proxy.
    pub fn dep_key(&self) -> DepKey {
        DepKey::of(&self.getter)
    }

    /// A plain closure forwarding to this proxy.
    pub fn to_fn(&self) -> impl Fn(A) -> R + 'static {
        let proxy = self.clone();
        move |args| proxy.call(args)
    }
}

impl<A, R> Clone for StableCallback<A, R> {
    fn clone(&self) -> Self {
        Self {
            getter: Rc::clone(&self.getter),
        }
    }
}

impl<A, R> fmt::Debug for StableCallback<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StableCallback({:p})", Rc::as_ptr(&self.getter))
    }
}

/// Non-owning version of a [`StableCallback`].
///
/// Closures that need to call their own proxy should capture this instead of
/// the proxy.
pub struct WeakCallback<A, R> {
    getter: Weak<StableGetter<Callback<A, R>>>,
}

impl<A, R> WeakCallback<A, R> {
    /// The proxy, if its instance is still mounted or another handle holds it.
    pub fn upgrade(&self) -> Option<StableCallback<A, R>> {
        self.getter.upgrade().map(|getter| StableCallback { getter })
    }
}

impl<A, R> Clone for WeakCallback<A, R> {
    fn clone(&self) -> Self {
        Self {
            getter: Weak::clone(&self.getter),
        }
    }
}

impl<A, R> fmt::Debug for WeakCallback<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakCallback({:p})", self.getter.as_ptr())
    }
}

/// Wrap `callback` in a proxy whose identity never changes while it always
/// dispatches to the callback of the latest committed render.
///
/// The instance stores `callback`, and the proxy points back at that
/// storage. A closure that captures its own [`StableCallback`] (or the
/// getter of a value containing it) therefore forms an `Rc` cycle that
/// outlives [`Runtime::unmount`](crate::Runtime::unmount). Capture a
/// [`WeakCallback`] from [`StableCallback::downgrade`] instead.
pub fn use_stable_callback<H, A, R, F>(
    host: &mut H,
    callback: F,
) -> Result<StableCallback<A, R>, HookError>
where
    H: Host,
    A: 'static,
    R: 'static,
    F: Fn(A) -> R + 'static,
{
    let getter = use_stable_getter(host, Rc::new(callback) as Callback<A, R>)?;

    host.memo_slot(Deps::key(getter.dep_key()), move || {
        Ok(StableCallback {
            getter: Rc::new(getter),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Runtime;
    use std::cell::{Cell, RefCell};

    #[test]
    fn proxy_runs_the_latest_closure() {
        let mut runtime = Runtime::new();
        let id = runtime.mount();

        let proxy = runtime
            .render(id, |cx| {
                let value = String::from("initial value");
                use_stable_callback(cx, move |()| value.clone())
            })
            .unwrap();
        assert_eq!(proxy.call(()), "initial value");

        let next = runtime
            .render(id, |cx| {
                let value = String::from("next value");
                use_stable_callback(cx, move |()| value.clone())
            })
            .unwrap();

        assert!(next.ptr_eq(&proxy));
        assert_eq!(proxy.dep_key(), next.dep_key());
        assert_eq!(proxy.call(()), "next value");
    }

    #[test]
    fn proxy_forwards_arguments_and_errors() {
        let mut runtime = Runtime::new();
        let id = runtime.mount();

        let divide = runtime
            .render(id, |cx| {
                use_stable_callback(cx, |(a, b): (i32, i32)| {
                    if b == 0 {
                        Err(String::from("division by zero"))
                    } else {
                        Ok(a / b)
                    }
                })
            })
            .unwrap();

        assert_eq!(divide.call((6, 3)), Ok(2));
        assert_eq!(divide.call((1, 0)), Err(String::from("division by zero")));

        let as_fn = divide.to_fn();
        assert_eq!(as_fn((9, 3)), Ok(3));
    }

    #[test]
    #[should_panic(expected = "closure failed")]
    fn proxy_propagates_panics() {
        let mut runtime = Runtime::new();
        let id = runtime.mount();

        let proxy = runtime
            .render(id, |cx| use_stable_callback(cx, |()| -> u8 { panic!("closure failed") }))
            .unwrap();
        proxy.call(());
    }

    #[test]
    fn weak_proxy_lets_unmount_free_the_closure() {
        let mut runtime = Runtime::new();
        let id = runtime.mount();
        let own: Rc<RefCell<Option<WeakCallback<u32, u32>>>> = Rc::default();

        for _ in 0..2 {
            let previous = own.borrow().clone();
            let proxy = runtime
                .render(id, move |cx| {
                    // Recurses through its own proxy once it has one.
                    use_stable_callback(cx, move |n: u32| {
                        match previous.as_ref().and_then(WeakCallback::upgrade) {
                            Some(me) if n > 0 => n + me.call(n - 1),
                            _ => n,
                        }
                    })
                })
                .unwrap();
            *own.borrow_mut() = Some(proxy.downgrade());
        }

        let weak = own.borrow().clone().unwrap();
        assert_eq!(weak.upgrade().map(|me| me.call(3)), Some(6));

        assert!(runtime.unmount(id));
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn proxy_keeps_old_closure_until_commit() {
        let mut runtime = Runtime::new();
        let id = runtime.mount();
        let calls = Rc::new(Cell::new(0));

        let proxy = runtime
            .render(id, |cx| use_stable_callback(cx, |n: u32| n + 1))
            .unwrap();

        let counted = calls.clone();
        runtime
            .render_uncommitted(id, move |cx| {
                use_stable_callback(cx, move |n: u32| {
                    counted.set(counted.get() + 1);
                    n * 10
                })
            })
            .unwrap();
        assert_eq!(proxy.call(1), 2);

        runtime.commit(id).unwrap();
        assert_eq!(proxy.call(1), 10);
        assert_eq!(calls.get(), 1);
    }
}
