//! # Function-backed listener (`ListenerFn`)
//!
//! [`ListenerFn`] wraps a closure `F: Fn(T) -> Fut`, producing a fresh future
//! per invocation. No state is shared between invocations unless the closure
//! captures it explicitly (e.g. an `Arc<Mutex<_>>`).
//!
//! ## Example
//! ```rust
//! use queue_emitter::{ListenerFn, ListenerRef, TaskError};
//!
//! let l: ListenerRef<u32> = ListenerFn::arc("printer", |n: u32| async move {
//!     println!("got {n}");
//!     Ok::<_, TaskError>(())
//! });
//!
//! assert_eq!(l.name(), "printer");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::error::TaskError;
use crate::listeners::listener::{BoxListenerFuture, Listener};

/// Function-backed listener implementation.
#[derive(Debug)]
pub struct ListenerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ListenerFn<F> {
    /// Creates a new function-backed listener.
    ///
    /// Prefer [`ListenerFn::arc`] when you immediately need a [`ListenerRef`](crate::ListenerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the listener and returns it as a shared handle.
    ///
    /// Keep the returned `Arc` around if the listener must be removed later:
    /// removal matches on this allocation.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<T, F, Fut> Listener<T> for ListenerFn<F>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, payload: T) -> BoxListenerFuture {
        Box::pin((self.f)(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::{ListenerRef, same_listener};

    #[tokio::test]
    async fn test_call_produces_fresh_future() {
        let l: ListenerRef<i32> = ListenerFn::arc("neg", |n: i32| async move {
            if n < 0 {
                Err(TaskError::fail("negative"))
            } else {
                Ok::<_, TaskError>(())
            }
        });

        assert!(l.call(1).await.is_ok());
        assert_eq!(l.call(-1).await, Err(TaskError::fail("negative")));
    }

    #[test]
    fn test_identity_is_per_allocation() {
        let a: ListenerRef<()> = ListenerFn::arc("a", |_: ()| async { Ok::<_, TaskError>(()) });
        let b: ListenerRef<()> = ListenerFn::arc("a", |_: ()| async { Ok::<_, TaskError>(()) });
        let a2 = Arc::clone(&a);

        assert!(same_listener(&a, &a2));
        assert!(!same_listener(&a, &b));
    }
}
