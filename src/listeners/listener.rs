//! # Listener trait.
//!
//! A [`Listener`] reacts to an emitted payload by producing a fresh future.
//! The emitter never polls that future itself: the future is handed to the
//! scheduler, which runs it once a slot is free.
//!
//! The common handle type is [`ListenerRef`], an `Arc<dyn Listener<T>>` that
//! doubles as the listener's identity for removal.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::TaskError;

/// Boxed future returned by [`Listener::call`].
pub type BoxListenerFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Shared listener handle. Two handles denote the same listener iff they point
/// to the same allocation (see [`same_listener`]).
pub type ListenerRef<T> = Arc<dyn Listener<T>>;

/// # Asynchronous event handler.
///
/// # Example
/// ```
/// use queue_emitter::{BoxListenerFuture, Listener, TaskError};
///
/// struct Audit;
///
/// impl Listener<String> for Audit {
///     fn name(&self) -> &str { "audit" }
///
///     fn call(&self, payload: String) -> BoxListenerFuture {
///         Box::pin(async move {
///             if payload.is_empty() {
///                 return Err(TaskError::fail("empty payload"));
///             }
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Listener<T>: Send + Sync + 'static {
    /// Returns a human-readable listener name used in runtime events.
    fn name(&self) -> &str;

    /// Creates the future that handles one emitted payload.
    ///
    /// Called when the task is started by the scheduler, not at emit time.
    fn call(&self, payload: T) -> BoxListenerFuture;
}

/// Returns `true` if both handles refer to the same listener allocation.
///
/// Only the data pointer is compared; vtable pointers of the same type may
/// differ between codegen units.
#[inline]
pub fn same_listener<T>(a: &ListenerRef<T>, b: &ListenerRef<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
