//! # Listener abstractions.
//!
//! This module provides the listener-related types:
//! - [`Listener`] - trait for async handlers invoked with an event payload
//! - [`ListenerFn`] - closure-backed listener implementation
//! - [`ListenerRef`] - shared reference to a listener (`Arc<dyn Listener<T>>`)
//!
//! A [`ListenerRef`] is also the listener's identity: registration and removal
//! compare the `Arc` allocation, not the closure's behavior.

mod listener;
mod listener_fn;

pub use listener::{BoxListenerFuture, Listener, ListenerRef, same_listener};
pub use listener_fn::ListenerFn;
