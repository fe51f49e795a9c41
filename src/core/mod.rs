//! Runtime core: the emitter facade and its wiring.
//!
//! The public API from this module is [`QueueEmitter`], built directly or via
//! [`EmitterBuilder`] from a [`Config`].
//!
//! Internal modules:
//! - [`bridge`]: maps original listeners to scheduler-submitting wrappers;
//! - [`emitter`]: the facade combining dispatcher, bridge and scheduler;
//! - [`forwarder`]: moves bus events to subscribers;
//! - [`builder`]: assembles the pieces.

mod bridge;
mod builder;
mod config;
mod emitter;
mod forwarder;

pub use bridge::RawListener;
pub use builder::EmitterBuilder;
pub use config::Config;
pub use emitter::QueueEmitter;
