//! # rxlatch: the subscription lifecycle of Reactive Extensions
//!
//! The substrate every Rx operator stands on: creating a subscription,
//! binding its sink and upstream link together, and tearing it down exactly
//! once no matter which thread cancels it or when.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxlatch::prelude::*;
//!
//! let subscription = observable::from_iter(0..10)
//!   .map(|v| v * 2)
//!   .subscribe_next(|v| println!("Value: {}", v));
//!
//! // Disposing is idempotent and safe from any thread.
//! subscription.dispose();
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Producer`] | Builds a subscription's sink and upstream link (`run`) |
//! | [`Observable`] | `subscribe` glue plus operators, implemented for every producer |
//! | [`SinkDisposer`] | Latch-once handle that releases sink and upstream exactly once |
//! | [`CurrentThreadScheduler`] | Per-thread trampoline that flattens nested subscribes |
//! | [`Disposable`] / [`Cancelable`] | The teardown contracts |
//!
//! ## Feature Flags
//!
//! - **`tracing`** (default): lifecycle events through the `tracing` crate
//!
//! [`Producer`]: producer::Producer
//! [`Observable`]: producer::Observable
//! [`SinkDisposer`]: producer::SinkDisposer
//! [`CurrentThreadScheduler`]: scheduler::CurrentThreadScheduler
//! [`Disposable`]: disposable::Disposable
//! [`Cancelable`]: disposable::Cancelable

mod logging;

pub mod disposable;
pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod producer;
pub mod scheduler;
pub mod sink;

pub use prelude::*;
