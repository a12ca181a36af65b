//! Source observables.
//!
//! These are the leaves a subscription chain is built on. Each is a
//! [`Producer`](crate::producer::Producer) whose `run` emits through a
//! [`Sink`](crate::sink::Sink), so cancellation requested while a source is
//! still emitting stops it before the next value.

mod create;
mod from_iter;
mod of;
mod trivial;

pub use create::{create, Create, Emitter};
pub use from_iter::{from_iter, FromIter};
pub use of::{of, Of};
pub use trivial::{empty, never, throw, Empty, Never, Throw};
