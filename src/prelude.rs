//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  disposable::{
    AnonymousDisposable, BooleanDisposable, BoxedDisposable, Cancelable, CompositeDisposable,
    DisposeBag, DisposeKey, Disposable, SingleAssignmentDisposable,
  },
  error::LifecycleViolation,
  observable::{self, Emitter},
  observer::{NextObserver, Observer, ObserverAll},
  producer::{
    CancelToken, DisposeState, Observable, Producer, SinkAndUpstream, SinkDisposer, Subscription,
  },
  scheduler::{CurrentThreadScheduler, ImmediateScheduler, Scheduled},
  sink::Sink,
};
