//! The subscribe entry point.
//!
//! Every observable in this crate is a [`Producer`]: it knows how to build a
//! subscription's sink and upstream link (`run`) and nothing more. The
//! [`Observable`] extension trait adds the shared `subscribe` glue:
//!
//! 1. Enter the current-thread trampoline. An idle thread runs the body right
//!    away; a thread already running trampolined work queues it instead, so
//!    subscriptions opened from inside another subscription's construction
//!    are flattened rather than nested on the stack.
//! 2. Create a fresh [`SinkDisposer`].
//! 3. Call `run` with a [`CancelToken`] for that disposer. `run` may emit,
//!    subscribe to other producers and even cancel its own token.
//! 4. Latch the returned sink and upstream into the disposer.
//! 5. Hand the disposer back as the subscription handle.

use std::{marker::PhantomData, sync::Arc};

mod sink_disposer;
pub use sink_disposer::{CancelToken, DisposeState, SinkDisposer};

use crate::{
  disposable::{BoxedDisposable, Disposable},
  observer::{NextObserver, Observer, ObserverAll},
  ops::map::Map,
  scheduler::{CurrentThreadScheduler, ImmediateScheduler, Scheduled},
};

/// The handle returned by `subscribe`.
///
/// `Immediate` holds the disposer itself. `Queued` is returned by nested
/// subscribes whose body the trampoline deferred; disposing it before the body
/// ran skips the body, disposing it afterwards disposes the disposer.
pub type Subscription = Scheduled<Arc<SinkDisposer>>;

/// What `Producer::run` builds for one subscription.
pub struct SinkAndUpstream {
  pub sink: BoxedDisposable,
  pub upstream: BoxedDisposable,
}

impl SinkAndUpstream {
  pub fn new(
    sink: impl Disposable + Send + Sync + 'static,
    upstream: impl Disposable + Send + Sync + 'static,
  ) -> Self {
    Self { sink: Box::new(sink), upstream: Box::new(upstream) }
  }
}

/// A stream definition that can build subscriptions.
///
/// A producer holds no per-subscription state: each `run` builds a fresh sink
/// and upstream link. `run` consumes the producer, clone it to subscribe more
/// than once.
pub trait Producer: Sized + 'static {
  type Item;
  type Err;

  /// Builds the sink and upstream link for one subscription.
  ///
  /// `cancel` belongs to the disposer that will own the result. It may be
  /// disposed from inside `run`; the result is then released as soon as it is
  /// latched.
  fn run<O>(self, observer: O, cancel: CancelToken) -> SinkAndUpstream
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + Send + 'static;
}

/// Subscribe glue and operators available on every [`Producer`].
pub trait Observable: Producer {
  /// Subscribes `observer` and returns the handle that cancels it.
  ///
  /// On a thread that is not already running trampolined work the
  /// subscription is built before this returns, and the handle is
  /// [`Scheduled::Immediate`] holding its [`SinkDisposer`]. Called from
  /// inside another subscription's construction, the build is queued and the
  /// handle is [`Scheduled::Queued`]: the disposer is assigned into it once
  /// the queued build runs, which happens before the outermost `subscribe`
  /// returns. Disposing a queued handle early skips the build. Both forms
  /// report `is_disposed` from the same disposer state.
  fn subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + Send + 'static,
  {
    CurrentThreadScheduler.schedule(move || {
      let disposer = Arc::new(SinkDisposer::new());
      let SinkAndUpstream { sink, upstream } = self.run(observer, CancelToken::new(disposer.clone()));
      disposer.latch(sink, upstream);
      disposer
    })
  }

  /// Subscribes with a closure for values, ignoring errors and completion.
  fn subscribe_next<N>(self, next: N) -> Subscription
  where
    N: FnMut(Self::Item) + Send + 'static,
    Self::Item: 'static,
    Self::Err: 'static,
  {
    self.subscribe(NextObserver::new(next))
  }

  /// Subscribes with one closure per notification kind.
  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> Subscription
  where
    N: FnMut(Self::Item) + Send + 'static,
    E: FnOnce(Self::Err) + Send + 'static,
    C: FnOnce() + Send + 'static,
    Self::Item: 'static,
    Self::Err: 'static,
  {
    self.subscribe(ObserverAll::new(next, error, complete))
  }

  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  fn map<B, F>(self, f: F) -> Map<Self, F, B>
  where
    F: FnMut(Self::Item) -> B + Send + 'static,
  {
    Map { source: self, func: f, _marker: PhantomData }
  }
}

impl<P: Producer> Observable for P {}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
  };

  use super::*;
  use crate::{disposable::test_util::CountingDisposable, disposable::Cancelable, sink::Sink};

  /// Emits one value during `run`, then hands back counting stubs.
  #[derive(Clone)]
  struct Stubbed {
    sink: CountingDisposable,
    upstream: CountingDisposable,
    cancel_during_run: bool,
  }

  impl Producer for Stubbed {
    type Item = i32;
    type Err = ();

    fn run<O>(self, mut observer: O, cancel: CancelToken) -> SinkAndUpstream
    where
      O: Observer<Item = i32, Err = ()> + Send + 'static,
    {
      observer.next(1);
      if self.cancel_during_run {
        cancel.dispose();
        assert!(cancel.is_disposed());
      }
      SinkAndUpstream::new(self.sink, self.upstream)
    }
  }

  fn stubbed(cancel_during_run: bool) -> Stubbed {
    Stubbed { sink: CountingDisposable::default(), upstream: CountingDisposable::default(), cancel_during_run }
  }

  #[test]
  fn subscribe_then_dispose_releases_once() {
    let producer = stubbed(false);
    let received = Arc::new(AtomicUsize::new(0));
    let c_received = received.clone();

    let subscription = producer.clone().subscribe_next(move |_| {
      c_received.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(received.load(Ordering::SeqCst), 1);
    assert!(!subscription.is_queued());
    assert!(!subscription.is_disposed());

    subscription.dispose();
    assert_eq!((producer.sink.count(), producer.upstream.count()), (1, 1));
    subscription.dispose();
    assert_eq!((producer.sink.count(), producer.upstream.count()), (1, 1));
    assert_eq!(subscription.into_immediate().unwrap().state(), DisposeState::Terminal);
  }

  #[test]
  fn cancel_inside_run_releases_at_latch() {
    let producer = stubbed(true);
    let subscription = producer.clone().subscribe_next(|_| {});
    assert!(subscription.is_disposed());
    assert_eq!((producer.sink.count(), producer.upstream.count()), (1, 1));
    subscription.dispose();
    assert_eq!((producer.sink.count(), producer.upstream.count()), (1, 1));
  }

  #[test]
  fn terminal_during_run_releases_sink() {
    struct CompletesInRun;
    impl Producer for CompletesInRun {
      type Item = ();
      type Err = ();
      fn run<O>(self, observer: O, cancel: CancelToken) -> SinkAndUpstream
      where
        O: Observer<Item = (), Err = ()> + Send + 'static,
      {
        let sink = Arc::new(Sink::new(observer, cancel));
        sink.forward_complete();
        SinkAndUpstream::new(sink, ())
      }
    }

    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    let subscription = CompletesInRun.subscribe_all(|_| {}, |_| {}, move || *c_completed.lock().unwrap() = true);
    assert!(*completed.lock().unwrap());
    assert!(subscription.is_disposed());
    assert_eq!(subscription.into_immediate().unwrap().state(), DisposeState::Terminal);
  }
}
