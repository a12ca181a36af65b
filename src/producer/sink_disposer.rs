//! The latch-once disposer handed out by every subscribe call.
//!
//! A subscription handle exists before the sink and upstream link it controls
//! have been built. The disposer bridges that gap with two flags in one atomic
//! word:
//!
//! | previous state seen by | `Cancelled` set       | `Latched` set          |
//! |------------------------|-----------------------|------------------------|
//! | `latch`                | latch releases now    | fatal: latched twice   |
//! | `dispose`              | no-op                 | dispose releases now   |
//!
//! Each side sets its own bit with a single `fetch_or` and branches on the
//! value it replaced, so exactly one of them performs the release and the
//! other returns without blocking.

use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
  },
};

use crate::{
  disposable::{take_cell::TakeCell, BoxedDisposable, Cancelable, Disposable},
  error::{fatal, LifecycleViolation},
  logging::{debug, trace},
};

const CANCELLED: u32 = 0b01;
const LATCHED: u32 = 0b10;

/// Logical state of a [`SinkDisposer`]. Bits are only ever added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposeState {
  Open,
  Cancelled,
  Latched,
  /// Both flags set, release of the handles has been claimed.
  Terminal,
}

impl DisposeState {
  fn from_bits(bits: u32) -> Self {
    match bits & (CANCELLED | LATCHED) {
      0 => Self::Open,
      CANCELLED => Self::Cancelled,
      LATCHED => Self::Latched,
      _ => Self::Terminal,
    }
  }
}

/// Owns a subscription's sink and upstream link and releases both exactly
/// once, whichever of `latch` and `dispose` happens last.
pub struct SinkDisposer<S = BoxedDisposable, U = BoxedDisposable> {
  state: AtomicU32,
  handles: TakeCell<(S, U)>,
}

impl<S: Disposable, U: Disposable> SinkDisposer<S, U> {
  pub fn new() -> Self { Self { state: AtomicU32::new(0), handles: TakeCell::new() } }

  /// Hands the freshly built `sink` and `upstream` over to the disposer.
  ///
  /// If the subscription was cancelled while they were being built, both are
  /// disposed before this returns.
  ///
  /// # Panics
  ///
  /// Panics with [`LifecycleViolation::LatchedTwice`] on a second call.
  pub fn latch(&self, sink: S, upstream: U) {
    // The handles are published before the flag, a `dispose` that sees
    // `LATCHED` is guaranteed to find them.
    if self.handles.put((sink, upstream)).is_err() {
      fatal(LifecycleViolation::LatchedTwice);
    }
    let previous = self.state.fetch_or(LATCHED, Ordering::AcqRel);
    if previous & LATCHED != 0 {
      fatal(LifecycleViolation::LatchedTwice);
    }
    if previous & CANCELLED != 0 {
      debug!("subscription cancelled before latch, releasing on arrival");
      if let Some((sink, upstream)) = self.handles.take() {
        sink.dispose();
        upstream.dispose();
      }
    }
  }

  pub fn state(&self) -> DisposeState { DisposeState::from_bits(self.state.load(Ordering::Acquire)) }
}

impl<S: Disposable, U: Disposable> Default for SinkDisposer<S, U> {
  fn default() -> Self { Self::new() }
}

impl<S: Disposable, U: Disposable> Disposable for SinkDisposer<S, U> {
  fn dispose(&self) {
    let previous = self.state.fetch_or(CANCELLED, Ordering::AcqRel);
    if previous & CANCELLED != 0 {
      return;
    }
    if previous & LATCHED != 0 {
      let Some((sink, upstream)) = self.handles.take() else {
        fatal(LifecycleViolation::MissingHandles)
      };
      trace!("releasing latched sink and upstream");
      sink.dispose();
      upstream.dispose();
    }
  }
}

impl<S: Disposable, U: Disposable> Cancelable for SinkDisposer<S, U> {
  #[inline]
  fn is_disposed(&self) -> bool { self.state.load(Ordering::Acquire) & CANCELLED != 0 }
}

impl<S, U> Debug for SinkDisposer<S, U> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SinkDisposer")
      .field("state", &DisposeState::from_bits(self.state.load(Ordering::Acquire)))
      .field("holds_handles", &self.handles.is_filled())
      .finish()
  }
}

/// The view of a [`SinkDisposer`] given to `Producer::run`.
///
/// It can cancel the subscription under construction, but cannot latch it:
/// latching is the subscribe glue's job.
#[derive(Clone)]
pub struct CancelToken(Arc<SinkDisposer>);

impl CancelToken {
  pub(crate) fn new(disposer: Arc<SinkDisposer>) -> Self { Self(disposer) }
}

impl Disposable for CancelToken {
  #[inline]
  fn dispose(&self) { self.0.dispose() }
}

impl Cancelable for CancelToken {
  #[inline]
  fn is_disposed(&self) -> bool { self.0.is_disposed() }
}

impl Debug for CancelToken {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("CancelToken").field(&self.0).finish()
  }
}

#[cfg(test)]
mod tests {
  use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Barrier,
    thread,
  };

  use super::*;
  use crate::disposable::test_util::CountingDisposable;

  type Disposer = SinkDisposer<CountingDisposable, CountingDisposable>;

  fn stubs() -> (CountingDisposable, CountingDisposable) {
    (CountingDisposable::default(), CountingDisposable::default())
  }

  #[test]
  fn latch_then_dispose() {
    let (sink, upstream) = stubs();
    let disposer = Disposer::new();
    assert_eq!(disposer.state(), DisposeState::Open);

    disposer.latch(sink.clone(), upstream.clone());
    assert_eq!(disposer.state(), DisposeState::Latched);
    assert!(!disposer.is_disposed());
    assert_eq!((sink.count(), upstream.count()), (0, 0));

    disposer.dispose();
    assert_eq!(disposer.state(), DisposeState::Terminal);
    assert!(disposer.is_disposed());
    assert_eq!((sink.count(), upstream.count()), (1, 1));
  }

  #[test]
  fn dispose_is_idempotent() {
    let (sink, upstream) = stubs();
    let disposer = Disposer::new();
    disposer.latch(sink.clone(), upstream.clone());
    for _ in 0..5 {
      disposer.dispose();
    }
    assert_eq!((sink.count(), upstream.count()), (1, 1));
  }

  #[test]
  fn dispose_before_latch_releases_on_latch() {
    let (sink, upstream) = stubs();
    let disposer = Disposer::new();
    disposer.dispose();
    disposer.dispose();
    assert_eq!(disposer.state(), DisposeState::Cancelled);
    assert!(disposer.is_disposed());

    disposer.latch(sink.clone(), upstream.clone());
    assert_eq!(disposer.state(), DisposeState::Terminal);
    assert_eq!((sink.count(), upstream.count()), (1, 1));

    disposer.dispose();
    assert_eq!((sink.count(), upstream.count()), (1, 1));
  }

  #[test]
  #[should_panic(expected = "already latched")]
  fn latch_twice_is_fatal() {
    let disposer = Disposer::new();
    let (sink, upstream) = stubs();
    disposer.latch(sink.clone(), upstream.clone());
    disposer.latch(sink, upstream);
  }

  #[test]
  fn latch_twice_after_release_is_fatal() {
    let disposer = Disposer::new();
    let (sink, upstream) = stubs();
    disposer.latch(sink.clone(), upstream.clone());
    disposer.dispose();

    let second = catch_unwind(AssertUnwindSafe(|| disposer.latch(sink.clone(), upstream.clone())));
    let message = second.unwrap_err();
    let message = message.downcast_ref::<String>().unwrap();
    assert_eq!(message, &LifecycleViolation::LatchedTwice.to_string());
    assert_eq!((sink.count(), upstream.count()), (1, 1));
  }

  #[test]
  fn release_happens_outside_any_lock() {
    // The sink cancels its own disposer while it is being released.
    let disposer: Arc<SinkDisposer> = Arc::new(SinkDisposer::new());
    let counter = CountingDisposable::default();
    let c_disposer = disposer.clone();
    let c_counter = counter.clone();
    let sink = crate::disposable::AnonymousDisposable::new(move || {
      c_disposer.dispose();
      c_counter.dispose();
    });
    disposer.latch(Box::new(sink), Box::new(()));
    disposer.dispose();
    assert_eq!(counter.count(), 1);
    assert_eq!(disposer.state(), DisposeState::Terminal);
  }

  #[test]
  fn concurrent_latch_and_dispose_release_once() {
    for _ in 0..1_000 {
      let disposer = Arc::new(Disposer::new());
      let (sink, upstream) = stubs();
      let barrier = Arc::new(Barrier::new(3));

      let latcher = {
        let disposer = disposer.clone();
        let barrier = barrier.clone();
        let (sink, upstream) = (sink.clone(), upstream.clone());
        thread::spawn(move || {
          barrier.wait();
          disposer.latch(sink, upstream);
        })
      };
      let cancellers: Vec<_> = (0..2)
        .map(|_| {
          let disposer = disposer.clone();
          let barrier = barrier.clone();
          thread::spawn(move || {
            barrier.wait();
            disposer.dispose();
          })
        })
        .collect();

      latcher.join().unwrap();
      cancellers.into_iter().for_each(|c| c.join().unwrap());

      assert_eq!(disposer.state(), DisposeState::Terminal);
      assert_eq!((sink.count(), upstream.count()), (1, 1));
    }
  }

  #[test]
  fn debug_shows_state() {
    let disposer = Disposer::new();
    let (sink, upstream) = stubs();
    disposer.latch(sink, upstream);
    assert_eq!(format!("{disposer:?}"), "SinkDisposer { state: Latched, holds_handles: true }");
  }
}
