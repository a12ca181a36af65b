//! Current-thread trampoline.
//!
//! The first piece of work scheduled on an idle thread runs immediately and
//! "opens" the trampoline. Anything scheduled while it runs, directly or by
//! its offspring, is appended to a per-thread FIFO queue and run after the
//! current piece finishes. A chain of N synchronously nested subscriptions
//! therefore runs as N loop iterations instead of N nested stack frames.
//!
//! # Thread Safety
//!
//! The queue and running flag live in thread-local storage. Every thread has
//! its own independent trampoline; work never migrates between threads and
//! nothing ever blocks.

use std::{
  cell::{Cell, RefCell},
  collections::VecDeque,
  sync::Arc,
};

use super::{ImmediateScheduler, Scheduled};
use crate::{
  disposable::{Cancelable, Disposable, SingleAssignmentDisposable},
  logging::trace,
};

struct QueuedAction {
  handle: Arc<dyn Cancelable>,
  action: Box<dyn FnOnce()>,
}

struct Trampoline {
  running: Cell<bool>,
  queue: RefCell<VecDeque<QueuedAction>>,
}

thread_local! {
  static TRAMPOLINE: Trampoline = const {
    Trampoline { running: Cell::new(false), queue: RefCell::new(VecDeque::new()) }
  };
}

/// Closes the trampoline when the outermost action returns or unwinds.
struct RunningGuard<'a>(&'a Trampoline);

impl Drop for RunningGuard<'_> {
  fn drop(&mut self) {
    // Work left behind by a panic is discarded with its handles unassigned.
    let abandoned = std::mem::take(&mut *self.0.queue.borrow_mut());
    self.0.running.set(false);
    drop(abandoned);
  }
}

impl Trampoline {
  fn drain(&self) {
    loop {
      // The borrow must end before the action runs, it may enqueue more work.
      let next = self.queue.borrow_mut().pop_front();
      let Some(QueuedAction { handle, action }) = next else { break };
      if handle.is_disposed() {
        trace!("skipping trampolined action disposed before it ran");
        continue;
      }
      action();
    }
  }
}

/// A zero-sized handle to the calling thread's trampoline.
///
/// All instances on the same thread share the same queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentThreadScheduler;

impl CurrentThreadScheduler {
  /// `true` when the calling thread is not running trampolined work, so a
  /// newly scheduled action would run immediately.
  pub fn is_schedule_required() -> bool { TRAMPOLINE.with(|t| !t.running.get()) }

  /// Number of actions waiting on this thread's trampoline.
  pub fn pending() -> usize { TRAMPOLINE.with(|t| t.queue.borrow().len()) }
}

impl ImmediateScheduler for CurrentThreadScheduler {
  fn schedule<D, F>(&self, action: F) -> Scheduled<D>
  where
    F: FnOnce() -> D + 'static,
    D: Disposable + Send + Sync + 'static,
  {
    TRAMPOLINE.with(|trampoline| {
      if trampoline.running.get() {
        let handle = Arc::new(SingleAssignmentDisposable::new());
        let slot = handle.clone();
        trampoline.queue.borrow_mut().push_back(QueuedAction {
          handle: handle.clone(),
          action: Box::new(move || slot.set(action())),
        });
        return Scheduled::Queued(handle);
      }

      trace!("opening current-thread trampoline");
      trampoline.running.set(true);
      let _guard = RunningGuard(trampoline);
      let disposable = action();
      trampoline.drain();
      trace!("current-thread trampoline drained");
      Scheduled::Immediate(disposable)
    })
  }
}
