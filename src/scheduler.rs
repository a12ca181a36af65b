//! Schedulers order units of work.
//!
//! Only immediate scheduling exists here: work runs on the calling thread,
//! either right away or after the work that is currently running. There is
//! no time-based scheduling and no parallelism.

use std::sync::Arc;

use crate::disposable::{Cancelable, Disposable, SingleAssignmentDisposable};

mod current_thread;
pub use current_thread::CurrentThreadScheduler;

/// A scheduler that runs work without delay.
pub trait ImmediateScheduler {
  /// Runs `action` now or queues it, returning a handle to what it produces.
  ///
  /// Disposing a queued handle before the action ran skips the action.
  fn schedule<D, F>(&self, action: F) -> Scheduled<D>
  where
    F: FnOnce() -> D + 'static,
    D: Disposable + Send + Sync + 'static;
}

/// Handle to a unit of work handed to an [`ImmediateScheduler`].
pub enum Scheduled<D> {
  /// The action already ran, this is what it returned.
  Immediate(D),
  /// The action is queued (or ran later); its result is assigned into the
  /// slot when it runs.
  Queued(Arc<SingleAssignmentDisposable<D>>),
}

impl<D> Scheduled<D> {
  pub fn is_queued(&self) -> bool { matches!(self, Self::Queued(_)) }

  /// The action's result if it ran synchronously.
  pub fn into_immediate(self) -> Option<D> {
    match self {
      Self::Immediate(d) => Some(d),
      Self::Queued(_) => None,
    }
  }
}

impl<D: Clone> Clone for Scheduled<D> {
  fn clone(&self) -> Self {
    match self {
      Self::Immediate(d) => Self::Immediate(d.clone()),
      Self::Queued(item) => Self::Queued(item.clone()),
    }
  }
}

impl<D: Disposable> Disposable for Scheduled<D> {
  fn dispose(&self) {
    match self {
      Self::Immediate(d) => d.dispose(),
      Self::Queued(item) => item.dispose(),
    }
  }
}

/// A queued handle also reports the state of whatever was assigned into it,
/// so a finished nested subscription reads as disposed like a top-level one.
impl<D: Cancelable> Cancelable for Scheduled<D> {
  fn is_disposed(&self) -> bool {
    match self {
      Self::Immediate(d) => d.is_disposed(),
      Self::Queued(item) => item.is_disposed() || item.get().is_some_and(D::is_disposed),
    }
  }
}

impl<D> std::fmt::Debug for Scheduled<D>
where
  D: std::fmt::Debug,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Immediate(d) => f.debug_tuple("Immediate").field(d).finish(),
      Self::Queued(item) => f.debug_tuple("Queued").field(item).finish(),
    }
  }
}
