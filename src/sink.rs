//! Per-subscription forwarding state.
//!
//! A [`Sink`] sits between a producer and its observer. It is the `sink` half
//! of what `Producer::run` returns, and it is what makes cancellation visible
//! to emitters: once the sink or its [`CancelToken`] is disposed, nothing more
//! reaches the observer.

use std::{
  cell::{RefCell, RefMut},
  fmt::{Debug, Formatter},
  sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::ReentrantMutex;

use crate::{
  disposable::{Cancelable, Disposable},
  error::{fatal, LifecycleViolation},
  observer::Observer,
  producer::CancelToken,
};

/// Forwards notifications to an observer until the subscription ends.
///
/// Notifications must follow the Rx grammar. Emissions from different threads
/// are serialized by a lock held while the observer runs. An observer that
/// emits back into its own sink from inside a notification panics with
/// [`LifecycleViolation::ReentrantEmission`] instead of deadlocking.
///
/// The sink owns a [`CancelToken`], which keeps its disposer alive, and the
/// disposer holds the latched sink. A subscription that never terminates and
/// is never disposed therefore stays alive after its handle is dropped. Ending
/// the subscription either way breaks the cycle.
pub struct Sink<O> {
  observer: ReentrantMutex<RefCell<Option<O>>>,
  cancel: CancelToken,
  disposed: AtomicBool,
}

impl<O: Observer> Sink<O> {
  pub fn new(observer: O, cancel: CancelToken) -> Self {
    Self {
      observer: ReentrantMutex::new(RefCell::new(Some(observer))),
      cancel,
      disposed: AtomicBool::new(false),
    }
  }

  pub fn forward_next(&self, value: O::Item) {
    if self.is_disposed() {
      return;
    }
    let guard = self.observer.lock();
    if let Some(observer) = borrow_observer(&guard).as_mut() {
      observer.next(value);
    };
  }

  /// Delivers the error, then cancels the subscription.
  pub fn forward_error(&self, err: O::Err) {
    if let Some(observer) = self.take_observer() {
      observer.error(err);
    }
    self.cancel.dispose();
  }

  /// Delivers completion, then cancels the subscription.
  pub fn forward_complete(&self) {
    if let Some(observer) = self.take_observer() {
      observer.complete();
    }
    self.cancel.dispose();
  }

  fn take_observer(&self) -> Option<O> {
    if self.is_disposed() {
      return None;
    }
    let guard = self.observer.lock();
    let observer = borrow_observer(&guard).take();
    observer
  }
}

// The lock is reentrant, so a second borrow can only come from the thread
// that is already inside the observer.
fn borrow_observer<O>(cell: &RefCell<Option<O>>) -> RefMut<'_, Option<O>> {
  match cell.try_borrow_mut() {
    Ok(observer) => observer,
    Err(_) => fatal(LifecycleViolation::ReentrantEmission),
  }
}

impl<O> Sink<O> {
  /// `true` once the sink was released or its subscription cancelled.
  pub fn is_disposed(&self) -> bool {
    self.disposed.load(Ordering::Acquire) || self.cancel.is_disposed()
  }

  pub fn cancel_token(&self) -> &CancelToken { &self.cancel }
}

impl<O> Disposable for Sink<O> {
  #[inline]
  fn dispose(&self) { self.disposed.store(true, Ordering::Release) }
}

impl<O> Cancelable for Sink<O> {
  #[inline]
  fn is_disposed(&self) -> bool { Sink::is_disposed(self) }
}

impl<O> Debug for Sink<O> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Sink").field("is_disposed", &Sink::is_disposed(self)).finish()
  }
}
