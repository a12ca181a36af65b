use std::{
  fmt::{Debug, Formatter},
  sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;

use super::{Cancelable, Disposable};

/// Runs a teardown closure the first time it is disposed.
///
/// # Examples
///
/// ```rust
/// use rxlatch::prelude::*;
///
/// let teardown = AnonymousDisposable::new(|| println!("released"));
/// teardown.dispose();
/// teardown.dispose(); // no-op
/// assert!(teardown.is_disposed());
/// ```
pub struct AnonymousDisposable {
  disposed: AtomicBool,
  action: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl AnonymousDisposable {
  pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
    Self { disposed: AtomicBool::new(false), action: Mutex::new(Some(Box::new(action))) }
  }
}

impl Disposable for AnonymousDisposable {
  fn dispose(&self) {
    if self.disposed.swap(true, Ordering::AcqRel) {
      return;
    }
    // The guard is released before the closure runs, it may dispose `self`
    // again.
    let action = self.action.lock().take();
    if let Some(action) = action {
      action();
    }
  }
}

impl Cancelable for AnonymousDisposable {
  #[inline]
  fn is_disposed(&self) -> bool { self.disposed.load(Ordering::Acquire) }
}

impl Debug for AnonymousDisposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AnonymousDisposable").field("is_disposed", &self.is_disposed()).finish()
  }
}
