use std::{
  fmt::{Debug, Formatter},
  sync::atomic::{AtomicU32, Ordering},
};

use once_cell::sync::OnceCell;

use super::{BoxedDisposable, Cancelable, Disposable};
use crate::error::{fatal, LifecycleViolation};

const DISPOSED: u32 = 0b01;
const ASSIGNED: u32 = 0b10;

/// A slot that accepts exactly one disposable.
///
/// Disposing the slot before anything was assigned is remembered: the value
/// passed to the later `set` is disposed on arrival instead of being stored.
/// The trampoline hands these out for work it has queued but not yet run.
///
/// The assigned value stays readable through [`get`](Self::get) after it was
/// disposed; `dispose` only needs a shared reference to it.
pub struct SingleAssignmentDisposable<D = BoxedDisposable> {
  state: AtomicU32,
  slot: OnceCell<D>,
}

impl<D: Disposable> SingleAssignmentDisposable<D> {
  pub fn new() -> Self { Self { state: AtomicU32::new(0), slot: OnceCell::new() } }

  /// Assigns the underlying disposable.
  ///
  /// # Panics
  ///
  /// Panics with [`LifecycleViolation::AssignedTwice`] when called twice.
  pub fn set(&self, disposable: D) {
    if self.slot.set(disposable).is_err() {
      fatal(LifecycleViolation::AssignedTwice);
    }
    let previous = self.state.fetch_or(ASSIGNED, Ordering::AcqRel);
    if previous & ASSIGNED != 0 {
      fatal(LifecycleViolation::AssignedTwice);
    }
    if previous & DISPOSED != 0 {
      if let Some(disposable) = self.slot.get() {
        disposable.dispose();
      }
    }
  }

  pub fn is_assigned(&self) -> bool { self.state.load(Ordering::Acquire) & ASSIGNED != 0 }

  /// The assigned disposable, once `set` has published it.
  pub fn get(&self) -> Option<&D> {
    if self.is_assigned() { self.slot.get() } else { None }
  }
}

impl<D: Disposable> Default for SingleAssignmentDisposable<D> {
  fn default() -> Self { Self::new() }
}

impl<D: Disposable> Disposable for SingleAssignmentDisposable<D> {
  fn dispose(&self) {
    let previous = self.state.fetch_or(DISPOSED, Ordering::AcqRel);
    if previous & DISPOSED != 0 {
      return;
    }
    if previous & ASSIGNED != 0 {
      match self.slot.get() {
        Some(disposable) => disposable.dispose(),
        None => fatal(LifecycleViolation::MissingHandles),
      }
    }
  }
}

impl<D: Disposable> Cancelable for SingleAssignmentDisposable<D> {
  #[inline]
  fn is_disposed(&self) -> bool { self.state.load(Ordering::Acquire) & DISPOSED != 0 }
}

impl<D> Debug for SingleAssignmentDisposable<D> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let state = self.state.load(Ordering::Acquire);
    f.debug_struct("SingleAssignmentDisposable")
      .field("is_disposed", &(state & DISPOSED != 0))
      .field("is_assigned", &(state & ASSIGNED != 0))
      .finish()
  }
}
