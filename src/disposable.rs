//! Disposable and Cancelable contracts
//!
//! A [`Disposable`] releases whatever it stands for when `dispose` is called.
//! Every implementation in this crate is idempotent: only the first call has
//! an effect. A [`Cancelable`] additionally reports whether it was disposed.
//!
//! Both traits take `&self` so a handle can be shared (`Arc`) and disposed
//! from any thread while another thread is still constructing or emitting.

use std::sync::Arc;

mod anonymous;
mod bag;
mod boolean;
mod composite;
mod single_assignment;
pub(crate) mod take_cell;

pub use anonymous::AnonymousDisposable;
pub use bag::DisposeBag;
pub use boolean::BooleanDisposable;
pub use composite::{CompositeDisposable, DisposeKey};
pub use single_assignment::SingleAssignmentDisposable;

/// Releases a resource. Calling `dispose` more than once must have the same
/// effect as calling it once.
pub trait Disposable {
  fn dispose(&self);
}

/// A [`Disposable`] whose disposal can be observed.
pub trait Cancelable: Disposable {
  /// `true` once `dispose` has been requested. This does not imply that the
  /// underlying resources are already released.
  fn is_disposed(&self) -> bool;
}

/// Type-erased, thread-safe disposable, the form sinks and upstream links
/// take once they are latched.
pub type BoxedDisposable = Box<dyn Disposable + Send + Sync>;

/// The no-op disposable.
impl Disposable for () {
  #[inline]
  fn dispose(&self) {}
}

impl<T: Disposable + ?Sized> Disposable for Box<T> {
  #[inline]
  fn dispose(&self) { (**self).dispose() }
}

impl<T: Cancelable + ?Sized> Cancelable for Box<T> {
  #[inline]
  fn is_disposed(&self) -> bool { (**self).is_disposed() }
}

impl<T: Disposable + ?Sized> Disposable for Arc<T> {
  #[inline]
  fn dispose(&self) { (**self).dispose() }
}

impl<T: Cancelable + ?Sized> Cancelable for Arc<T> {
  #[inline]
  fn is_disposed(&self) -> bool { (**self).is_disposed() }
}

impl<T: Disposable> Disposable for Option<T> {
  #[inline]
  fn dispose(&self) {
    if let Some(inner) = self {
      inner.dispose();
    }
  }
}

impl<A: Disposable, B: Disposable> Disposable for (A, B) {
  fn dispose(&self) {
    self.0.dispose();
    self.1.dispose();
  }
}
