use super::{BoxedDisposable, Disposable};

/// Owns disposables and releases all of them when it goes out of scope.
///
/// Implements the [must_use](
/// https://doc.rust-lang.org/reference/attributes/diagnostics.html
/// #the-must_use-attribute)
/// attribute
///
/// **Attention:** an unbound bag is dropped on the spot, which disposes what
/// was inserted right away.
#[derive(Default)]
#[must_use]
pub struct DisposeBag(Vec<BoxedDisposable>);

impl DisposeBag {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, disposable: impl Disposable + Send + Sync + 'static) {
    self.0.push(Box::new(disposable));
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl Extend<BoxedDisposable> for DisposeBag {
  fn extend<T: IntoIterator<Item = BoxedDisposable>>(&mut self, iter: T) { self.0.extend(iter) }
}

impl Drop for DisposeBag {
  fn drop(&mut self) {
    for disposable in self.0.drain(..) {
      disposable.dispose();
    }
  }
}
