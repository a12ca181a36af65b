use std::fmt::{Debug, Formatter};

use parking_lot::Mutex;
use smallvec::SmallVec;

use super::{BoxedDisposable, Cancelable, Disposable};

/// Identifies a member of a [`CompositeDisposable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisposeKey(usize);

/// A group of disposables released together.
///
/// # Design
///
/// - **SmallVec Optimization**: members live in a `SmallVec<[_; 2]>`, most
///   groups hold a source subscription and at most one extra resource.
/// - **Late members**: adding to a group that was already disposed disposes
///   the newcomer immediately and returns `None`.
/// - Members are disposed outside the lock, a member may touch the group
///   again from its own `dispose`.
#[derive(Default)]
pub struct CompositeDisposable(Mutex<Members>);

#[derive(Default)]
struct Members {
  next_id: usize,
  disposed: bool,
  items: SmallVec<[(usize, BoxedDisposable); 2]>,
}

impl CompositeDisposable {
  pub fn new() -> Self { Self::default() }

  /// Adds a member, returning the key to remove it with later.
  pub fn add(&self, disposable: impl Disposable + Send + Sync + 'static) -> Option<DisposeKey> {
    let mut members = self.0.lock();
    if members.disposed {
      drop(members);
      disposable.dispose();
      return None;
    }
    let id = members.next_id;
    members.next_id += 1;
    members.items.push((id, Box::new(disposable)));
    Some(DisposeKey(id))
  }

  /// Removes a member and disposes it. Returns `false` if the key was not
  /// found, either because it was removed before or the group is disposed.
  pub fn remove(&self, key: DisposeKey) -> bool {
    let removed = {
      let mut members = self.0.lock();
      let position = members.items.iter().position(|(id, _)| *id == key.0);
      position.map(|pos| members.items.remove(pos).1)
    };
    match removed {
      Some(disposable) => {
        disposable.dispose();
        true
      }
      None => false,
    }
  }

  pub fn len(&self) -> usize { self.0.lock().items.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Disposable for CompositeDisposable {
  fn dispose(&self) {
    let items = {
      let mut members = self.0.lock();
      if members.disposed {
        return;
      }
      members.disposed = true;
      std::mem::take(&mut members.items)
    };
    for (_, disposable) in items {
      disposable.dispose();
    }
  }
}

impl Cancelable for CompositeDisposable {
  fn is_disposed(&self) -> bool { self.0.lock().disposed }
}

impl Debug for CompositeDisposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let members = self.0.lock();
    f.debug_struct("CompositeDisposable")
      .field("is_disposed", &members.disposed)
      .field("len", &members.items.len())
      .finish()
  }
}
