use std::{
  marker::PhantomData,
  ptr,
  sync::atomic::{AtomicPtr, Ordering},
};

/// A lock-free cell that can be filled once and emptied once.
///
/// `put` publishes the value with release semantics and `take` claims it with
/// acquire semantics, so whichever thread wins `take` observes the value fully
/// written and becomes its sole owner. Neither operation ever blocks.
pub(crate) struct TakeCell<T> {
  ptr: AtomicPtr<T>,
  _owns: PhantomData<*mut T>,
}

// SAFETY: the cell only moves `T` between threads, it never hands out shared
// references to it, so `T: Send` is sufficient for both.
unsafe impl<T: Send> Send for TakeCell<T> {}
unsafe impl<T: Send> Sync for TakeCell<T> {}

impl<T> TakeCell<T> {
  pub(crate) const fn new() -> Self { Self { ptr: AtomicPtr::new(ptr::null_mut()), _owns: PhantomData } }

  /// Stores `value`, or gives it back if the cell is currently filled.
  pub(crate) fn put(&self, value: T) -> Result<(), T> {
    let raw = Box::into_raw(Box::new(value));
    match self.ptr.compare_exchange(ptr::null_mut(), raw, Ordering::AcqRel, Ordering::Acquire) {
      Ok(_) => Ok(()),
      // SAFETY: `raw` was never published, this thread still owns it.
      Err(_) => Err(*unsafe { Box::from_raw(raw) }),
    }
  }

  pub(crate) fn take(&self) -> Option<T> {
    let raw = self.ptr.swap(ptr::null_mut(), Ordering::AcqRel);
    if raw.is_null() {
      None
    } else {
      // SAFETY: the swap removed the only published copy of `raw`.
      Some(*unsafe { Box::from_raw(raw) })
    }
  }

  pub(crate) fn is_filled(&self) -> bool { !self.ptr.load(Ordering::Acquire).is_null() }
}

impl<T> Default for TakeCell<T> {
  fn default() -> Self { Self::new() }
}

impl<T> Drop for TakeCell<T> {
  fn drop(&mut self) {
    let raw = *self.ptr.get_mut();
    if !raw.is_null() {
      // SAFETY: `&mut self` rules out any concurrent `take`.
      drop(unsafe { Box::from_raw(raw) });
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{sync::Arc, thread};

  use super::*;

  #[test]
  fn put_take_cycle() {
    let cell = TakeCell::new();
    assert!(!cell.is_filled());
    assert_eq!(cell.put(1), Ok(()));
    assert_eq!(cell.put(2), Err(2));
    assert!(cell.is_filled());
    assert_eq!(cell.take(), Some(1));
    assert_eq!(cell.take(), None);
    assert_eq!(cell.put(3), Ok(()));
  }

  #[test]
  fn drop_releases_value() {
    let value = Arc::new(());
    let cell = TakeCell::new();
    assert!(cell.put(value.clone()).is_ok());
    assert_eq!(Arc::strong_count(&value), 2);
    drop(cell);
    assert_eq!(Arc::strong_count(&value), 1);
  }

  #[test]
  fn concurrent_take_has_one_winner() {
    for _ in 0..200 {
      let cell = Arc::new(TakeCell::new());
      assert!(cell.put(7).is_ok());
      let handles: Vec<_> = (0..4)
        .map(|_| {
          let cell = cell.clone();
          thread::spawn(move || cell.take())
        })
        .collect();
      let won = handles.into_iter().filter_map(|h| h.join().unwrap()).count();
      assert_eq!(won, 1);
    }
  }
}
