//! Observer trait and closure adapters
//!
//! The Observer is the consumer end of a subscription: it receives zero or
//! more `next` values followed by at most one terminal `error` or `complete`.

use std::marker::PhantomData;

/// The consumer of data in reactive programming.
pub trait Observer {
  type Item;
  type Err;

  /// Receive the next value.
  fn next(&mut self, value: Self::Item);

  /// Receive a terminal error. Consumes the observer, nothing can follow it.
  fn error(self, err: Self::Err);

  /// Receive completion. Consumes the observer, nothing can follow it.
  fn complete(self);
}

// ============================================================================
// ObserverAll - Closure adapter
// ============================================================================

/// Observer built from three closures, one per notification kind.
pub struct ObserverAll<N, E, C, Item, Err> {
  next: N,
  error: E,
  complete: C,
  _marker: PhantomData<fn(Item, Err)>,
}

impl<N, E, C, Item, Err> ObserverAll<N, E, C, Item, Err>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  pub fn new(next: N, error: E, complete: C) -> Self {
    Self { next, error, complete, _marker: PhantomData }
  }
}

impl<N, E, C, Item, Err> Observer for ObserverAll<N, E, C, Item, Err>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  type Item = Item;
  type Err = Err;

  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  #[inline]
  fn error(self, err: Err) { (self.error)(err) }

  #[inline]
  fn complete(self) { (self.complete)() }
}

/// Observer that only reacts to values, ignoring both terminal events.
pub struct NextObserver<N, Item, Err> {
  next: N,
  _marker: PhantomData<fn(Item, Err)>,
}

impl<N, Item, Err> NextObserver<N, Item, Err>
where
  N: FnMut(Item),
{
  pub fn new(next: N) -> Self { Self { next, _marker: PhantomData } }
}

impl<N, Item, Err> Observer for NextObserver<N, Item, Err>
where
  N: FnMut(Item),
{
  type Item = Item;
  type Err = Err;

  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  #[inline]
  fn error(self, _err: Err) {}

  #[inline]
  fn complete(self) {}
}
