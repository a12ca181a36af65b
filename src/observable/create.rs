use std::{
  fmt::{Debug, Formatter},
  marker::PhantomData,
  sync::Arc,
};

use crate::{
  disposable::Disposable,
  observer::Observer,
  producer::{CancelToken, Producer, SinkAndUpstream},
  sink::Sink,
};

/// Creates an observable from a subscribe function.
///
/// `subscribe` receives an [`Emitter`] and returns the teardown for whatever
/// it set up; that teardown becomes the subscription's upstream link and is
/// disposed when the subscription ends. The emitter may be moved to another
/// thread and used after `subscribe` returned.
///
/// # Examples
///
/// ```rust
/// use rxlatch::prelude::*;
///
/// let subscription = observable::create(|emitter: Emitter<i32, ()>| {
///   emitter.next(1);
///   emitter.next(2);
///   emitter.complete();
///   AnonymousDisposable::new(|| println!("torn down"))
/// })
/// .subscribe_next(|v| println!("{v}"));
/// assert!(subscription.is_disposed());
/// ```
pub fn create<Item, Err, F, D>(subscribe: F) -> Create<F, Item, Err>
where
  F: FnOnce(Emitter<Item, Err>) -> D,
  D: Disposable + Send + Sync + 'static,
{
  Create { subscribe, _marker: PhantomData }
}

pub struct Create<F, Item, Err> {
  subscribe: F,
  _marker: PhantomData<fn(Item, Err)>,
}

impl<F: Clone, Item, Err> Clone for Create<F, Item, Err> {
  fn clone(&self) -> Self { Create { subscribe: self.subscribe.clone(), _marker: PhantomData } }
}

impl<F, Item, Err, D> Producer for Create<F, Item, Err>
where
  F: FnOnce(Emitter<Item, Err>) -> D + 'static,
  D: Disposable + Send + Sync + 'static,
  Item: 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  fn run<O>(self, observer: O, cancel: CancelToken) -> SinkAndUpstream
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    let sink = Arc::new(Sink::new(observer, cancel));
    let upstream = (self.subscribe)(Emitter(sink.clone()));
    SinkAndUpstream::new(sink, upstream)
  }
}

trait EmitTarget<Item, Err>: Send + Sync {
  fn next(&self, value: Item);
  fn error(&self, err: Err);
  fn complete(&self);
  fn is_disposed(&self) -> bool;
}

impl<O> EmitTarget<O::Item, O::Err> for Sink<O>
where
  O: Observer + Send,
{
  fn next(&self, value: O::Item) { self.forward_next(value) }
  fn error(&self, err: O::Err) { self.forward_error(err) }
  fn complete(&self) { self.forward_complete() }
  fn is_disposed(&self) -> bool { Sink::is_disposed(self) }
}

/// The emitting end handed to a [`create`] function.
///
/// Hides the concrete observer type behind a trait object so the subscribe
/// function does not depend on it. Emitting after the subscription ended is a
/// no-op.
pub struct Emitter<Item, Err>(Arc<dyn EmitTarget<Item, Err>>);

impl<Item, Err> Emitter<Item, Err> {
  pub fn next(&self, value: Item) { self.0.next(value) }

  pub fn error(&self, err: Err) { self.0.error(err) }

  pub fn complete(&self) { self.0.complete() }

  /// `true` once nothing emitted here reaches the observer anymore.
  pub fn is_disposed(&self) -> bool { self.0.is_disposed() }
}

impl<Item, Err> Clone for Emitter<Item, Err> {
  fn clone(&self) -> Self { Emitter(self.0.clone()) }
}

impl<Item, Err> Debug for Emitter<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Emitter").field("is_disposed", &self.is_disposed()).finish()
  }
}
