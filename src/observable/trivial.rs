use std::{convert::Infallible, marker::PhantomData, sync::Arc};

use crate::{
  observer::Observer,
  producer::{CancelToken, Producer, SinkAndUpstream},
  sink::Sink,
};

/// Creates an observable that emits no items, just terminates with an error.
pub fn throw<Item, Err>(err: Err) -> Throw<Item, Err> { Throw(err, PhantomData) }

pub struct Throw<Item, Err>(Err, PhantomData<fn() -> Item>);

impl<Item, Err: Clone> Clone for Throw<Item, Err> {
  fn clone(&self) -> Self { Throw(self.0.clone(), PhantomData) }
}

impl<Item: 'static, Err: 'static> Producer for Throw<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn run<O>(self, observer: O, cancel: CancelToken) -> SinkAndUpstream
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    let sink = Arc::new(Sink::new(observer, cancel));
    sink.forward_error(self.0);
    SinkAndUpstream::new(sink, ())
  }
}

/// Creates an observable that produces no values and completes immediately.
///
/// # Examples
/// ```
/// use rxlatch::prelude::*;
///
/// observable::empty::<i32>().subscribe_next(|v| println!("{v},"));
///
/// // Result: nothing printed
/// ```
pub fn empty<Item>() -> Empty<Item> { Empty(PhantomData) }

pub struct Empty<Item>(PhantomData<fn() -> Item>);

impl<Item> Clone for Empty<Item> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

impl<Item: 'static> Producer for Empty<Item> {
  type Item = Item;
  type Err = Infallible;

  fn run<O>(self, observer: O, cancel: CancelToken) -> SinkAndUpstream
  where
    O: Observer<Item = Item, Err = Infallible> + Send + 'static,
  {
    let sink = Arc::new(Sink::new(observer, cancel));
    sink.forward_complete();
    SinkAndUpstream::new(sink, ())
  }
}

/// Creates an observable that never emits anything.
///
/// Neither emits a value, nor completes, nor emits an error. Its subscription
/// only ends when it is disposed.
pub fn never<Item>() -> Never<Item> { Never(PhantomData) }

pub struct Never<Item>(PhantomData<fn() -> Item>);

impl<Item> Clone for Never<Item> {
  fn clone(&self) -> Self { Never(PhantomData) }
}

impl<Item: 'static> Producer for Never<Item> {
  type Item = Item;
  type Err = Infallible;

  fn run<O>(self, observer: O, cancel: CancelToken) -> SinkAndUpstream
  where
    O: Observer<Item = Item, Err = Infallible> + Send + 'static,
  {
    SinkAndUpstream::new(Arc::new(Sink::new(observer, cancel)), ())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  };

  use crate::prelude::*;

  #[test]
  fn throw_delivers_error_only() {
    let value_count = Arc::new(AtomicUsize::new(0));
    let error = Arc::new(Mutex::new(None));
    let (c_count, c_error) = (value_count.clone(), error.clone());
    let subscription = observable::throw::<i32, _>("boom").subscribe_all(
      move |_| {
        c_count.fetch_add(1, Ordering::SeqCst);
      },
      move |e| *c_error.lock().unwrap() = Some(e),
      || panic!("completion after error"),
    );
    assert_eq!(value_count.load(Ordering::SeqCst), 0);
    assert_eq!(*error.lock().unwrap(), Some("boom"));
    assert!(subscription.is_disposed());
  }

  #[test]
  fn empty_completes() {
    let completed = Arc::new(AtomicUsize::new(0));
    let c_completed = completed.clone();
    observable::empty::<i32>().subscribe_all(
      |_| panic!("empty emitted a value"),
      |_| {},
      move || {
        c_completed.fetch_add(1, Ordering::SeqCst);
      },
    );
    assert_eq!(completed.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn never_stays_open_until_disposed() {
    let subscription = observable::never::<()>().subscribe_all(
      |_| panic!("never emitted a value"),
      |_| {},
      || panic!("never completed"),
    );
    assert!(!subscription.is_disposed());
    subscription.dispose();
    assert!(subscription.is_disposed());
  }
}
