use std::{convert::Infallible, sync::Arc};

use crate::{
  observer::Observer,
  producer::{CancelToken, Producer, SinkAndUpstream},
  sink::Sink,
};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error.
/// Iteration stops as soon as the subscription is disposed, including from
/// inside the observer.
///
/// # Examples
///
/// ```
/// use rxlatch::prelude::*;
///
/// observable::from_iter(0..10).subscribe_next(|v| println!("{v},"));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> FromIter<Iter>
where
  Iter: IntoIterator,
{
  FromIter(iter)
}

#[derive(Clone)]
pub struct FromIter<Iter>(Iter);

impl<Iter> Producer for FromIter<Iter>
where
  Iter: IntoIterator + 'static,
  Iter::Item: 'static,
{
  type Item = Iter::Item;
  type Err = Infallible;

  fn run<O>(self, observer: O, cancel: CancelToken) -> SinkAndUpstream
  where
    O: Observer<Item = Iter::Item, Err = Infallible> + Send + 'static,
  {
    let sink = Arc::new(Sink::new(observer, cancel));
    for value in self.0 {
      if sink.is_disposed() {
        break;
      }
      sink.forward_next(value);
    }
    sink.forward_complete();
    SinkAndUpstream::new(sink, ())
  }
}
