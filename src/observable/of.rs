use std::{convert::Infallible, sync::Arc};

use crate::{
  observer::Observer,
  producer::{CancelToken, Producer, SinkAndUpstream},
  sink::Sink,
};

/// Creates an observable producing a single value, then completing.
///
/// # Examples
///
/// ```
/// use rxlatch::prelude::*;
///
/// observable::of(123).subscribe_next(|v| println!("{v}"));
/// ```
pub fn of<Item>(value: Item) -> Of<Item> { Of(value) }

#[derive(Clone)]
pub struct Of<Item>(Item);

impl<Item: 'static> Producer for Of<Item> {
  type Item = Item;
  type Err = Infallible;

  fn run<O>(self, observer: O, cancel: CancelToken) -> SinkAndUpstream
  where
    O: Observer<Item = Item, Err = Infallible> + Send + 'static,
  {
    let sink = Arc::new(Sink::new(observer, cancel));
    sink.forward_next(self.0);
    sink.forward_complete();
    SinkAndUpstream::new(sink, ())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[test]
  fn emits_then_completes() {
    let log = Arc::new(Mutex::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    let subscription = observable::of(100).subscribe_all(
      move |v| l1.lock().unwrap().push(v),
      |_| {},
      move || l2.lock().unwrap().push(-1),
    );
    assert_eq!(*log.lock().unwrap(), vec![100, -1]);
    assert!(subscription.is_disposed());
  }
}
