use std::{marker::PhantomData, sync::Arc};

use crate::{
  observer::Observer,
  producer::{CancelToken, Observable, Producer, SinkAndUpstream},
  sink::Sink,
};

/// Created by [`Observable::map`].
pub struct Map<S, F, B> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _marker: PhantomData<fn() -> B>,
}

impl<S: Clone, F: Clone, B> Clone for Map<S, F, B> {
  fn clone(&self) -> Self {
    Map { source: self.source.clone(), func: self.func.clone(), _marker: PhantomData }
  }
}

impl<S, F, B> Producer for Map<S, F, B>
where
  S: Producer,
  S::Item: 'static,
  S::Err: 'static,
  F: FnMut(S::Item) -> B + Send + 'static,
  B: 'static,
{
  type Item = B;
  type Err = S::Err;

  fn run<O>(self, observer: O, cancel: CancelToken) -> SinkAndUpstream
  where
    O: Observer<Item = B, Err = S::Err> + Send + 'static,
  {
    let sink = Arc::new(Sink::new(observer, cancel));
    let upstream =
      self.source.subscribe(MapObserver { sink: sink.clone(), func: self.func, _marker: PhantomData });
    SinkAndUpstream::new(sink, upstream)
  }
}

/// The observer `Map` subscribes its source with.
pub struct MapObserver<O, F, In> {
  sink: Arc<Sink<O>>,
  func: F,
  _marker: PhantomData<fn(In)>,
}

impl<O, F, In> Observer for MapObserver<O, F, In>
where
  O: Observer,
  F: FnMut(In) -> O::Item,
{
  type Item = In;
  type Err = O::Err;

  fn next(&mut self, value: In) {
    if !self.sink.is_disposed() {
      self.sink.forward_next((self.func)(value));
    }
  }

  fn error(self, err: O::Err) { self.sink.forward_error(err) }

  fn complete(self) { self.sink.forward_complete() }
}
