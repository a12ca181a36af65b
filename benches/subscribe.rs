use bencher::{benchmark_group, benchmark_main, Bencher};
use rxlatch::prelude::*;

fn latch_then_dispose(b: &mut Bencher) {
  b.iter(|| {
    let disposer: SinkDisposer<(), ()> = SinkDisposer::new();
    disposer.latch((), ());
    disposer.dispose();
    disposer.state()
  });
}

fn subscribe_then_dispose(b: &mut Bencher) {
  b.iter(|| {
    let subscription = observable::never::<i32>().subscribe_next(|_| {});
    subscription.dispose();
    subscription.is_disposed()
  });
}

fn map_chain_100(b: &mut Bencher) {
  b.iter(|| {
    observable::from_iter(0..100).map(|v| v + 1).map(|v| v * 2).subscribe_next(|_| {}).is_disposed()
  });
}

benchmark_group!(benches, latch_then_dispose, subscribe_then_dispose, map_chain_100);
benchmark_main!(benches);
