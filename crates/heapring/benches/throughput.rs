use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use heapring::{tasks, Config, MemorySink, RingBuffer, Strategy};
use std::sync::Arc;

const RECORDS: usize = 100_000;

fn bench_single_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_segment");
    group.throughput(Throughput::Elements(RECORDS as u64));

    group.bench_function("semaphore", |b| {
        b.iter(|| {
            let buffer = Arc::new(RingBuffer::new(Config::single(1024)).unwrap());
            let (sink, _) = tasks::run_pipeline(buffer, RECORDS, MemorySink::new()).unwrap();
            assert_eq!(sink.cells().len(), RECORDS);
        });
    });

    group.bench_function("condvar", |b| {
        b.iter(|| {
            let config = Config::single(1024).with_strategy(Strategy::CondVar);
            let buffer = Arc::new(RingBuffer::new(config).unwrap());
            let (sink, _) = tasks::run_pipeline(buffer, RECORDS, MemorySink::new()).unwrap();
            assert_eq!(sink.cells().len(), RECORDS);
        });
    });

    group.finish();
}

fn bench_pooled(c: &mut Criterion) {
    let mut group = c.benchmark_group("pooled");
    group.throughput(Throughput::Elements(RECORDS as u64));

    for pool_size in [2, 4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{pool_size}_segments")),
            &pool_size,
            |b, &pool_size| {
                b.iter(|| {
                    let buffer =
                        Arc::new(RingBuffer::new(Config::pooled(1024, pool_size)).unwrap());
                    let (sink, _) =
                        tasks::run_pipeline(buffer, RECORDS, MemorySink::new()).unwrap();
                    assert_eq!(sink.cells().len(), RECORDS);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_segment, bench_pooled);
criterion_main!(benches);
