//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use general_scan::ops::{Histogram, Sum};
use general_scan::{GeneralScan, ScanConfig};

fn benchmark_sum_scan(c: &mut Criterion) {
    let mut data = vec![1i64; 1 << 20];
    data[0] = 100;
    let mut prefix = vec![0i64; data.len()];

    let mut group = c.benchmark_group("sum_scan_n=2^20");
    for threads in [1usize, 4, 16] {
        let config = ScanConfig::new().with_thread_budget(threads);
        group.bench_with_input(BenchmarkId::from_parameter(threads), &config, |b, config| {
            b.iter(|| {
                let mut heap = GeneralScan::with_config(&data, Sum::<i64>::new(), config.clone())
                    .expect("power of two input");
                heap.get_scan(&mut prefix).expect("scan succeeds");
                black_box(prefix[prefix.len() - 1]);
            });
        });
    }
    group.finish();
}

fn benchmark_histogram_reduction(c: &mut Criterion) {
    let data: Vec<i64> = (0..1i64 << 16).map(|x| x % 128).collect();

    c.bench_function("histogram_reduce_n=2^16", |b| {
        b.iter(|| {
            let mut heap =
                GeneralScan::new(&data, Histogram::default()).expect("power of two input");
            black_box(heap.reduction().expect("reduction succeeds"));
        });
    });
}

criterion_group!(benches, benchmark_sum_scan, benchmark_histogram_reduction);
criterion_main!(benches);
