use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sciset::{Dataset, IndexIterator, Slice};

fn grid(size: usize) -> Dataset<f64> {
    Dataset::from_fn(&[size, size], |p| (p[0] * size + p[1]) as f64)
}

fn bench_full_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_walk");
    for size in [100usize, 500, 1000] {
        group.throughput(Throughput::Elements((size * size) as u64));
        let a = grid(size);
        let t = a.get_transposed_view(&[]).unwrap();

        group.bench_with_input(BenchmarkId::new("contiguous", size), &size, |b, _| {
            b.iter(|| black_box(a.iterator(false).offsets().sum::<usize>()));
        });
        group.bench_with_input(BenchmarkId::new("transposed", size), &size, |b, _| {
            b.iter(|| black_box(t.iterator(false).offsets().sum::<usize>()));
        });
        group.bench_with_input(BenchmarkId::new("with_position", size), &size, |b, _| {
            b.iter(|| {
                let mut it = a.iterator(true);
                let mut acc = 0usize;
                while it.has_next() {
                    acc += it.pos().map_or(0, |p| p[0]);
                }
                black_box(acc)
            });
        });
    }
    group.finish();
}

fn bench_slicing(c: &mut Criterion) {
    let mut group = c.benchmark_group("slicing");
    let slices = [
        Some(Slice::new(None, None, 2).unwrap()),
        Some(Slice::new(None, None, -3).unwrap()),
    ];
    for size in [100usize, 500, 1000] {
        let a = grid(size);
        group.bench_with_input(BenchmarkId::new("get_slice", size), &size, |b, _| {
            b.iter(|| a.get_slice(&slices).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("set_slice", size), &size, |b, _| {
            let mut d = a.copy();
            b.iter(|| d.set_slice(1.0, &slices).unwrap());
        });
    }
    group.finish();
}

fn bench_masked(c: &mut Criterion) {
    let mut group = c.benchmark_group("masked");
    let mut rng = StdRng::seed_from_u64(0);
    for size in [100usize, 500] {
        let a = grid(size);
        let bits: Vec<bool> = (0..size * size).map(|_| rng.gen_bool(0.5)).collect();
        let mask = Dataset::from_vec(bits, &[size, size]).unwrap();
        let index = Dataset::from_fn(&[size * size / 4], |p| (p[0] * 4) as i64);

        group.bench_with_input(BenchmarkId::new("boolean", size), &size, |b, _| {
            b.iter(|| {
                let it = a.boolean_iterator(&mask, true).unwrap();
                black_box(it.offsets().count())
            });
        });
        group.bench_with_input(BenchmarkId::new("integer", size), &size, |b, _| {
            b.iter(|| {
                let it = a.integer_iterator(&index).unwrap();
                black_box(it.offsets().count())
            });
        });
    }
    group.finish();
}

fn bench_growth(c: &mut Criterion) {
    c.bench_function("set_extend_append_10k", |b| {
        b.iter(|| {
            let mut d = Dataset::<f64>::zeros(&[0]);
            for i in 0..10_000 {
                d.set_extend(&[i], i as f64).unwrap();
            }
            d
        });
    });
}

criterion_group!(benches, bench_full_walk, bench_slicing, bench_masked, bench_growth);
criterion_main!(benches);
