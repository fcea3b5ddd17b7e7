use criterion::{
    criterion_group, criterion_main, measurement::WallTime, BatchSize, BenchmarkGroup, Criterion,
};
use daryq::{DaryHeap, Handle, Heap, MinFirst};
use rand::{rngs::StdRng, Rng, SeedableRng};

const ELEMENTS: usize = 10_000;

fn random_values(seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..ELEMENTS).map(|_| rng.gen()).collect()
}

fn push_pop<const D: usize>(group: &mut BenchmarkGroup<WallTime>, name: &str) {
    let values = random_values(1);
    group.bench_function(name, |b| {
        b.iter_batched(
            || values.clone(),
            |values| {
                let mut heap: DaryHeap<u64, MinFirst, D> = DaryHeap::with_capacity(values.len());
                for value in values {
                    heap.insert(value).unwrap();
                }
                while heap.extract_top().is_ok() {}
            },
            BatchSize::SmallInput,
        )
    });
}

fn decrease_key<const D: usize>(group: &mut BenchmarkGroup<WallTime>, name: &str) {
    let values = random_values(2);
    group.bench_function(name, |b| {
        b.iter_batched(
            || {
                let mut heap: DaryHeap<u64, MinFirst, D> = DaryHeap::with_capacity(values.len());
                let handles: Vec<Handle> = values
                    .iter()
                    .map(|value| heap.insert(*value).unwrap())
                    .collect();
                (heap, handles)
            },
            |(mut heap, handles)| {
                for (i, handle) in handles.iter().enumerate() {
                    let current = *heap.get(handle).unwrap();
                    heap.increase(handle, current / 2 + i as u64 % 3).unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn heap_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");
    push_pop::<2>(&mut group, "binary");
    push_pop::<4>(&mut group, "quaternary");
    push_pop::<8>(&mut group, "octonary");
    group.finish();

    let mut group = c.benchmark_group("decrease_key");
    decrease_key::<2>(&mut group, "binary");
    decrease_key::<4>(&mut group, "quaternary");
    group.finish();
}

criterion_group!(benches, heap_bench);
criterion_main!(benches);
