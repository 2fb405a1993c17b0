//! Benchmark for the reading-order sort over detector-sized region sets.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use docsift::{sort_reading_order, BBox, Region};

/// Deterministic pseudo-random region set (no RNG dependency).
fn region_set(count: usize) -> Vec<Region> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut regions = Vec::with_capacity(count);

    for i in 0..count {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let y1 = (state >> 33) as u32 % 3000;
        let x1 = (state >> 17) as u32 % 2000;
        regions.push(Region {
            label: if i % 7 == 0 { "Picture" } else { "Text" }.to_string(),
            bbox: BBox::new(x1, y1, x1 + 400, y1 + 60),
            confidence: 0.5,
        });
    }

    regions
}

fn bench_reading_order(c: &mut Criterion) {
    let small = region_set(32);
    let large = region_set(1024);

    c.bench_function("sort_reading_order/32", |b| {
        b.iter(|| sort_reading_order(black_box(small.clone())))
    });

    c.bench_function("sort_reading_order/1024", |b| {
        b.iter(|| sort_reading_order(black_box(large.clone())))
    });
}

criterion_group!(benches, bench_reading_order);
criterion_main!(benches);
