//! Criterion microbenches for `dual_ascent::da_r` on synthetic layered
//! instances of varying width, the reduction-cascade hot path.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use pcstp::dual_ascent::da_r;
use pcstp::instance::{ArcInput, Instance};

/// A rooted layered graph: `layers` levels of `width` nodes each, root at 0,
/// every node in a layer connected to every node in the next, plus a direct
/// root shortcut to the last layer so the bound has competing paths to
/// tighten against.
fn layered_instance(layers: usize, width: usize) -> Instance {
    let n = 1 + layers * width;
    let mut arcs = Vec::new();
    for j in 0..width {
        arcs.push(ArcInput::new(0, 1 + j, 2.0));
    }
    for l in 0..layers - 1 {
        for i in 0..width {
            for j in 0..width {
                let tail = 1 + l * width + i;
                let head = 1 + (l + 1) * width + j;
                arcs.push(ArcInput::new(tail, head, 1.0 + ((i + j) % 3) as f64));
            }
        }
    }
    let mut revenue = vec![0.0; n];
    let mut terminal = vec![false; n];
    for j in 0..width {
        let last = 1 + (layers - 1) * width + j;
        revenue[last] = 5.0;
        terminal[last] = true;
    }
    Instance::build(n, arcs, revenue, terminal, vec![false; n], vec![false; n], Some(0), true, true, false).unwrap()
}

fn bench_da_r(c: &mut Criterion) {
    let mut group = c.benchmark_group("dual_ascent");
    for width in [4usize, 8, 16] {
        let inst = layered_instance(6, width);
        group.throughput(Throughput::Elements(inst.m as u64));
        group.bench_function(format!("da_r_w{width}"), |b| {
            b.iter_batched(
                || inst.clone(),
                |snapshot| {
                    let result = da_r(&snapshot, f64::INFINITY, true, 1e-6, None);
                    result.lb
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_da_r);
criterion_main!(benches);
