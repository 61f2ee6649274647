//! Criterion microbenches for a full `BbTree::solve` on small fixed
//! instances, tracking end-to-end wall-clock rather than any one internal
//! routine.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use pcstp::bb::BbTree;
use pcstp::instance::{ArcInput, Instance};
use pcstp::memory::NullMemoryProbe;
use pcstp::options::{Limits, Options};
use std::time::Duration;

/// A grid of `side * side` nodes with unit arc costs and a handful of
/// high-revenue terminals scattered across it, rooted at the corner.
fn grid_instance(side: usize) -> Instance {
    let n = side * side;
    let idx = |r: usize, c: usize| r * side + c;
    let mut arcs = Vec::new();
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                arcs.push(ArcInput::new(idx(r, c), idx(r, c + 1), 1.0));
                arcs.push(ArcInput::new(idx(r, c + 1), idx(r, c), 1.0));
            }
            if r + 1 < side {
                arcs.push(ArcInput::new(idx(r, c), idx(r + 1, c), 1.0));
                arcs.push(ArcInput::new(idx(r + 1, c), idx(r, c), 1.0));
            }
        }
    }
    let mut revenue = vec![0.0; n];
    let mut terminal = vec![false; n];
    for &(r, c) in &[(0, side - 1), (side - 1, 0), (side - 1, side - 1)] {
        revenue[idx(r, c)] = 20.0;
        terminal[idx(r, c)] = true;
    }
    Instance::build(n, arcs, revenue, terminal, vec![false; n], vec![false; n], Some(0), true, true, false).unwrap()
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(20);
    for side in [3usize, 4] {
        let inst = grid_instance(side);
        group.bench_function(format!("grid_{side}x{side}"), |b| {
            b.iter_batched(
                || inst.clone(),
                |snapshot| {
                    let mut solver = BbTree::new(Options::default());
                    let limits = Limits { time_lim: Duration::from_secs(5), ..Limits::default() };
                    solver.solve(snapshot, limits, &mut NullMemoryProbe).solution.map(|s| s.obj)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
