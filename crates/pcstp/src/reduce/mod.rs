//! The reduction fixpoint cascade: `preprocess` runs the structural tests
//! (cost shift, degree reductions, articulation-point fixing/pruning)
//! ahead of the bound-based ones (LC, NR), repeating until nothing
//! changes.
//!
//! Cross-refs
//! - `dual_ascent::da_r` supplies the `cr`/`pi`/`lb` a caller threads into
//!   `bbred` for the LC pass.
//! - `bb::mod` calls `preprocess` at the root of every (sub)tree and,
//!   unless `redrootonly`, at every node.

mod cost_shift;
mod degree;
mod least_cost;
mod min_adjacency;
mod reachability;

use crate::instance::Instance;
use crate::options::Options;

/// Structural reductions only: cost shift, NTD1/NTD2, and the
/// articulation-point tests. Does not need a dual-ascent certificate and
/// is safe to run before one exists (e.g. at B&B root construction).
///
/// `recovery_mode` mirrors dapcstp's `bRecover` guard: during recovery
/// (replaying contractions back onto the original instance) neither NTD1
/// nor NTD2 nor MA may run, since they could trigger new contractions that
/// the back-mapping walk is not expecting.
pub fn preprocess(inst: &mut Instance, opts: &Options, recovery_mode: bool) -> bool {
    let mut changed = false;
    loop {
        let mut round = false;
        if opts.d1 && !recovery_mode && inst.ntd1() {
            round = true;
        }
        if opts.d2 && !recovery_mode && inst.ntd2() {
            round = true;
        }
        if inst.cost_shift() {
            round = true;
        }
        if inst.r.is_some() && inst.ap_fix() {
            round = true;
        }
        if opts.ma && !recovery_mode && inst.ma() {
            round = true;
        }
        if opts.ms && inst.r.is_some() && inst.ap_subtree_prune() {
            round = true;
        }
        if opts.ss && inst.r.is_some() && inst.ap_cutarc_prune() {
            round = true;
        }
        if opts.nr && inst.nr() {
            round = true;
        }
        if !round {
            break;
        }
        changed = true;
    }
    changed
}

/// Bound-based reductions driven by a dual-ascent certificate: LC
/// elimination followed by a non-reachability sweep, then re-running
/// `preprocess` since LC/NR can expose new structural opportunities.
pub fn bbred(
    inst: &mut Instance,
    opts: &Options,
    cr: &[f64],
    pi: &[f64],
    lb: f64,
    ub: f64,
    recovery_mode: bool,
) -> bool {
    let mut changed = false;
    if opts.lc && inst.lc(cr, pi, lb, ub, opts.absgap) {
        changed = true;
    }
    if opts.nr && inst.nr() {
        changed = true;
    }
    if preprocess(inst, opts, recovery_mode) {
        changed = true;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ArcInput;

    #[test]
    fn preprocess_collapses_path_into_cheapest_arc() {
        let arcs = vec![
            ArcInput::new(0, 1, 1.0),
            ArcInput::new(1, 2, 2.0),
            ArcInput::new(0, 2, 10.0),
        ];
        let mut inst = Instance::build(
            3,
            arcs,
            vec![0.0; 3],
            vec![false, false, true],
            vec![false; 3],
            vec![false; 3],
            Some(0),
            true,
            true,
            false,
        )
        .unwrap();
        let opts = Options::default();
        assert!(preprocess(&mut inst, &opts, false));
        let live: Vec<usize> = (0..inst.m).filter(|&ij| !inst.fe0[ij]).collect();
        assert_eq!(live.len(), 1);
        assert_eq!(inst.c[live[0]], 3.0);
    }

    #[test]
    fn preprocess_skips_ntd1_contraction_in_recovery_mode() {
        let arcs = vec![ArcInput::new(0, 1, 1.0)];
        let mut inst = Instance::build(
            2,
            arcs,
            vec![0.0; 2],
            vec![false, true],
            vec![false; 2],
            vec![false; 2],
            Some(0),
            true,
            true,
            false,
        )
        .unwrap();
        let opts = Options::default();
        // node 1 is a required degree-1 leaf: outside recovery mode NTD1
        // would contract it immediately, but recovery mode must not
        // trigger new contractions while a back-mapping walk is in flight.
        preprocess(&mut inst, &opts, true);
        assert!(!inst.f0[1]);

        assert!(preprocess(&mut inst, &opts, false));
        assert!(inst.f0[1]);
    }
}
