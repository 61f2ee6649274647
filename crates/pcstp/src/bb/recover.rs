//! Recovery: mapping a reduced-instance solution back onto the original
//! (pre-reduction) graph via the contraction log.
//!
//! Node indices are never renumbered by reduction (`Instance::n` is fixed
//! for the lifetime of an instance and every clone descended from it; only
//! `f0` marks a node dead), and arc indices below the original `m` keep
//! their original identity too (reduction only ever appends new arcs, via
//! `push_arc`, never renumbers). So a solution built on a heavily reduced
//! `Instance` already uses original-compatible indices for everything it
//! selects directly; what recovery restores is the *membership* lost to
//! contraction: nodes and connecting arcs folded into a survivor never got
//! a chance to be individually selected in the reduced instance's own
//! index space.
//!
//! Recomputing the final objective must happen against the pristine
//! original instance, not the reduced one: the reduced instance's `offset`
//! already accounts for a contracted connecting arc's cost, so re-marking
//! that arc selected and summing costs against the *reduced* instance would
//! double-count it. The pristine instance has no offset and no excluded
//! arcs, so summing against it is correct by construction.

use crate::instance::Instance;
use crate::solution::Solution;

/// Marks `sol` as needing `recover_partial_sol` before it is final.
pub fn gen_partial_sol(sol: &Solution) -> Solution {
    let mut partial = sol.clone();
    partial.partial = true;
    partial
}

/// Expands `sol` (found on `reduced`, a descendant of `pristine` reached by
/// some sequence of reductions) back onto `pristine`. Walks
/// `reduced.contractions` in reverse, and whenever a contraction's survivor
/// ended up selected, reinstates its absorbed original nodes and the
/// connecting arc the contraction deleted (which carries no live index in
/// `reduced` at all, so must come from the log rather than from `sol`
/// itself). `bmna`/`bmaa` are not consulted here: they are informational
/// back-mapping, not the recovery mechanism (see `instance::backmap`).
pub fn recover_partial_sol(pristine: &Instance, reduced: &Instance, sol: &Solution) -> Solution {
    let mut out = Solution::empty(pristine);
    out.r = sol.r;

    for i in 0..pristine.n.min(sol.nodes.len()) {
        out.nodes[i] = sol.nodes[i];
    }
    for ij in 0..pristine.m.min(sol.arcs.len()) {
        out.arcs[ij] = sol.arcs[ij];
    }

    for c in reduced.contractions.iter().rev() {
        if !out.nodes.get(c.survivor).copied().unwrap_or(false) {
            continue;
        }
        for &absorbed in &c.absorbed_original_nodes {
            if absorbed < out.nodes.len() {
                out.nodes[absorbed] = true;
            }
        }
        for &orig_arc in &c.arc_original_ids {
            if orig_arc < out.arcs.len() {
                out.arcs[orig_arc] = true;
            }
        }
    }

    resolve_antiparallel(pristine, &mut out);
    out.derive_nodes_from_arcs(pristine);
    out.recompute_objective(pristine);
    out.partial = false;
    out
}

/// For every antiparallel pair both marked selected, keeps only the
/// cheaper arc (ties broken by lower index) so the recovered arc set is a
/// tree rather than a two-cycle.
fn resolve_antiparallel(inst: &Instance, sol: &mut Solution) {
    for ij in 0..sol.arcs.len().min(inst.m) {
        if !sol.arcs[ij] {
            continue;
        }
        let Some(ji) = inst.opposite[ij] else { continue };
        if ji <= ij || ji >= sol.arcs.len() || !sol.arcs[ji] {
            continue;
        }
        if inst.c[ji] < inst.c[ij] || (inst.c[ji] == inst.c[ij] && ji < ij) {
            sol.arcs[ij] = false;
        } else {
            sol.arcs[ji] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ArcInput;

    #[test]
    fn recovery_reinstates_a_contracted_required_leaf() {
        // 0 -> 1, node 1 terminal and degree-1: NTD1 contracts it into 0.
        let arcs = vec![ArcInput::new(0, 1, 5.0)];
        let pristine = Instance::build(
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
        let mut reduced = pristine.clone();
        assert!(reduced.ntd1());
        assert!(reduced.f0[1]);
        assert_eq!(reduced.offset, 5.0);

        let mut sol = Solution::root_only(&reduced, 0);
        sol.obj = reduced.offset;
        let recovered = recover_partial_sol(&pristine, &reduced, &gen_partial_sol(&sol));
        assert!(recovered.nodes[1]);
        assert!(recovered.arcs[0]);
        assert!(recovered.validate(&pristine));
        assert_eq!(recovered.obj, 5.0);
    }

    #[test]
    fn recovery_of_an_uncontracted_solution_is_a_no_op() {
        let arcs = vec![ArcInput::new(0, 1, 2.0), ArcInput::new(1, 2, 2.0)];
        let pristine = Instance::build(
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
        let mut sol = Solution::empty(&pristine);
        sol.r = Some(0);
        sol.arcs[0] = true;
        sol.arcs[1] = true;
        sol.derive_nodes_from_arcs(&pristine);
        sol.recompute_objective(&pristine);
        let recovered = recover_partial_sol(&pristine, &pristine, &gen_partial_sol(&sol));
        assert_eq!(recovered.obj, sol.obj);
        assert!(recovered.validate(&pristine));
    }

    #[test]
    fn antiparallel_pair_both_selected_keeps_only_the_cheaper() {
        let arcs = vec![ArcInput::new(0, 1, 3.0), ArcInput::new(1, 0, 1.0)];
        let mut pristine = Instance::build(
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
        pristine.opposite[0] = Some(1);
        pristine.opposite[1] = Some(0);
        let mut sol = Solution::empty(&pristine);
        sol.r = Some(0);
        sol.arcs[0] = true;
        sol.arcs[1] = true;
        let recovered = recover_partial_sol(&pristine, &pristine, &gen_partial_sol(&sol));
        assert_ne!(recovered.arcs[0], recovered.arcs[1]);
        assert!(recovered.arcs[1]);
    }
}
