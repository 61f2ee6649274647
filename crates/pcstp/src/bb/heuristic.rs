//! The primal-heuristic phase: the shared per-node heuristic call
//! (`run_primal_heuristic`, dapcstp's `perturbedPrimalHeur`) and the
//! initial multi-root sweep run once before branch-and-bound begins
//! (`init_heur`).

use crate::dual_ascent::da_r;
use crate::instance::Instance;
use crate::options::Options;
use crate::primal::{perturb_costs, prim_i, set_support_graph};
use crate::solution::Solution;
use rand::rngs::StdRng;

/// Builds a primal candidate on `inst`'s support graph (optionally
/// perturbed), the same call `process` makes per node and `init_heur`
/// makes per seed root.
pub fn run_primal_heuristic(inst: &Instance, cr: &[f64], dasat: f64, incumbent: Option<&Solution>, opts: &Options, rng: &mut StdRng) -> Solution {
    let support = if opts.heursupportg { set_support_graph(inst, cr, dasat) } else { inst.c.clone() };
    let cost = if opts.perturbedheur {
        perturb_costs(inst, &support, incumbent, opts.resolved_heureps(inst.is_int), rng)
    } else {
        support
    };
    let r = inst.r.expect("run_primal_heuristic requires a rooted instance");
    prim_i(inst, r, &cost)
}

/// Candidate roots for the initial sweep and for `processRoots`: terminals
/// (or, for asymmetric instances, every live node), sorted by revenue
/// descending.
pub fn sorted_list_potential_roots(inst: &Instance) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..inst.n).filter(|&i| !inst.f0[i] && (inst.is_asym || inst.t[i])).collect();
    candidates.sort_by(|&a, &b| inst.p[b].partial_cmp(&inst.p[a]).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Runs one or more seed-root heuristic passes (`initHeur`'s non-bigM
/// path), returning the best feasible candidate found, if any.
pub fn init_heur(instance: &Instance, opts: &Options, rng: &mut StdRng) -> Option<Solution> {
    let roots: Vec<usize> = match instance.r {
        Some(r) => vec![r],
        None => sorted_list_potential_roots(instance).into_iter().take(opts.heurroots.max(1)).collect(),
    };

    let mut best: Option<Solution> = None;
    for k in roots {
        let mut trial = instance.clone();
        trial.r = Some(k);
        trial.f1[k] = true;
        trial.t[k] = true;

        let dasat = opts.resolved_dasat(trial.is_int);
        let da = da_r(&trial, f64::INFINITY, false, opts.absgap, best.as_ref());
        let candidate = run_primal_heuristic(&trial, &da.cr, dasat, best.as_ref(), opts, rng);
        if !candidate.validate(&trial) {
            continue;
        }
        if best.as_ref().map_or(true, |b| candidate.obj < b.obj) {
            best = Some(candidate);
        }
    }
    best
}

/// Restricts `base` to the union of arcs (and their antiparallel twins)
/// appearing in `solutions`, for the inner, time-limited B&B `initHeur`
/// runs when `heurbb` is enabled.
pub fn restrict_to_solution_union(base: &Instance, solutions: &[Solution]) -> Instance {
    let mut restricted = base.clone();
    let mut keep = vec![false; restricted.m];
    for sol in solutions {
        for ij in 0..sol.arcs.len().min(restricted.m) {
            if sol.arcs[ij] {
                keep[ij] = true;
                if let Some(op) = restricted.opposite[ij] {
                    keep[op] = true;
                }
            }
        }
    }
    for ij in 0..restricted.m {
        if !keep[ij] && !restricted.fe0[ij] {
            restricted.del_arc(ij);
        }
    }
    restricted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ArcInput;
    use rand::SeedableRng;

    fn path_012() -> Instance {
        let arcs = vec![ArcInput::new(0, 1, 1.0), ArcInput::new(1, 2, 2.0), ArcInput::new(0, 2, 10.0)];
        Instance::build(
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
        .unwrap()
    }

    #[test]
    fn init_heur_finds_the_cheap_path_on_a_rooted_instance() {
        let inst = path_012();
        let opts = Options::default();
        let mut rng = StdRng::seed_from_u64(1);
        let sol = init_heur(&inst, &opts, &mut rng).expect("feasible candidate");
        assert!(sol.obj <= 10.0);
    }

    #[test]
    fn sorted_list_potential_roots_orders_by_revenue_descending() {
        let arcs = vec![ArcInput::new(0, 1, 1.0), ArcInput::new(1, 0, 1.0)];
        let inst = Instance::build(
            2,
            arcs,
            vec![1.0, 5.0],
            vec![true, true],
            vec![false; 2],
            vec![false; 2],
            None,
            false,
            true,
            false,
        )
        .unwrap();
        assert_eq!(sorted_list_potential_roots(&inst), vec![1, 0]);
    }

    #[test]
    fn restrict_to_solution_union_keeps_only_used_arcs_and_their_twins() {
        let arcs = vec![ArcInput::new(0, 1, 1.0, ), ArcInput::new(1, 0, 1.0)];
        let mut inst = Instance::build(
            2,
            arcs,
            vec![0.0; 2],
            vec![false; 2],
            vec![false; 2],
            vec![false; 2],
            Some(0),
            true,
            true,
            false,
        )
        .unwrap();
        inst.opposite[0] = Some(1);
        inst.opposite[1] = Some(0);
        let mut sol = Solution::empty(&inst);
        sol.arcs[0] = true;
        let restricted = restrict_to_solution_union(&inst, &[sol]);
        assert!(!restricted.fe0[0]);
        assert!(!restricted.fe0[1]);
    }
}
