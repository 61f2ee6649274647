//! The branch-and-bound driver: ties dual ascent, reduction, the primal
//! heuristics, and node storage together into `BbTree::solve`.
//!
//! Cross-refs
//! - `node` runs one node through reduce/bound/heuristic/classify.
//! - `queue` holds open nodes in the priority order `opts.nodeselect` picks.
//! - `heuristic` builds the initial incumbent and the inner heuristic B&B.
//! - `roots` enumerates candidate roots for an unrooted instance.
//! - `recover` maps a reduced-instance solution back onto the original
//!   graph before it is reported.

mod heuristic;
mod node;
mod queue;
mod recover;
mod roots;

pub use node::NodeState;

use crate::instance::Instance;
use crate::memory::MemoryProbe;
use crate::options::{Limits, NodeSelect, Options};
use crate::primal::dmst;
use crate::reduce::preprocess;
use crate::solution::Solution;
use crate::stats::{Stats, TerminationCause};
use node::{branch, process, BBNode, BranchOutcome, NodeState as State, ProcessOutcome};
use queue::NodeStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// The outcome of a full solve: the best solution found (mapped back onto
/// the original, pre-reduction graph) and the run's statistics.
#[derive(Debug)]
pub struct SolveReport {
    pub solution: Option<Solution>,
    pub stats: Stats,
}

/// Per-solve scratch shared between the root-enumeration and B&B phases:
/// the incumbent, the pool of accepted solutions `da_r` uses as guides, and
/// the running statistics.
struct Search {
    incumbent: Option<Solution>,
    pool: Vec<Solution>,
    stats: Stats,
}

impl Search {
    fn ub(&self) -> f64 {
        self.incumbent.as_ref().map_or(f64::INFINITY, |s| s.obj)
    }

    /// Validates and, if improving, accepts `candidate` (found on
    /// `source`) as the new incumbent, recovering it onto `pristine` first.
    /// Returns `true` if it became the new incumbent.
    fn offer(&mut self, pristine: &Instance, source: &Instance, candidate: Solution, at: Duration, limits: &Limits) -> bool {
        if !candidate.validate(source) {
            return false;
        }
        let recovered = recover::recover_partial_sol(pristine, source, &recover::gen_partial_sol(&candidate));
        if !recovered.validate(pristine) {
            return false;
        }
        self.pool.push(candidate);
        if recovered.obj < self.ub() - 1e-9 {
            self.incumbent = Some(recovered);
            self.stats.record_solution(self.ub(), at);
            let _ = limits;
            true
        } else {
            false
        }
    }
}

/// Configured driver for one solve. Mirrors `dapcstp`'s top-level `BBTree`:
/// holds the tunables and RNG state a solve needs, constructed once and
/// reused across calls if a caller wants to solve several instances with
/// the same `Options`.
pub struct BbTree {
    opts: Options,
    rng: StdRng,
}

impl BbTree {
    pub fn new(opts: Options) -> Self {
        let rng = StdRng::seed_from_u64(opts.seed);
        BbTree { opts, rng }
    }

    /// Runs the full solve: MWCS conversion, initial preprocessing, the
    /// heuristic phase, root enumeration for unrooted instances, and the
    /// main branch-and-bound loop, honoring `limits` throughout.
    pub fn solve(&mut self, instance: Instance, limits: Limits, memory: &mut dyn MemoryProbe) -> SolveReport {
        let start = Instant::now();
        let was_mwcs = instance.is_mwcs;

        let was_unrooted = instance.r.is_none();
        let mut working = instance;
        working.convert_mwcs_to_pcstp();
        let pristine = working.clone();

        let mut search = Search { incumbent: None, pool: Vec::new(), stats: Stats::default() };
        if let Some(cutup) = limits.cutup {
            search.incumbent = Some(Solution { nodes: vec![], arcs: vec![], r: None, obj: cutup, partial: false });
        }

        if self.opts.initprep {
            preprocess(&mut working, &self.opts, false);
        }

        info!(n = working.n, m = working.live_arc_count(), rooted = working.r.is_some(), "starting solve");

        self.run_heuristic_phase(&pristine, &working, &mut search, &limits, start);

        let outcome = self.run_search(&pristine, working, &mut search, &limits, memory, start);

        search.stats.bestlb = outcome.bestlb.max(search.stats.bestlb);
        if search.stats.cause == TerminationCause::None {
            search.stats.cause = outcome.cause;
        }

        // bestSingleNodeSol: for an unrooted instance, "take no node at all"
        // and "take the single highest-revenue node alone" are both always
        // feasible by construction but aren't reachable through the
        // per-root enumeration above (every root subtree's arborescences
        // contain at least that root). Compare the better of the two
        // against the incumbent the B&B loop found, once, up front on the
        // original instance.
        if was_unrooted {
            if let Some(floor) = best_floor_solution(&pristine) {
                if floor.obj < search.ub() - 1e-9 {
                    search.incumbent = Some(floor);
                    search.stats.record_solution(search.ub(), start.elapsed());
                }
            }
        }

        if was_mwcs {
            if let Some(sol) = &mut search.incumbent {
                sol.obj = pristine.convert_pcstp_bound_to_mwcs(sol.obj);
            }
            search.stats.bestlb = pristine.convert_pcstp_bound_to_mwcs(search.stats.bestlb);
            search.stats.rootlb = pristine.convert_pcstp_bound_to_mwcs(search.stats.rootlb);
            search.stats.rootub = pristine.convert_pcstp_bound_to_mwcs(search.stats.rootub);
        }

        info!(obj = search.incumbent.as_ref().map(|s| s.obj), cause = ?search.stats.cause, iters = search.stats.n_iter, "solve finished");
        SolveReport { solution: search.incumbent, stats: search.stats }
    }

    fn run_heuristic_phase(&mut self, pristine: &Instance, working: &Instance, search: &mut Search, limits: &Limits, start: Instant) {
        let heur_start = Instant::now();
        if let Some(cand) = heuristic::init_heur(working, &self.opts, &mut self.rng) {
            search.offer(pristine, working, cand, start.elapsed(), limits);
        }
        search.stats.heur_time = heur_start.elapsed();

        if self.opts.heurbb {
            let heur_bb_start = Instant::now();
            self.run_heur_bb(pristine, working, search, limits, start);
            search.stats.heur_bb_time = heur_bb_start.elapsed();
        }
    }

    /// A time-limited, non-recursive inner solve restricted to the union of
    /// arcs already seen by the heuristic phase, looking for a tighter
    /// starting incumbent before the main loop begins. `heurbb`/`big_m` are
    /// disabled on the inner call so it cannot recurse into itself.
    fn run_heur_bb(&mut self, pristine: &Instance, working: &Instance, search: &mut Search, limits: &Limits, start: Instant) {
        if search.pool.is_empty() {
            return;
        }
        let restricted = heuristic::restrict_to_solution_union(working, &search.pool);
        let mut inner_opts = self.opts.clone();
        inner_opts.heurbb = false;
        inner_opts.big_m = false;
        inner_opts.semi_big_m = false;
        let inner_limits = Limits {
            time_lim: Duration::from_secs_f64(self.opts.heurbbtime.max(0.0)),
            sol_lim: usize::MAX,
            node_lim: usize::MAX,
            cutup: Some(search.ub()),
            memlimit: limits.memlimit,
        };
        let mut inner = BbTree::new(inner_opts);
        inner.rng = StdRng::seed_from_u64(self.opts.seed ^ 0x5eed);
        let report = inner.solve(restricted, inner_limits, &mut crate::memory::NullMemoryProbe);
        if let Some(sol) = report.solution {
            if sol.obj < search.ub() - 1e-9 {
                search.incumbent = Some(sol);
                search.stats.record_solution(search.ub(), start.elapsed());
            }
        }
    }

    fn run_search(&mut self, pristine: &Instance, working: Instance, search: &mut Search, limits: &Limits, memory: &mut dyn MemoryProbe, start: Instant) -> SearchOutcome {
        let root_time_start = Instant::now();
        let result = if let Some(r) = working.r {
            search.stats.n_roots = 1;
            self.solve_one_root(pristine, working, r, search, limits, memory, start)
        } else {
            self.enumerate_roots(pristine, working, search, limits, memory, start)
        };
        search.stats.root_time = root_time_start.elapsed();
        search.stats.rootlb = result.bestlb;
        search.stats.rootub = search.ub();
        result
    }

    fn enumerate_roots(&mut self, pristine: &Instance, working: Instance, search: &mut Search, limits: &Limits, memory: &mut dyn MemoryProbe, start: Instant) -> SearchOutcome {
        let mut base = working;
        let candidates = heuristic::sorted_list_potential_roots(&base);
        search.stats.n_roots = candidates.len();

        let bigm_ctx = if self.opts.big_m { Some(base.create_rooted_bigm_copy()) } else { None };
        let bigm_bound = bigm_ctx.as_ref().map(|bigm| {
            let da = crate::dual_ascent::da_r(&bigm.instance, f64::INFINITY, false, self.opts.absgap, None);
            (da.lb, da.cr, da.pi)
        });

        // semiBigM: the synthetic root's dual-ascent certificate covers
        // base's own arcs and nodes verbatim (the bigM copy only appends
        // arcs/a node past index base.m/base.n), so its reduced costs and
        // potentials double as a valid certificate for an LC pass against
        // base itself, ahead of spending time on any individual root.
        if self.opts.semi_big_m && self.opts.lc {
            if let Some((lb_m, cr_m, pi_m)) = &bigm_bound {
                base.lc(&cr_m[..base.m], &pi_m[..base.n], *lb_m, search.ub(), self.opts.absgap);
            }
        }

        let mut global_bestlb = f64::INFINITY;
        let mut cause = TerminationCause::Optimal;

        'roots: for k in candidates {
            if base.f0[k] {
                continue;
            }
            if let (Some(bigm), Some((lb_m, cr_m, _))) = (&bigm_ctx, &bigm_bound) {
                if let Some(&arc) = bigm.arc_for_root.get(&k) {
                    if lb_m + cr_m[arc] >= search.ub() - self.opts.absgap {
                        global_bestlb = global_bestlb.min(lb_m + cr_m[arc]);
                        if !base.is_asym {
                            roots::fix_term(&mut base, k);
                        }
                        continue;
                    }
                }
            }

            let mut root_inst = base.clone();
            root_inst.r = Some(k);
            root_inst.f1[k] = true;
            root_inst.t[k] = true;

            let outcome = self.solve_one_root(pristine, root_inst, k, search, limits, memory, start);
            search.stats.n_roots_processed += 1;
            global_bestlb = global_bestlb.min(outcome.bestlb);
            if outcome.cause != TerminationCause::Optimal {
                cause = outcome.cause;
                break 'roots;
            }

            if !base.is_asym {
                roots::fix_term(&mut base, k);
            }
        }

        SearchOutcome { bestlb: global_bestlb, cause }
    }

    /// Runs one root's subtree to exhaustion (or until a limit fires),
    /// returning that subtree's best lower bound and why it stopped.
    fn solve_one_root(
        &mut self,
        pristine: &Instance,
        root_inst: Instance,
        _root: usize,
        search: &mut Search,
        limits: &Limits,
        memory: &mut dyn MemoryProbe,
        start: Instant,
    ) -> SearchOutcome {
        let use_max_heap = matches!(self.opts.nodeselect, NodeSelect::WorstBound | NodeSelect::Dfs);
        let mut store = NodeStore::new(use_max_heap);
        let mut prio = vec![0.0_f64; root_inst.n];

        let mut root_node = BBNode::new(root_inst, 0);
        let outcome = process(&mut root_node, &self.opts, search.ub(), search.incumbent.as_ref(), &search.pool, &mut self.rng);
        search.stats.n_iter += 1;
        if let Some(cand) = outcome.candidate {
            search.offer(pristine, &root_node.inst, cand, start.elapsed(), limits);
        }

        let mut bestlb = root_node.lb;
        match outcome.state {
            State::Infeasible | State::Cutoff => {
                return SearchOutcome { bestlb, cause: TerminationCause::Optimal };
            }
            State::Leaf => {
                self.accept_leaf(pristine, &mut root_node, search, start, limits);
                return SearchOutcome { bestlb, cause: TerminationCause::Optimal };
            }
            State::Branch => {
                let key = self.select_key(&root_node);
                let id = store.insert(root_node);
                store.enqueue(id, key, key_min_for(&store, id));
            }
        }

        let bb_loop_start = Instant::now();
        loop {
            if search.stats.n_iter >= limits.node_lim {
                search.stats.n_roots_open += store.open_count();
                search.stats.bb_time += bb_loop_start.elapsed();
                store.free_open_nodes();
                return SearchOutcome { bestlb, cause: TerminationCause::NodeLimit };
            }
            if start.elapsed() >= limits.time_lim {
                search.stats.n_roots_open += store.open_count();
                search.stats.bb_time += bb_loop_start.elapsed();
                store.free_open_nodes();
                return SearchOutcome { bestlb, cause: TerminationCause::TimeLimit };
            }
            if memory.used_mb() >= limits.memlimit {
                search.stats.n_roots_open += store.open_count();
                search.stats.bb_time += bb_loop_start.elapsed();
                store.free_open_nodes();
                return SearchOutcome { bestlb, cause: TerminationCause::MemLimit };
            }
            if search.stats.n_improvements >= limits.sol_lim {
                search.stats.n_roots_open += store.open_count();
                search.stats.bb_time += bb_loop_start.elapsed();
                store.free_open_nodes();
                return SearchOutcome { bestlb, cause: TerminationCause::SolLimit };
            }

            let Some(id) = store.select() else { break };
            let mut node = store.take(id);

            if search.ub() - node.lb <= self.opts.absgap {
                continue;
            }

            let outcome = process(&mut node, &self.opts, search.ub(), search.incumbent.as_ref(), &search.pool, &mut self.rng);
            search.stats.n_iter += 1;
            trace!(depth = node.depth, lb = node.lb, state = ?outcome.state, "processed node");
            bestlb = bestlb.min(node.lb);
            if let Some(cand) = outcome.candidate {
                search.offer(pristine, &node.inst, cand, start.elapsed(), limits);
            }

            match outcome.state {
                State::Infeasible | State::Cutoff => {
                    // prio: bump the branching variable whenever the subtree
                    // rooted at its f1-branch turns out infeasible or gets
                    // cut off, so later branch-variable ties favor variables
                    // that have actually closed off search volume.
                    if let Some(v) = node.f1_branch_var {
                        prio[v] += 1.0;
                    }
                    continue;
                }
                State::Leaf => {
                    self.accept_leaf(pristine, &mut node, search, start, limits);
                }
                State::Branch => match branch(node, &self.opts, &mut prio, search.incumbent.as_ref()) {
                    BranchOutcome::Infeasible => {}
                    BranchOutcome::One(child) => {
                        let key = self.select_key(&child);
                        let cid = store.insert(child);
                        store.enqueue(cid, key, store.get(cid).lb);
                    }
                    BranchOutcome::Two(c0, c1) => {
                        let key0 = self.select_key(&c0);
                        let k0 = store.insert(c0);
                        store.enqueue(k0, key0, store.get(k0).lb);
                        let key1 = self.select_key(&c1);
                        let k1 = store.insert(c1);
                        store.enqueue(k1, key1, store.get(k1).lb);
                    }
                },
            }

            if let Some(open_lb) = store.peek_min_lb() {
                bestlb = bestlb.min(open_lb);
            }
        }

        search.stats.bb_time += bb_loop_start.elapsed();
        debug!(bestlb, "root subtree exhausted");
        SearchOutcome { bestlb, cause: TerminationCause::Optimal }
    }

    fn accept_leaf(&mut self, pristine: &Instance, node: &mut BBNode, search: &mut Search, start: Instant, limits: &Limits) {
        let Some(r) = node.inst.r else { return };
        if let Some(exact) = dmst(&node.inst, r, &node.inst.c.clone()) {
            search.offer(pristine, &node.inst, exact, start.elapsed(), limits);
        }
    }

    fn select_key(&self, node: &BBNode) -> f64 {
        match self.opts.nodeselect {
            NodeSelect::WorstBound => node.lb,
            NodeSelect::Dfs => node.depth as f64,
            NodeSelect::BestBound => node.lb,
        }
    }
}

struct SearchOutcome {
    bestlb: f64,
    cause: TerminationCause,
}

/// The best of "no nodes at all" and "exactly the highest-revenue node",
/// evaluated on the original (pre-reduction) instance.
///
/// Only sound when at most one live node is actually required (terminal or
/// fixed-in): with zero required nodes both candidates are trivially
/// feasible; with exactly one, that node must be kept and is its own root,
/// so no alternative floor exists. With two or more required nodes neither
/// candidate can be feasible in general (they'd need to be mutually
/// reachable too), so this returns `None` and the root-enumeration/B&B
/// result stands on its own.
fn best_floor_solution(pristine: &Instance) -> Option<Solution> {
    let required: Vec<usize> = (0..pristine.n).filter(|&i| !pristine.f0[i] && (pristine.t[i] || pristine.f1[i])).collect();
    match required.as_slice() {
        [] => {
            let best = (0..pristine.n).filter(|&i| !pristine.f0[i]).max_by(|&a, &b| pristine.p[a].total_cmp(&pristine.p[b]))?;
            if pristine.p[best] <= 0.0 {
                Some(Solution { nodes: vec![false; pristine.n], arcs: vec![false; pristine.m], r: None, obj: pristine.offset, partial: false })
            } else {
                Some(Solution::root_only(pristine, best))
            }
        }
        [only] => Some(Solution::root_only(pristine, *only)),
        _ => None,
    }
}

/// Helper retained for readability at `enqueue` call sites that already
/// have a fresh node's `lb` on hand via the arena; the root-level initial
/// enqueue doesn't, so it looks its own value up.
fn key_min_for(store: &NodeStore, id: usize) -> f64 {
    store.get(id).lb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ArcInput;

    /// No node is terminal/fixed-in, so both "no nodes" and "node 1 alone"
    /// are feasible floor candidates.
    fn unconstrained_two_node_instance(p1: f64, cost: f64) -> Instance {
        let arcs = vec![ArcInput::new(0, 1, cost)];
        Instance::build(2, arcs, vec![0.0, p1], vec![false; 2], vec![false; 2], vec![false; 2], None, true, true, false).unwrap()
    }

    #[test]
    fn floor_solution_picks_the_empty_set_when_every_revenue_is_nonpositive() {
        let inst = unconstrained_two_node_instance(0.0, 5.0);
        let floor = best_floor_solution(&inst).unwrap();
        assert_eq!(floor.r, None);
        assert_eq!(floor.obj, 0.0);
    }

    #[test]
    fn floor_solution_picks_the_best_single_node_when_a_revenue_is_positive() {
        let inst = unconstrained_two_node_instance(7.0, 5.0);
        let floor = best_floor_solution(&inst).unwrap();
        assert_eq!(floor.r, Some(1));
        assert_eq!(floor.obj, -7.0);
    }

    #[test]
    fn floor_solution_defers_to_the_search_when_two_nodes_are_required() {
        let arcs = vec![ArcInput::new(0, 1, 1.0)];
        let inst = Instance::build(2, arcs, vec![0.0, 7.0], vec![true, true], vec![false; 2], vec![false; 2], None, true, true, false).unwrap();
        assert!(best_floor_solution(&inst).is_none());
    }

    #[test]
    fn unrooted_solve_never_reports_worse_than_the_floor_solution() {
        // Node 1 carries revenue but isn't required: root enumeration alone
        // already finds the single-node solution here (it tries every live
        // node as a candidate root), so this mainly guards against a
        // regression that would make the floor override report something
        // worse than what a plain search already guarantees.
        let inst = unconstrained_two_node_instance(7.0, 20.0);
        let mut solver = BbTree::new(Options::default());
        let report = solver.solve(inst, Limits::default(), &mut crate::memory::NullMemoryProbe);
        let obj = report.solution.map(|s| s.obj).unwrap_or(0.0);
        assert!(obj <= 1e-9);
    }
}
