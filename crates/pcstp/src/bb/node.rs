//! A single branch-and-bound node: its instance snapshot, the `process`
//! state machine, and branching-variable selection.

use crate::dual_ascent::da_r;
use crate::instance::Instance;
use crate::options::{BranchType, Options};
use crate::reduce::{bbred, preprocess};
use crate::solution::Solution;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Outcome of `process`, mirroring dapcstp's `BBNode::state`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    Infeasible,
    Cutoff,
    Leaf,
    Branch,
}

/// A node's owned instance snapshot plus the bookkeeping `process`/`branch`
/// need. Copy-on-branch: cloned only when both `branch` children are
/// feasible (see `branch` below).
pub struct BBNode {
    pub inst: Instance,
    pub depth: usize,
    pub lb: f64,
    pub state: NodeState,
    /// The reduced costs from this node's last `daR` call, cached for
    /// `select_branch_variable`'s support-graph degree.
    pub(crate) last_cr: Vec<f64>,
    /// Set when this node is the f1-branch child produced by branching on
    /// this variable; consumed by the driver to bump `prio` if this
    /// subtree later turns out infeasible or gets cut off.
    pub f1_branch_var: Option<usize>,
    pub(crate) in_queue: bool,
    pub(crate) generation: u64,
}

impl BBNode {
    pub fn new(inst: Instance, depth: usize) -> Self {
        let lb = inst.offset;
        BBNode {
            inst,
            depth,
            lb,
            state: NodeState::Branch,
            last_cr: Vec::new(),
            f1_branch_var: None,
            in_queue: false,
            generation: 0,
        }
    }
}

/// Whether every required node (terminal or fixed-in) is reachable from the
/// root via live out-arcs. Mirrors dapcstp's `isFeas`.
pub fn is_feasible(inst: &Instance) -> bool {
    let Some(r) = inst.r else { return false };
    if inst.f0[r] {
        return false;
    }
    let reach = inst.reachable_from(r);
    (0..inst.n).all(|i| inst.f0[i] || !(inst.t[i] || inst.f1[i]) || reach[i])
}

/// Number of nodes neither fixed-in nor fixed-out: `process` branches only
/// while this is nonzero.
pub fn count_free(inst: &Instance) -> usize {
    (0..inst.n).filter(|&i| !inst.f0[i] && !inst.f1[i]).count()
}

/// Result of `process`: the node's new state, plus a primal candidate worth
/// validating against the incumbent (always present unless the node was
/// found infeasible or cut off before the heuristic ran).
pub struct ProcessOutcome {
    pub state: NodeState,
    pub candidate: Option<Solution>,
}

/// Runs one node through dapcstp's `process`: reduce, bound, strengthen,
/// heuristic, classify.
pub fn process(
    node: &mut BBNode,
    opts: &Options,
    ub: f64,
    incumbent: Option<&Solution>,
    pool: &[Solution],
    rng: &mut StdRng,
) -> ProcessOutcome {
    if node.depth == 0 || !opts.redrootonly {
        preprocess(&mut node.inst, opts, false);
    }
    if !is_feasible(&node.inst) {
        node.state = NodeState::Infeasible;
        return ProcessOutcome { state: NodeState::Infeasible, candidate: None };
    }

    let is_int = node.inst.is_int;
    let dasat = opts.resolved_dasat(is_int);
    let absgap = opts.absgap;

    let mut da = da_r(&node.inst, ub - node.inst.offset, opts.daeager, absgap, incumbent);
    node.lb = node.inst.offset + da.lb;
    if ub - node.lb <= absgap {
        node.state = NodeState::Cutoff;
        return ProcessOutcome { state: NodeState::Cutoff, candidate: None };
    }

    if !da.cutoff {
        bbred(&mut node.inst, opts, &da.cr, &da.pi, da.lb, ub - node.inst.offset, false);
        if !is_feasible(&node.inst) {
            node.state = NodeState::Infeasible;
            return ProcessOutcome { state: NodeState::Infeasible, candidate: None };
        }
    }

    let mut guides: Vec<&Solution> = pool.iter().collect();
    guides.shuffle(rng);
    for guide in guides.into_iter().take(opts.daiterations.saturating_sub(1)) {
        if ub - node.lb <= absgap {
            break;
        }
        da = da_r(&node.inst, ub - node.inst.offset, opts.daeager, absgap, Some(guide));
        node.lb = node.inst.offset + da.lb;
        if ub - node.lb <= absgap {
            node.state = NodeState::Cutoff;
            return ProcessOutcome { state: NodeState::Cutoff, candidate: None };
        }
        bbred(&mut node.inst, opts, &da.cr, &da.pi, da.lb, ub - node.inst.offset, false);
        if !is_feasible(&node.inst) {
            node.state = NodeState::Infeasible;
            return ProcessOutcome { state: NodeState::Infeasible, candidate: None };
        }
    }

    node.last_cr = da.cr.clone();
    let candidate = super::heuristic::run_primal_heuristic(&node.inst, &da.cr, dasat, incumbent, opts, rng);

    let nfree = count_free(&node.inst);
    let state = if ub - node.lb <= absgap {
        NodeState::Cutoff
    } else if nfree == 0 {
        NodeState::Leaf
    } else {
        NodeState::Branch
    };
    node.state = state;
    ProcessOutcome { state, candidate: Some(candidate) }
}

/// `selectBranchVariable`: lexicographic key over free nodes per
/// `opts.branchtype`, first maximum wins, ties broken by lower index.
pub fn select_branch_variable(inst: &Instance, opts: &Options, cr: &[f64], dasat: f64, incumbent: Option<&Solution>, prio: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64, usize, usize)> = None;
    for i in 0..inst.n {
        if inst.f0[i] || inst.f1[i] {
            continue;
        }
        let incident: Vec<usize> = inst.din[i].iter().chain(inst.dout[i].iter()).copied().filter(|&a| !inst.fe0[a]).collect();
        if incident.is_empty() {
            continue;
        }
        let deg = incident.iter().filter(|&&a| cr[a] <= dasat).count();
        let deg_s = match incumbent {
            Some(sol) => incident.iter().filter(|&&a| sol.arcs.get(a).copied().unwrap_or(false)).count(),
            None => 0,
        };
        let key = match opts.branchtype {
            BranchType::PrioDegDegS => (prio[i], deg, deg_s),
            BranchType::DegDegS => (0.0, deg, deg_s),
            BranchType::Deg => (0.0, deg, 0),
            BranchType::DegS => (0.0, 0, deg_s),
        };
        let better = match best {
            None => true,
            Some((_, bp, bd, bs)) => key.0 > bp || (key.0 == bp && (key.1 > bd || (key.1 == bd && key.2 > bs))),
        };
        if better {
            best = Some((i, key.0, key.1, key.2));
        }
    }
    best.map(|(i, _, _, _)| i)
}

/// Result of `branch`: zero, one, or two live children.
pub enum BranchOutcome {
    Infeasible,
    One(BBNode),
    Two(BBNode, BBNode),
}

/// `branch(b)`: fixes the selected variable out in one trial clone and in
/// in another, keeping whichever trial(s) remain feasible. When both
/// survive, the f0 trial becomes a brand-new node and the f1 trial replaces
/// `node` in place (the cheap, no-extra-copy path dapcstp's `branch` takes).
pub fn branch(node: BBNode, opts: &Options, prio: &mut [f64], incumbent: Option<&Solution>) -> BranchOutcome {
    let dasat = opts.resolved_dasat(node.inst.is_int);
    let v = select_branch_variable(&node.inst, opts, &node.last_cr, dasat, incumbent, prio)
        .unwrap_or_else(|| panic!("branch invoked on a node with no free variable (depth {})", node.depth));

    let mut f0_inst = node.inst.clone();
    f0_inst.remove_node(v);
    let f0_feasible = is_feasible(&f0_inst);

    let mut f1_inst = node.inst.clone();
    f1_inst.f1[v] = true;
    f1_inst.t[v] = true;
    let f1_feasible = is_feasible(&f1_inst);

    if !f1_feasible {
        prio[v] += 1.0;
    }

    match (f0_feasible, f1_feasible) {
        (true, true) => {
            let child0 = BBNode::new(f0_inst, node.depth + 1);
            let mut child1 = node;
            child1.inst = f1_inst;
            child1.depth += 1;
            child1.f1_branch_var = Some(v);
            BranchOutcome::Two(child0, child1)
        }
        (true, false) => {
            let mut child = node;
            child.inst = f0_inst;
            child.depth += 1;
            BranchOutcome::One(child)
        }
        (false, true) => {
            let mut child = node;
            child.inst = f1_inst;
            child.depth += 1;
            child.f1_branch_var = Some(v);
            BranchOutcome::One(child)
        }
        (false, false) => BranchOutcome::Infeasible,
    }
}
