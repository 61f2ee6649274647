//! Solver options — the contract surface a caller fills in.
//!
//! This struct carries no CLI parsing attributes: it is plain, serializable
//! data. A binary that wants to expose these as flags (see `pcstp-cli`)
//! defines its own `clap`-annotated struct and converts it into this one at
//! the boundary.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Node-selection policy for the branch-and-bound queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeSelect {
    /// Pop the node with the worst (largest) lower bound first.
    WorstBound,
    /// Depth-first: pop the deepest node first.
    Dfs,
    /// Pop the node with the best (smallest) lower bound first.
    BestBound,
}

impl Default for NodeSelect {
    fn default() -> Self {
        NodeSelect::BestBound
    }
}

/// Branching-variable selection rule, keyed lexicographically per §4.6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchType {
    /// (prio, deg, degS)
    PrioDegDegS,
    /// (deg, degS)
    DegDegS,
    /// (deg)
    Deg,
    /// (degS)
    DegS,
}

impl Default for BranchType {
    fn default() -> Self {
        BranchType::PrioDegDegS
    }
}

/// Stop conditions checked once per root and once per B&B iteration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum accepted incumbent improvements before stopping.
    pub sol_lim: usize,
    /// Maximum number of B&B iterations.
    pub node_lim: usize,
    /// Wall-clock budget for the whole solve.
    pub time_lim: Duration,
    /// External upper bound: if set and tighter than the computed `ub`,
    /// used as the starting cutoff.
    pub cutup: Option<f64>,
    /// Resident-memory budget in MB, checked via a [`crate::memory::MemoryProbe`].
    pub memlimit: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            sol_lim: usize::MAX,
            node_lim: usize::MAX,
            time_lim: Duration::from_secs(u64::MAX / 2),
            cutup: None,
            memlimit: u64::MAX,
        }
    }
}

/// All tunables the branch-and-bound driver consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// RNG seed for dual-ascent guide shuffling.
    pub seed: u64,

    /// Perturbation epsilon for the primal heuristic. Negative means "pick
    /// the default for this instance's cost domain" (0.05 integer / 0.005
    /// real), applied once at `BbTree` construction time.
    pub heureps: f64,
    /// Enable the perturbed-cost primal heuristic variant.
    pub perturbedheur: bool,
    /// Restrict `primI` to the dual-ascent support graph.
    pub heursupportg: bool,
    /// Run an inner, time-limited B&B during the heuristic phase.
    pub heurbb: bool,
    /// Time limit (seconds) for that inner B&B.
    pub heurbbtime: f64,
    /// Maximum number of seed roots explored in the heuristic phase.
    pub heurroots: usize,

    /// Number of `daR` rounds applied per B&B node.
    pub daiterations: usize,
    /// Early-exit `daR` once the accumulated bound crosses `ub - absgap`.
    pub daeager: bool,
    /// Saturation threshold below which a reduced cost is "in the support
    /// graph". Negative means "pick the default" (0.0 integer costs,
    /// `1e-4 * precision` otherwise).
    pub dasat: f64,
    /// Scaling applied to real-valued costs before treating them as
    /// integral for epsilon purposes.
    pub precision: f64,
    /// Absolute optimality gap below which a node is cut off.
    pub absgap: f64,

    /// B&B node-selection policy.
    pub nodeselect: NodeSelect,
    /// Branching-variable selection rule.
    pub branchtype: BranchType,
    /// Apply reductions only at the B&B root of each subtree, not at every
    /// node.
    pub redrootonly: bool,

    /// Enable the degree-1 reduction (NTD1).
    pub d1: bool,
    /// Enable the degree-2 reduction (NTD2).
    pub d2: bool,
    /// Enable the min-adjacency node-fixing reduction (MA).
    pub ma: bool,
    /// Enable the articulation-cut-node reduction (MAcutnode).
    pub ms: bool,
    /// Enable the articulation-cut-arc reduction (MAcutarc).
    pub ss: bool,
    /// Enable the least-cost bound-based elimination (LC).
    pub lc: bool,
    /// Enable the non-reachability reduction (NR).
    pub nr: bool,

    /// Use a bigM-rooted copy to obtain a global dual bound for unrooted
    /// instances.
    pub big_m: bool,
    /// Share bound-based reductions discovered on the bigM copy back onto
    /// the working unrooted instance during the heuristic phase.
    pub semi_big_m: bool,

    /// Apply the reduction fixpoint once before root enumeration begins.
    pub initprep: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: 0,
            heureps: -1.0,
            perturbedheur: true,
            heursupportg: true,
            heurbb: true,
            heurbbtime: 1.0,
            heurroots: 5,
            daiterations: 3,
            daeager: true,
            dasat: -1.0,
            precision: 1_000_000.0,
            absgap: 1e-6,
            nodeselect: NodeSelect::default(),
            branchtype: BranchType::default(),
            redrootonly: false,
            d1: true,
            d2: true,
            ma: true,
            ms: true,
            ss: true,
            lc: true,
            nr: true,
            big_m: true,
            semi_big_m: true,
            initprep: true,
        }
    }
}

impl Options {
    /// Resolve `heureps` to its instance-dependent default when negative.
    pub fn resolved_heureps(&self, is_int: bool) -> f64 {
        if self.heureps < 0.0 {
            if is_int {
                0.05
            } else {
                0.005
            }
        } else {
            self.heureps
        }
    }

    /// Resolve `dasat` to its instance-dependent default when negative.
    pub fn resolved_dasat(&self, is_int: bool) -> f64 {
        if self.dasat < 0.0 {
            if is_int {
                0.0
            } else {
                1e-4 * self.precision
            }
        } else {
            self.dasat
        }
    }
}
