//! Run statistics and termination reporting.
//!
//! Mirrors dapcstp's `ProgramStats`/`ProcStatus` globals, but as plain data
//! returned to the caller rather than ambient process-wide state.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why the branch-and-bound loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationCause {
    /// No search was attempted yet.
    None,
    /// Proved optimal (bestlb == ub, or solved entirely during preprocessing).
    Optimal,
    /// Stopped because the wall-clock budget was exhausted.
    TimeLimit,
    /// Stopped because the node-count budget was exhausted.
    NodeLimit,
    /// Stopped because the accepted-solution-count budget was exhausted.
    SolLimit,
    /// Stopped because the memory budget was exceeded.
    MemLimit,
}

impl Default for TerminationCause {
    fn default() -> Self {
        TerminationCause::None
    }
}

/// Counters and timings accumulated over a solve.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Best known dual lower bound across the entire search.
    pub bestlb: f64,
    /// Lower bound certified in the root phase before branching began.
    pub rootlb: f64,
    /// Upper bound (incumbent objective) at the end of the root phase.
    pub rootub: f64,

    /// Number of candidate roots considered (unrooted instances only).
    pub n_roots: usize,
    /// Number of candidate roots actually processed before a limit hit.
    pub n_roots_processed: usize,
    /// Number of root-derived B&B nodes left open after root processing.
    pub n_roots_open: usize,
    /// Number of times the incumbent was improved.
    pub n_improvements: usize,
    /// Number of B&B iterations executed.
    pub n_iter: usize,

    /// Wall-clock spent in the initial heuristic phase.
    pub heur_time: Duration,
    /// Wall-clock spent in the heuristic phase's inner B&B.
    pub heur_bb_time: Duration,
    /// Wall-clock spent enumerating and processing roots.
    pub root_time: Duration,
    /// Wall-clock spent in the main B&B loop.
    pub bb_time: Duration,

    /// (objective, time-found) pairs, one per accepted incumbent, in order.
    pub solutions: Vec<(f64, Duration)>,

    /// How the search ended.
    pub cause: TerminationCause,
}

impl Stats {
    pub fn record_solution(&mut self, obj: f64, at: Duration) {
        self.n_improvements += 1;
        self.solutions.push((obj, at));
    }
}
