//! Exact solver for the (asymmetric) directed Prize-Collecting Steiner Tree
//! Problem, with the Maximum Weight Connected Subgraph Problem handled as a
//! reducible variant.
//!
//! Cross-refs live in doc comments:
//! PAPER: dual ascent + reduction + branch-and-bound, after Leitner et al.
//! DESIGN: see DESIGN.md at the workspace root for the grounding ledger.
//!
//! The crate is organized leaves-first:
//! - [`instance`] owns the mutable directed graph and its back-mapping.
//! - [`solution`] is the boolean-vector solution object.
//! - [`dual_ascent`] computes a Lagrangian lower bound and reduced costs.
//! - [`reduce`] is the fixpoint reduction cascade.
//! - [`primal`] builds feasible solutions from reduced costs.
//! - [`bb`] is the branch-and-bound driver that ties the above together.
//!
//! None of this crate parses DIMACS/STP files, reads CLI flags, prints
//! progress lines, or probes host memory directly — those are the
//! responsibility of a caller (see the `pcstp-cli` crate in this workspace)
//! that constructs an [`Instance`], an [`Options`], and a [`memory::MemoryProbe`]
//! and drives [`bb::BbTree`].

pub mod bb;
pub mod dual_ascent;
pub mod error;
pub mod instance;
pub mod memory;
pub mod options;
pub mod primal;
pub mod reduce;
pub mod solution;
pub mod stats;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sentinel for "infeasibly large" cost, mirroring the original solver's
/// `WMAX`. Kept well below `f64::MAX` so that sums of a handful of sentinels
/// never overflow into `inf`/`NaN`.
pub const W_MAX: f64 = 1e18;

/// Curated re-exports for quick imports in callers.
pub mod prelude {
    pub use crate::bb::{BbTree, NodeState};
    pub use crate::error::InstanceError;
    pub use crate::instance::Instance;
    pub use crate::memory::{MemoryProbe, NullMemoryProbe};
    pub use crate::options::{Limits, Options};
    pub use crate::solution::Solution;
    pub use crate::stats::{Stats, TerminationCause};
    pub use crate::W_MAX;
}
