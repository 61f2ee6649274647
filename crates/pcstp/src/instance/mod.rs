//! The mutable directed-graph instance: adjacency, flags, and the
//! back-mapping that lets a reduced instance's solution be recovered onto
//! the original graph.
//!
//! Purpose
//! - Own `n`/`m` nodes/arcs, their costs/revenues/flags, and O(1)-deletable
//!   adjacency lists (`ops.rs`).
//! - Track articulation points (`articulation.rs`) and the MWCS/PCSTP and
//!   bigM auxiliary-instance transformations (`mwcs.rs`, `bigm.rs`) the B&B
//!   driver needs.
//! - Record enough of a back-mapping (`backmap.rs`) that a solution found on
//!   a contracted instance can be expanded back onto the original one.
//!
//! Cross-refs
//! - `bb::recover` replays `Instance::contractions` in reverse.
//! - `reduce::*` are the only callers of the mutation primitives in `ops.rs`
//!   besides `bb::branch`'s `remove_node` on a fixed-out branch.

mod articulation;
mod backmap;
mod bigm;
mod mwcs;
mod ops;
mod types;

pub use articulation::ApCertificate;
pub use bigm::BigMCopy;
pub use types::{ArcInput, Contraction, Instance, TransformStep, Transformation};

#[cfg(test)]
mod tests;
