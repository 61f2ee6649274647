//! Errors surfaced at the instance-construction boundary.
//!
//! This is the one spot the core returns a typed `Result` rather than
//! panicking: the input comes from an untrusted external parser, not from
//! the solver's own invariant-preserving operations. Everything the solver
//! itself can get wrong (branching with no free variable, and the like) is
//! an implementation bug, not a recoverable error, and panics instead — see
//! `bb::node` and `bb::branch`.

use thiserror::Error;

/// Reasons raw instance data can fail to become an [`crate::instance::Instance`].
#[derive(Debug, Error, PartialEq)]
pub enum InstanceError {
    #[error("arc {arc_index} references out-of-range node {node} (n = {n})")]
    ArcEndpointOutOfRange {
        arc_index: usize,
        node: usize,
        n: usize,
    },

    #[error("node {node} is marked both fixed-in and fixed-out")]
    ConflictingFixFlags { node: usize },

    #[error("arc {arc_index} has negative cost {cost}")]
    NegativeArcCost { arc_index: usize, cost: f64 },

    #[error("node {node} has negative revenue {revenue}")]
    NegativeRevenue { node: usize, revenue: f64 },

    #[error("root {root} is out of range (n = {n})")]
    RootOutOfRange { root: usize, n: usize },

    #[error("root {root} is marked fixed-out")]
    RootFixedOut { root: usize },
}
