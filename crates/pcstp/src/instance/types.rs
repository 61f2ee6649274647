//! The directed-graph instance and its back-mapping.
//!
//! Kept as flat `Vec<T>` fields rather than a struct-of-structs-of-arcs, to
//! match dapcstp's `Inst` layout and to make `O(1)` arc deletion via cached
//! adjacency-list positions straightforward (see `ops.rs`).

use crate::error::InstanceError;

/// A single arc specification used to build an [`Instance`].
#[derive(Clone, Debug)]
pub struct ArcInput {
    pub tail: usize,
    pub head: usize,
    pub cost: f64,
    /// Index, within the same `Vec<ArcInput>`, of this arc's antiparallel
    /// twin, if the caller wants one recorded. `None` for a one-way arc.
    pub opposite: Option<usize>,
}

impl ArcInput {
    pub fn new(tail: usize, head: usize, cost: f64) -> Self {
        Self { tail, head, cost, opposite: None }
    }
}

/// A record of one MWCS→PCSTP revenue-shift transformation, kept so the
/// final bound/solution can be mapped back to MWCS terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformStep {
    /// Node `node` had negative MWCS weight; its weight was zeroed and
    /// `penalty = -weight` was pushed onto every arc entering it, so that
    /// an arborescence selecting `node` pays the penalty exactly once
    /// (through its unique incoming tree arc).
    NegativePenaltyPushedToArcs { node: usize, penalty: f64 },
}

/// Ordered log of MWCS→PCSTP transformations, reversible in reverse order.
#[derive(Clone, Debug, Default)]
pub struct Transformation {
    pub steps: Vec<TransformStep>,
}

/// A mutable directed multigraph with per-arc cost, per-node revenue, and a
/// back-mapping to the original (pre-reduction) node/arc indices.
#[derive(Clone, Debug)]
pub struct Instance {
    pub n: usize,
    pub m: usize,

    /// `None` means unrooted: the driver enumerates candidate roots.
    pub r: Option<usize>,

    /// Accumulated objective contribution removed by reductions so far.
    pub offset: f64,

    pub is_int: bool,
    pub is_asym: bool,
    pub is_mwcs: bool,

    // --- adjacency ---
    pub tail: Vec<usize>,
    pub head: Vec<usize>,
    pub opposite: Vec<Option<usize>>,
    /// Position of this arc within `din[head[ij]]`.
    pub pin: Vec<usize>,
    /// Position of this arc within `dout[tail[ij]]`.
    pub pout: Vec<usize>,
    pub din: Vec<Vec<usize>>,
    pub dout: Vec<Vec<usize>>,

    // --- weights & flags ---
    pub c: Vec<f64>,
    pub p: Vec<f64>,
    /// Terminal flag, `T` in the original.
    pub t: Vec<bool>,
    /// Fixed-in: node must appear in the solution.
    pub f1: Vec<bool>,
    /// Fixed-out: node must not appear in the solution.
    pub f0: Vec<bool>,
    /// Arc-excluded: arc has been removed from both adjacency lists.
    pub fe0: Vec<bool>,

    // --- back-mapping ---
    /// For each current node, the original node indices collapsed into it.
    pub bmna: Vec<Vec<usize>>,
    /// For each current arc, the original arc indices collapsed into it.
    pub bmaa: Vec<Vec<usize>>,

    /// Ordered log of node contractions, used by `bb::recover` to re-expand
    /// a reduced-instance solution back onto the original graph. Recorded
    /// in chronological order; recovery walks it in reverse.
    pub contractions: Vec<Contraction>,

    pub transform: Transformation,
}

/// One node-absorption event: `absorbed` was merged into `survivor` along
/// an arc whose original identity is `arc_original_ids`.
#[derive(Clone, Debug)]
pub struct Contraction {
    pub survivor: usize,
    pub absorbed_original_nodes: Vec<usize>,
    pub arc_original_ids: Vec<usize>,
    /// `true` if the contracted arc ran `absorbed -> survivor`, `false` if
    /// it ran `survivor -> absorbed`.
    pub absorbed_to_survivor: bool,
}

impl Instance {
    /// Validates and builds an `Instance` from raw arc/node data.
    ///
    /// This is the one fallible entry point into the crate: everything past
    /// construction assumes these invariants hold and will panic, not
    /// return `Result`, if they are violated internally.
    pub fn build(
        n: usize,
        arcs: Vec<ArcInput>,
        revenue: Vec<f64>,
        terminal: Vec<bool>,
        fixed_in: Vec<bool>,
        fixed_out: Vec<bool>,
        root: Option<usize>,
        is_asym: bool,
        is_int: bool,
        is_mwcs: bool,
    ) -> Result<Instance, InstanceError> {
        for (idx, a) in arcs.iter().enumerate() {
            if a.tail >= n {
                return Err(InstanceError::ArcEndpointOutOfRange { arc_index: idx, node: a.tail, n });
            }
            if a.head >= n {
                return Err(InstanceError::ArcEndpointOutOfRange { arc_index: idx, node: a.head, n });
            }
            if a.cost < 0.0 {
                return Err(InstanceError::NegativeArcCost { arc_index: idx, cost: a.cost });
            }
        }
        for i in 0..n {
            if fixed_in[i] && fixed_out[i] {
                return Err(InstanceError::ConflictingFixFlags { node: i });
            }
            if !is_mwcs && revenue[i] < 0.0 {
                return Err(InstanceError::NegativeRevenue { node: i, revenue: revenue[i] });
            }
        }
        if let Some(r) = root {
            if r >= n {
                return Err(InstanceError::RootOutOfRange { root: r, n });
            }
            if fixed_out[r] {
                return Err(InstanceError::RootFixedOut { root: r });
            }
        }

        let m = arcs.len();
        let mut inst = Instance {
            n,
            m,
            r: root,
            offset: 0.0,
            is_int,
            is_asym,
            is_mwcs,
            tail: vec![0; m],
            head: vec![0; m],
            opposite: vec![None; m],
            pin: vec![0; m],
            pout: vec![0; m],
            din: vec![Vec::new(); n],
            dout: vec![Vec::new(); n],
            c: vec![0.0; m],
            p: revenue,
            t: terminal,
            f1: fixed_in,
            f0: fixed_out,
            fe0: vec![false; m],
            bmna: (0..n).map(|i| vec![i]).collect(),
            bmaa: (0..m).map(|ij| vec![ij]).collect(),
            contractions: Vec::new(),
            transform: Transformation::default(),
        };

        for (ij, a) in arcs.iter().enumerate() {
            inst.tail[ij] = a.tail;
            inst.head[ij] = a.head;
            inst.c[ij] = a.cost;
            inst.opposite[ij] = a.opposite;
            inst.pout[ij] = inst.dout[a.tail].len();
            inst.dout[a.tail].push(ij);
            inst.pin[ij] = inst.din[a.head].len();
            inst.din[a.head].push(ij);
        }

        if let Some(r) = root {
            inst.f1[r] = true;
            inst.t[r] = true;
        }

        Ok(inst)
    }

    /// Number of currently-live arcs (those not marked `fe0`).
    pub fn live_arc_count(&self) -> usize {
        (0..self.m).filter(|&ij| !self.fe0[ij]).count()
    }

    /// Number of currently-live nodes (those not marked `f0`).
    pub fn live_node_count(&self) -> usize {
        (0..self.n).filter(|&i| !self.f0[i]).count()
    }
}
