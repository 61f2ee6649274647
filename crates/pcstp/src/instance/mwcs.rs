//! MWCS ⇄ PCSTP conversion.
//!
//! Maximum Weight Connected Subgraph asks for a connected node subset
//! maximizing `Σ w(v)` over possibly-negative node weights. The standard
//! reduction to PCSTP (Ljubić et al.) keeps non-negative-weight nodes as
//! ordinary terminals with `p(v) = w(v)`, and for every negative-weight
//! node pushes its penalty `-w(v)` onto every arc entering it while zeroing
//! its own revenue. Because a feasible solution is an arborescence, a
//! selected negative-weight node has exactly one incoming tree arc, so it
//! pays that penalty exactly once — which makes the whole transformation
//! reversible by a single negation, with no need to replay the per-node
//! log to recover the bound (the log is kept anyway, for inspection and
//! for `Solution` objective bookkeeping in MWCS terms).

use super::types::{Instance, TransformStep};

impl Instance {
    /// Rewrites an MWCS-flagged instance in place into an ordinary rooted
    /// PCSTP instance. Idempotent: a no-op if `is_mwcs` is already false.
    pub fn convert_mwcs_to_pcstp(&mut self) {
        if !self.is_mwcs {
            return;
        }
        for i in 0..self.n {
            let w = self.p[i];
            if w >= 0.0 {
                self.t[i] = true;
            } else {
                let penalty = -w;
                self.p[i] = 0.0;
                let incoming: Vec<usize> = self.din[i].clone();
                for ij in incoming {
                    if !self.fe0[ij] {
                        self.c[ij] += penalty;
                    }
                }
                self.transform.steps.push(TransformStep::NegativePenaltyPushedToArcs { node: i, penalty });
            }
        }
        self.is_mwcs = false;
        debug_assert!(self.p.iter().all(|&w| w >= 0.0), "convert_mwcs_to_pcstp must leave every revenue non-negative");
    }

    /// Maps a PCSTP bound/objective back to MWCS terms.
    pub fn convert_pcstp_bound_to_mwcs(&self, bound: f64) -> f64 {
        -bound
    }
}
