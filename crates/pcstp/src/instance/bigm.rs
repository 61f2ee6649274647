//! BigM-rooted copy: a single synthetic root the B&B driver can run `daR`
//! against once to get a global dual bound on an unrooted instance, instead
//! of paying a separate dual-ascent pass per candidate root up front.

use super::types::Instance;
use std::collections::HashMap;

/// An auxiliary rooted instance plus the bookkeeping needed to interpret
/// its synthetic-root arcs as "choice of real root".
pub struct BigMCopy {
    pub instance: Instance,
    pub synthetic_root: usize,
    /// Maps each candidate real root to the id of the zero-cost synthetic
    /// arc feeding it from `synthetic_root`.
    pub arc_for_root: HashMap<usize, usize>,
}

impl Instance {
    /// Builds a bigM copy: a synthetic root node, connected by a zero-cost
    /// arc to every candidate real root (terminals, or every node for
    /// asymmetric instances).
    pub fn create_rooted_bigm_copy(&self) -> BigMCopy {
        assert!(self.r.is_none(), "bigM copy only makes sense for unrooted instances");

        let mut copy = self.clone();
        let synthetic_root = copy.n;
        copy.n += 1;
        copy.din.push(Vec::new());
        copy.dout.push(Vec::new());
        copy.f0.push(false);
        copy.f1.push(true);
        copy.t.push(true);
        copy.p.push(0.0);
        copy.bmna.push(Vec::new());

        let candidates: Vec<usize> = (0..self.n)
            .filter(|&i| !self.f0[i] && (self.is_asym || self.t[i]))
            .collect();

        let mut arc_for_root = HashMap::new();
        for &k in &candidates {
            let ij = copy.push_arc(synthetic_root, k, 0.0, None);
            arc_for_root.insert(k, ij);
        }

        copy.r = Some(synthetic_root);

        BigMCopy { instance: copy, synthetic_root, arc_for_root }
    }
}
