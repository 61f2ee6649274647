//! Back-mapping maintenance for the reduction tests.
//!
//! `bmna`/`bmaa` track, for informational and invariant-checking purposes,
//! which original nodes/arcs a current node/arc represents. The actual
//! mechanics recovery needs — "which arc do I re-instate when I expand this
//! merged node back out" — are tracked separately in `Instance::contractions`,
//! an ordered log `recover.rs` replays in reverse.

use super::types::{Contraction, Instance};

impl Instance {
    /// Folds `j`'s back-mapping into `i`'s ahead of a `merge(ij, i, j)`, and
    /// appends the `Contraction` record recovery will need.
    pub(super) fn update_backmap_merge(&mut self, i: usize, j: usize) {
        let absorbed_nodes = self.bmna[j].clone();
        let ij = self.din[j].iter().chain(self.dout[j].iter())
            .copied()
            .find(|&a| !self.fe0[a] && (self.tail[a] == i || self.head[a] == i))
            .unwrap_or_else(|| panic!("merge: no live arc between {} and {}", i, j));
        let absorbed_to_survivor = self.tail[ij] == j;
        let arc_original_ids = self.bmaa[ij].clone();

        self.contractions.push(Contraction {
            survivor: i,
            absorbed_original_nodes: absorbed_nodes.clone(),
            arc_original_ids,
            absorbed_to_survivor,
        });

        self.bmna[i].extend(absorbed_nodes);
        self.bmna[j].clear();
    }

    /// NTD2: when a degree-2 node `j` is replaced by a direct arc between
    /// its two neighbors, `j`'s back-mapping and the two replaced arcs'
    /// back-mapping both fold into the new direct arc.
    pub(crate) fn update_backmap_ntd2(&mut self, new_ij: usize, old_ij: usize, old_jk: usize) {
        let mut merged = self.bmaa[old_ij].clone();
        merged.extend(self.bmaa[old_jk].clone());
        self.bmaa[new_ij] = merged;
    }

    /// NTD2 triangle case: collapsing the two-path `i-j-k` creates a
    /// parallel arc with the existing direct arc `ik`; the cheaper of the
    /// two survives and absorbs the other's back-mapping.
    pub(crate) fn update_backmap_ntd2_triangle(&mut self, ik: usize, ij: usize, jk: usize) {
        let mut merged = self.bmaa[ij].clone();
        merged.extend(self.bmaa[jk].clone());
        self.bmaa[ik].extend(merged);
    }
}
