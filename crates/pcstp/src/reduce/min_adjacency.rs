//! Min-adjacency node fixing and articulation-point-based pruning.

use crate::instance::Instance;

impl Instance {
    /// MA: an optional node whose cheapest possible attachment (the
    /// minimum cost among all of its live incident arcs, in either
    /// direction) already exceeds its own prize can never be worth
    /// including — no matter which neighbor it is reached through, the
    /// single cheapest one already outweighs the revenue collected.
    pub fn ma(&mut self) -> bool {
        let mut changed = false;
        for i in 0..self.n {
            if self.f0[i] || self.f1[i] || self.t[i] || Some(i) == self.r {
                continue;
            }
            let min_incident = self.din[i]
                .iter()
                .chain(self.dout[i].iter())
                .copied()
                .filter(|&a| !self.fe0[a])
                .map(|a| self.c[a])
                .fold(f64::INFINITY, f64::min);
            if min_incident.is_finite() && min_incident > self.p[i] {
                self.remove_node(i);
                changed = true;
            }
        }
        changed
    }

    /// AP fixing: if an articulation point separates a subtree containing
    /// a required (terminal or fixed-in) node from the root, the
    /// articulation point itself must also be required — there is no way
    /// to reach that subtree without passing through it.
    pub fn ap_fix(&mut self) -> bool {
        let mut changed = false;
        let cert = self.articulation_points();
        let subtrees = self.find_all_subtrees(&cert);
        for (ap_node, members) in subtrees {
            let Some(ap_node) = ap_node else { continue };
            if self.f1[ap_node] {
                continue;
            }
            let requires_ap = members.iter().any(|&i| self.t[i] || self.f1[i]);
            if requires_ap {
                self.f1[ap_node] = true;
                self.t[ap_node] = true;
                changed = true;
            }
        }
        changed
    }

    /// MAcutnode / MAcutarc: for every subtree hanging off an articulation
    /// point, bound its best possible contribution as `revenue(subtree) -
    /// cheapest arc entering it from outside`; if that bound is not
    /// positive the subtree can never pay for its own connection and is
    /// fixed out wholesale, unless it contains a required node (handled by
    /// `ap_fix` instead, never here).
    pub fn ap_subtree_prune(&mut self) -> bool {
        let mut changed = false;
        let cert = self.articulation_points();
        let subtrees = self.find_all_subtrees(&cert);
        for (_, members) in subtrees {
            if members.iter().any(|&i| self.t[i] || self.f1[i]) {
                continue;
            }
            let member_set: std::collections::HashSet<usize> = members.iter().copied().collect();
            let revenue: f64 = members.iter().map(|&i| self.p[i]).sum();
            let min_entry = members
                .iter()
                .flat_map(|&i| self.din[i].iter().copied())
                .filter(|&a| !self.fe0[a] && !member_set.contains(&self.tail[a]))
                .map(|a| self.c[a])
                .fold(f64::INFINITY, f64::min);
            if min_entry.is_finite() && revenue <= min_entry {
                for &i in &members {
                    if !self.f0[i] {
                        self.remove_node(i);
                    }
                }
                changed = true;
            }
        }
        changed
    }

    /// MAcutarc: the same unprofitable-subtree bound as `ap_subtree_prune`,
    /// but cuts only the arcs entering the subtree instead of removing its
    /// nodes. Whenever the bound holds, every entry arc costs at least the
    /// subtree's whole revenue, so none of them can ever be worth crossing —
    /// eliminating just those arcs is enough to rule the subtree out while
    /// leaving its nodes available to later passes.
    pub fn ap_cutarc_prune(&mut self) -> bool {
        let mut changed = false;
        let cert = self.articulation_points();
        let subtrees = self.find_all_subtrees(&cert);
        for (_, members) in subtrees {
            if members.iter().any(|&i| self.t[i] || self.f1[i]) {
                continue;
            }
            let member_set: std::collections::HashSet<usize> = members.iter().copied().collect();
            let revenue: f64 = members.iter().map(|&i| self.p[i]).sum();
            let entry_arcs: Vec<usize> = members
                .iter()
                .flat_map(|&i| self.din[i].iter().copied())
                .filter(|&a| !self.fe0[a] && !member_set.contains(&self.tail[a]))
                .collect();
            let min_entry = entry_arcs.iter().map(|&a| self.c[a]).fold(f64::INFINITY, f64::min);
            if min_entry.is_finite() && revenue <= min_entry {
                for a in entry_arcs {
                    self.del_arc(a);
                }
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ArcInput;

    #[test]
    fn ma_fixes_out_node_whose_cheapest_arc_exceeds_its_prize() {
        let arcs = vec![ArcInput::new(0, 1, 10.0)];
        let mut inst = Instance::build(
            2,
            arcs,
            vec![0.0, 3.0],
            vec![false, false],
            vec![false; 2],
            vec![false; 2],
            Some(0),
            true,
            true,
            false,
        )
        .unwrap();
        assert!(inst.ma());
        assert!(inst.f0[1]);
    }

    #[test]
    fn ma_keeps_node_whose_prize_covers_cheapest_arc() {
        let arcs = vec![ArcInput::new(0, 1, 2.0)];
        let mut inst = Instance::build(
            2,
            arcs,
            vec![0.0, 3.0],
            vec![false, false],
            vec![false; 2],
            vec![false; 2],
            Some(0),
            true,
            true,
            false,
        )
        .unwrap();
        assert!(!inst.ma());
        assert!(!inst.f0[1]);
    }

    #[test]
    fn ap_fix_forces_cut_vertex_when_subtree_has_terminal() {
        // 0 -> 1 -> 2, 1 -> 3; node 2 terminal, node 1 is the articulation
        // separating {2} (and {3}) from the root.
        let arcs = vec![
            ArcInput::new(0, 1, 1.0),
            ArcInput::new(1, 0, 1.0),
            ArcInput::new(1, 2, 1.0),
            ArcInput::new(2, 1, 1.0),
            ArcInput::new(1, 3, 1.0),
            ArcInput::new(3, 1, 1.0),
        ];
        let mut inst = Instance::build(
            4,
            arcs,
            vec![0.0; 4],
            vec![false, false, true, false],
            vec![false; 4],
            vec![false; 4],
            Some(0),
            true,
            true,
            false,
        )
        .unwrap();
        assert!(inst.ap_fix());
        assert!(inst.f1[1]);
    }

    #[test]
    fn ap_subtree_prune_removes_unprofitable_dangling_subtree() {
        let arcs = vec![
            ArcInput::new(0, 1, 1.0),
            ArcInput::new(1, 0, 1.0),
            ArcInput::new(1, 2, 10.0),
            ArcInput::new(2, 1, 10.0),
        ];
        let mut inst = Instance::build(
            3,
            arcs,
            vec![0.0, 0.0, 1.0],
            vec![false; 3],
            vec![false; 3],
            vec![false; 3],
            Some(0),
            true,
            true,
            false,
        )
        .unwrap();
        assert!(inst.ap_subtree_prune());
        assert!(inst.f0[2]);
    }
}
