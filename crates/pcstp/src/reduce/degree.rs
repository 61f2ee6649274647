//! Degree-based reductions: NTD1 (degree-1) and NTD2 (degree-2).

use crate::instance::{Contraction, Instance};

impl Instance {
    /// NTD1: every non-root node with exactly one live incident arc is
    /// either contracted into its sole neighbor (if it is required — a
    /// terminal, fixed-in, or an optional node for which keeping it is
    /// strictly profitable) or dropped outright (an optional node whose
    /// prize does not cover its connection cost).
    ///
    /// A required node's connection cost is unconditionally payable, so it
    /// is folded into `offset`. An optional-but-profitable node's net
    /// profit (`p(i) - c(ij)`) is folded into its neighbor's prize instead,
    /// so the gain only materializes if the neighbor ends up selected.
    pub fn ntd1(&mut self) -> bool {
        let mut changed = false;
        for i in 0..self.n {
            if self.f0[i] || Some(i) == self.r {
                continue;
            }
            let incident: Vec<usize> = self.din[i]
                .iter()
                .chain(self.dout[i].iter())
                .copied()
                .filter(|&a| !self.fe0[a])
                .collect();
            if incident.len() != 1 {
                continue;
            }
            let ij = incident[0];
            if self.t[i] || self.f1[i] {
                self.offset += self.c[ij];
                self.contract_arc(ij);
            } else if self.p[i] > self.c[ij] {
                self.p[i] -= self.c[ij];
                self.contract_arc(ij);
            } else {
                self.remove_node(i);
            }
            changed = true;
        }
        changed
    }

    /// NTD2: a non-terminal, non-fixed-in pass-through node with exactly
    /// one incoming and one outgoing live arc is replaced by a direct arc
    /// of summed cost between its neighbors; any prize it holds is always
    /// collected for free (reaching the neighbor already requires visiting
    /// it) and is folded into the downstream neighbor. If replacing it
    /// creates a parallel arc with an already-existing direct arc between
    /// the same neighbors, the cheaper of the two survives.
    pub fn ntd2(&mut self) -> bool {
        let mut changed = false;
        for i in 0..self.n {
            if self.f0[i] || self.f1[i] || self.t[i] || Some(i) == self.r {
                continue;
            }
            let inc_in: Vec<usize> = self.din[i].iter().copied().filter(|&a| !self.fe0[a]).collect();
            let inc_out: Vec<usize> = self.dout[i].iter().copied().filter(|&a| !self.fe0[a]).collect();
            if inc_in.len() != 1 || inc_out.len() != 1 {
                continue;
            }
            let ij = inc_in[0];
            let jk = inc_out[0];
            let u = self.tail[ij];
            let w = self.head[jk];
            if u == w {
                continue;
            }

            let new_cost = self.c[ij] + self.c[jk];
            let new_ij = self.push_arc(u, w, new_cost, None);
            self.update_backmap_ntd2(new_ij, ij, jk);

            let existing = self.dout[u]
                .iter()
                .copied()
                .find(|&a| a != new_ij && !self.fe0[a] && self.head[a] == w);
            if let Some(existing) = existing {
                if self.c[existing] <= self.c[new_ij] {
                    self.update_backmap_ntd2_triangle(existing, ij, jk);
                    self.del_arc(new_ij);
                } else {
                    let absorbed_bmaa = self.bmaa[existing].clone();
                    self.bmaa[new_ij].extend(absorbed_bmaa);
                    self.del_arc(existing);
                }
            }

            let pi = self.p[i];
            if pi > 0.0 {
                self.increase_revenue(w, pi);
            }
            let mut arc_original_ids = self.bmaa[ij].clone();
            arc_original_ids.extend(self.bmaa[jk].clone());
            let absorbed_nodes = std::mem::take(&mut self.bmna[i]);
            self.contractions.push(Contraction {
                survivor: w,
                absorbed_original_nodes: absorbed_nodes.clone(),
                arc_original_ids,
                absorbed_to_survivor: true,
            });
            self.bmna[w].extend(absorbed_nodes);
            self.remove_node(i);
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ArcInput;

    fn build(n: usize, arcs: Vec<ArcInput>, p: Vec<f64>, t: Vec<bool>) -> Instance {
        Instance::build(
            n,
            arcs,
            p,
            t,
            vec![false; n],
            vec![false; n],
            Some(0),
            true,
            true,
            false,
        )
        .unwrap()
    }

    #[test]
    fn ntd1_contracts_required_leaf_and_pays_offset() {
        let mut inst = build(
            2,
            vec![ArcInput::new(0, 1, 5.0)],
            vec![0.0, 0.0],
            vec![false, true],
        );
        assert!(inst.ntd1());
        assert_eq!(inst.offset, 5.0);
        assert!(inst.f0[1]);
        assert!(inst.t[0]);
    }

    #[test]
    fn ntd1_contracts_profitable_optional_leaf_without_offset() {
        let mut inst = build(
            2,
            vec![ArcInput::new(0, 1, 5.0)],
            vec![0.0, 20.0],
            vec![false, false],
        );
        assert!(inst.ntd1());
        assert_eq!(inst.offset, 0.0);
        assert_eq!(inst.p[0], 15.0);
        assert!(inst.f0[1]);
    }

    #[test]
    fn ntd1_drops_unprofitable_optional_leaf() {
        let mut inst = build(
            2,
            vec![ArcInput::new(0, 1, 5.0)],
            vec![0.0, 1.0],
            vec![false, false],
        );
        assert!(inst.ntd1());
        assert_eq!(inst.offset, 0.0);
        assert!(inst.f0[1]);
        assert_eq!(inst.p[0], 0.0);
    }

    #[test]
    fn ntd2_collapses_pass_through_node_and_folds_prize() {
        let mut inst = build(
            3,
            vec![ArcInput::new(0, 1, 5.0), ArcInput::new(1, 2, 5.0)],
            vec![0.0, 2.0, 2.0],
            vec![false, false, true],
        );
        assert!(inst.ntd2());
        assert!(inst.f0[1]);
        let live: Vec<usize> = (0..inst.m).filter(|&ij| !inst.fe0[ij]).collect();
        assert_eq!(live.len(), 1);
        assert_eq!(inst.c[live[0]], 10.0);
        assert_eq!(inst.tail[live[0]], 0);
        assert_eq!(inst.head[live[0]], 2);
        assert_eq!(inst.p[2], 4.0);
    }

    #[test]
    fn ntd2_triangle_case_keeps_cheaper_parallel_arc() {
        let mut inst = build(
            3,
            vec![
                ArcInput::new(0, 1, 1.0),
                ArcInput::new(1, 2, 2.0),
                ArcInput::new(0, 2, 2.0),
            ],
            vec![0.0, 0.0, 0.0],
            vec![false, false, true],
        );
        assert!(inst.ntd2());
        let live: Vec<usize> = (0..inst.m).filter(|&ij| !inst.fe0[ij]).collect();
        assert_eq!(live.len(), 1);
        assert_eq!(inst.c[live[0]], 2.0);
    }
}
