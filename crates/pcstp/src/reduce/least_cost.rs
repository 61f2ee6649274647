//! LC: bound-based elimination using a dual-ascent certificate's reduced
//! costs and node potentials against the current upper bound.

use crate::instance::Instance;

impl Instance {
    /// For every live arc, if `cr[ij] + lb > ub - absgap` the arc can never
    /// belong to a better-than-incumbent solution and is excluded. For
    /// every live, non-required node, if `pi[i] + lb > ub - absgap` it can
    /// never be profitably reached and is removed outright.
    pub fn lc(&mut self, cr: &[f64], pi: &[f64], lb: f64, ub: f64, absgap: f64) -> bool {
        let mut changed = false;
        let threshold = ub - absgap;
        for ij in 0..self.m {
            if self.fe0[ij] {
                continue;
            }
            if cr[ij] + lb > threshold {
                self.del_arc(ij);
                changed = true;
            }
        }
        for i in 0..self.n {
            if self.f0[i] || self.f1[i] || self.t[i] || Some(i) == self.r {
                continue;
            }
            if pi[i] + lb > threshold {
                self.remove_node(i);
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
    fn lc_eliminates_arcs_and_nodes_past_the_cutoff() {
        let arcs = vec![ArcInput::new(0, 1, 1.0), ArcInput::new(0, 2, 1.0)];
        let mut inst = Instance::build(
            3,
            arcs,
            vec![0.0; 3],
            vec![false; 3],
            vec![false; 3],
            vec![false; 3],
            Some(0),
            true,
            true,
            false,
        )
        .unwrap();
        let cr = vec![0.0, 5.0];
        let pi = vec![0.0, 0.0, 5.0];
        assert!(inst.lc(&cr, &pi, 1.0, 5.0, 1e-6));
        assert!(inst.fe0[1]);
        assert!(inst.f0[2]);
        assert!(!inst.fe0[0]);
    }
}
