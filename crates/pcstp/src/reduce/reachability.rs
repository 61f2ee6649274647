//! NR: non-reachability pruning for rooted instances.

use crate::instance::Instance;

impl Instance {
    /// Removes every live node unreachable from the root via live
    /// out-arcs. A no-op on unrooted instances.
    pub fn nr(&mut self) -> bool {
        let Some(r) = self.r else {
            return false;
        };
        let reach = self.reachable_from(r);
        let mut changed = false;
        for i in 0..self.n {
            if !self.f0[i] && !reach[i] {
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
    fn nr_removes_nodes_unreachable_from_root() {
        let arcs = vec![ArcInput::new(0, 1, 1.0)];
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
        assert!(inst.nr());
        assert!(inst.f0[2]);
        assert!(!inst.f0[1]);
    }

    #[test]
    fn nr_is_noop_when_unrooted() {
        let mut inst = Instance::build(
            2,
            vec![],
            vec![0.0; 2],
            vec![false; 2],
            vec![false; 2],
            vec![false; 2],
            None,
            true,
            true,
            false,
        )
        .unwrap();
        assert!(!inst.nr());
    }
}
