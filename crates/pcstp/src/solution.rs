//! The solution object: a selected arc set, its derived node set, and
//! validation against an instance's feasibility requirements.

use crate::instance::Instance;

/// A candidate (or final) solution: boolean vectors over an instance's
/// current nodes and arcs, plus the root it is rooted at and its objective.
#[derive(Clone, Debug)]
pub struct Solution {
    pub nodes: Vec<bool>,
    pub arcs: Vec<bool>,
    pub r: Option<usize>,
    pub obj: f64,
    /// Set when this solution still needs `bb::recover::recover_partial_sol`
    /// run against the pre-reduction instance before it is final.
    pub partial: bool,
}

impl Solution {
    /// An empty solution over `inst`'s current node/arc count.
    pub fn empty(inst: &Instance) -> Self {
        Solution {
            nodes: vec![false; inst.n],
            arcs: vec![false; inst.m],
            r: inst.r,
            obj: 0.0,
            partial: false,
        }
    }

    /// A trivial single-node solution consisting of just `r`.
    pub fn root_only(inst: &Instance, r: usize) -> Self {
        let mut sol = Solution::empty(inst);
        sol.nodes[r] = true;
        sol.r = Some(r);
        sol.obj = inst.offset - inst.p[r];
        sol
    }

    /// Recomputes `nodes` from `arcs` and `r`: a node is in the solution if
    /// it is the root or is the head of a selected arc.
    pub fn derive_nodes_from_arcs(&mut self, inst: &Instance) {
        self.nodes = vec![false; inst.n];
        if let Some(r) = self.r {
            self.nodes[r] = true;
        }
        for ij in 0..inst.m {
            if self.arcs[ij] {
                self.nodes[inst.tail[ij]] = true;
                self.nodes[inst.head[ij]] = true;
            }
        }
    }

    /// Recomputes `obj` from `arcs`/`nodes` and the instance's current
    /// costs, revenues, and offset: `offset + Σc(selected arcs) -
    /// Σp(selected nodes)`.
    pub fn recompute_objective(&mut self, inst: &Instance) {
        let arc_cost: f64 = (0..inst.m).filter(|&ij| self.arcs[ij]).map(|ij| inst.c[ij]).sum();
        let node_revenue: f64 = (0..inst.n).filter(|&i| self.nodes[i]).map(|i| inst.p[i]).sum();
        self.obj = inst.offset + arc_cost - node_revenue;
    }

    /// Validates that this solution is a feasible arborescence on `inst`:
    /// rooted at `r`, every selected node reachable from `r` via selected
    /// arcs with a unique incoming selected arc (except `r`), every f1 node
    /// included, no f0 node included, and the reported objective matches an
    /// independent recomputation.
    pub fn validate(&self, inst: &Instance) -> bool {
        let r = match self.r {
            Some(r) => r,
            None => return false,
        };
        if !self.nodes[r] {
            return false;
        }
        for i in 0..inst.n {
            if inst.f1[i] && !self.nodes[i] {
                return false;
            }
            if inst.f0[i] && self.nodes[i] {
                return false;
            }
        }

        let mut indeg = vec![0u32; inst.n];
        for ij in 0..inst.m {
            if self.arcs[ij] {
                if inst.fe0[ij] {
                    return false;
                }
                indeg[inst.head[ij]] += 1;
            }
        }
        for i in 0..inst.n {
            if !self.nodes[i] {
                continue;
            }
            if i == r {
                if indeg[i] != 0 {
                    return false;
                }
            } else if indeg[i] != 1 {
                return false;
            }
        }

        let mut reached = vec![false; inst.n];
        reached[r] = true;
        let mut stack = vec![r];
        while let Some(i) = stack.pop() {
            for ij in 0..inst.m {
                if self.arcs[ij] && inst.tail[ij] == i {
                    let h = inst.head[ij];
                    if !reached[h] {
                        reached[h] = true;
                        stack.push(h);
                    }
                }
            }
        }
        for i in 0..inst.n {
            if self.nodes[i] && !reached[i] {
                return false;
            }
        }

        let mut expected = self.clone();
        expected.recompute_objective(inst);
        (expected.obj - self.obj).abs() <= 1e-6
    }

    /// Re-roots this solution at `k` without touching `arcs`/`nodes`; used
    /// when `inc.rootSolution(k)` is needed purely to change which node
    /// `validate` treats as the arborescence root (e.g. incumbent
    /// comparison across different root-enumeration candidates).
    pub fn reroot(&mut self, k: usize) {
        self.r = Some(k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ArcInput;

    fn path_012() -> Instance {
        let arcs = vec![ArcInput::new(0, 1, 1.0), ArcInput::new(1, 2, 2.0), ArcInput::new(0, 2, 10.0)];
        Instance::build(
            3,
            arcs,
            vec![0.0; 3],
            vec![true, false, true],
            vec![false; 3],
            vec![false; 3],
            Some(0),
            true,
            true,
            false,
        )
        .unwrap()
    }

    #[test]
    fn root_only_solution_has_expected_objective() {
        let inst = path_012();
        let sol = Solution::root_only(&inst, 0);
        assert_eq!(sol.obj, 0.0);
        assert!(sol.validate(&inst));
    }

    #[test]
    fn valid_arborescence_validates() {
        let inst = path_012();
        let mut sol = Solution::empty(&inst);
        sol.r = Some(0);
        sol.arcs[0] = true;
        sol.arcs[1] = true;
        sol.derive_nodes_from_arcs(&inst);
        sol.recompute_objective(&inst);
        assert_eq!(sol.obj, 3.0);
        assert!(sol.validate(&inst));
    }

    #[test]
    fn missing_fixed_in_node_is_invalid() {
        let mut inst = path_012();
        inst.f1[2] = true;
        let mut sol = Solution::empty(&inst);
        sol.r = Some(0);
        sol.arcs[0] = true;
        sol.derive_nodes_from_arcs(&inst);
        sol.recompute_objective(&inst);
        assert!(!sol.validate(&inst));
    }

    #[test]
    fn node_with_two_incoming_selected_arcs_is_invalid() {
        let inst = path_012();
        let mut sol = Solution::empty(&inst);
        sol.r = Some(0);
        sol.arcs[0] = true; // 0->1
        sol.arcs[1] = true; // 1->2
        sol.arcs[2] = true; // 0->2, second incoming arc to node 2
        sol.derive_nodes_from_arcs(&inst);
        sol.recompute_objective(&inst);
        assert!(!sol.validate(&inst));
    }
}
