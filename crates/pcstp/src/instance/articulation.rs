//! Articulation-point detection on the underlying undirected structure.
//!
//! An iterative (explicit-stack) Tarjan DFS, not a recursive one: solver
//! instances can have thousands of nodes, and a recursive walk risks a
//! stack overflow on a pathological long chain — the same reasoning the
//! teacher crate applies to its own DFS search (`oriented_edge::dfs`).
//!
//! Direction and parallel arcs are collapsed: two nodes are adjacent here
//! if any live arc connects them in either direction, and an antiparallel
//! pair counts once. Distinct parallel arcs in the same direction also
//! collapse to one logical edge. This matches the "underlying structure"
//! the distilled spec asks for and keeps the classic single-edge-skip
//! Tarjan recurrence correct without per-arc bookkeeping.

use super::types::Instance;
use std::collections::HashMap;

/// Certificates produced by one articulation-point search.
#[derive(Clone, Debug)]
pub struct ApCertificate {
    pub ap: Vec<bool>,
    pub disc: Vec<i64>,
    pub low: Vec<i64>,
    pub parent: Vec<Option<usize>>,
    /// For each non-articulation node, the nearest DFS ancestor that is an
    /// articulation point (`None` if no such ancestor exists).
    pub lastap: Vec<Option<usize>>,
}

struct Frame {
    node: usize,
    parent: Option<usize>,
    adj: Vec<usize>,
    idx: usize,
    skipped_parent_edge: bool,
    children: usize,
}

impl Instance {
    fn undirected_neighbors(&self, i: usize) -> Vec<usize> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for &ij in self.din[i].iter().chain(self.dout[i].iter()) {
            if self.fe0[ij] {
                continue;
            }
            let j = if self.tail[ij] == i { self.head[ij] } else { self.tail[ij] };
            if seen.insert(j) {
                out.push(j);
            }
        }
        out
    }

    /// Runs articulation-point detection over all live nodes. Nodes with no
    /// live incident arc are never articulation points and are skipped.
    pub fn articulation_points(&self) -> ApCertificate {
        let n = self.n;
        let mut ap = vec![false; n];
        let mut disc = vec![-1i64; n];
        let mut low = vec![-1i64; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut order: Vec<usize> = Vec::new();
        let mut timer: i64 = 0;

        for start in 0..n {
            if self.f0[start] || disc[start] != -1 {
                continue;
            }
            disc[start] = timer;
            low[start] = timer;
            timer += 1;
            order.push(start);
            let mut stack = vec![Frame {
                node: start,
                parent: None,
                adj: self.undirected_neighbors(start),
                idx: 0,
                skipped_parent_edge: false,
                children: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                if frame.idx < frame.adj.len() {
                    let j = frame.adj[frame.idx];
                    frame.idx += 1;
                    if Some(j) == frame.parent && !frame.skipped_parent_edge {
                        frame.skipped_parent_edge = true;
                        continue;
                    }
                    if disc[j] == -1 {
                        frame.children += 1;
                        parent[j] = Some(frame.node);
                        disc[j] = timer;
                        low[j] = timer;
                        timer += 1;
                        order.push(j);
                        stack.push(Frame {
                            node: j,
                            parent: Some(frame.node),
                            adj: self.undirected_neighbors(j),
                            idx: 0,
                            skipped_parent_edge: false,
                            children: 0,
                        });
                    } else {
                        low[frame.node] = low[frame.node].min(disc[j]);
                    }
                } else {
                    let i = frame.node;
                    let par = frame.parent;
                    let children = frame.children;
                    let low_i = low[i];
                    stack.pop();
                    match par {
                        Some(p) => {
                            low[p] = low[p].min(low_i);
                            if parent[p].is_some() && low_i >= disc[p] {
                                ap[p] = true;
                            }
                        }
                        None => {
                            if children > 1 {
                                ap[i] = true;
                            }
                        }
                    }
                }
            }
        }

        let lastap = self.compute_lastap(&order, &ap, &parent);
        ApCertificate { ap, disc, low, parent, lastap }
    }

    fn compute_lastap(&self, order: &[usize], ap: &[bool], parent: &[Option<usize>]) -> Vec<Option<usize>> {
        let mut lastap = vec![None; self.n];
        for &i in order {
            lastap[i] = match parent[i] {
                None => None,
                Some(p) => {
                    if ap[p] {
                        Some(p)
                    } else {
                        lastap[p]
                    }
                }
            };
        }
        lastap
    }

    /// Groups every non-articulation node by the nearest articulation point
    /// it hangs off of. Nodes with no such ancestor (the main biconnected
    /// mass containing each DFS root) are grouped under key `None`.
    pub fn find_all_subtrees(&self, cert: &ApCertificate) -> HashMap<Option<usize>, Vec<usize>> {
        let mut groups: HashMap<Option<usize>, Vec<usize>> = HashMap::new();
        for i in 0..self.n {
            if self.f0[i] || cert.ap[i] {
                continue;
            }
            groups.entry(cert.lastap[i]).or_default().push(i);
        }
        groups
    }
}
