//! Graph-mutating operations: deletion, rewiring, contraction.
//!
//! `del_arc` and `remove_node` keep adjacency-list removal O(1) by
//! swap-removing against the cached `pin`/`pout` positions and fixing up
//! the position of whichever arc got swapped into the vacated slot.

use super::types::Instance;

impl Instance {
    /// Appends a brand-new arc, growing `m` by one. Used only when building
    /// an auxiliary instance (the bigM copy) that needs arcs beyond the
    /// original input, never during ordinary reduction.
    pub fn push_arc(&mut self, tail: usize, head: usize, cost: f64, opposite: Option<usize>) -> usize {
        let ij = self.m;
        self.m += 1;
        self.tail.push(tail);
        self.head.push(head);
        self.c.push(cost);
        self.opposite.push(opposite);
        self.fe0.push(false);
        self.bmaa.push(vec![ij]);
        self.pout.push(self.dout[tail].len());
        self.dout[tail].push(ij);
        self.pin.push(self.din[head].len());
        self.din[head].push(ij);
        ij
    }

    /// Removes `ij` from both adjacency lists in O(1) and marks it `fe0`.
    /// The symmetric partner's `opposite` link, if any, is cleared.
    pub fn del_arc(&mut self, ij: usize) {
        if self.fe0[ij] {
            return;
        }
        let h = self.head[ij];
        let t = self.tail[ij];
        swap_remove_tracked(&mut self.din[h], &mut self.pin, self.pin[ij]);
        swap_remove_tracked(&mut self.dout[t], &mut self.pout, self.pout[ij]);
        self.fe0[ij] = true;
        if let Some(ji) = self.opposite[ij] {
            self.opposite[ji] = None;
            self.opposite[ij] = None;
        }
    }

    /// Marks `i` fixed-out and deletes every arc incident to it. Does not
    /// touch `offset`; callers that want revenue accounting (the reduction
    /// callers) add `p[i]` to `offset` themselves.
    pub fn remove_node(&mut self, i: usize) {
        if self.f0[i] {
            return;
        }
        self.f0[i] = true;
        let incident: Vec<usize> = self.din[i].iter().chain(self.dout[i].iter()).copied().collect();
        for ij in incident {
            self.del_arc(ij);
        }
    }

    /// Rewires `ij`'s head to `k`, fixing up adjacency lists.
    pub fn move_head(&mut self, ij: usize, k: usize) {
        let old_head = self.head[ij];
        swap_remove_tracked(&mut self.din[old_head], &mut self.pin, self.pin[ij]);
        self.pin[ij] = self.din[k].len();
        self.din[k].push(ij);
        self.head[ij] = k;
    }

    /// Rewires `ij`'s tail to `k`, fixing up adjacency lists.
    pub fn move_tail(&mut self, ij: usize, k: usize) {
        let old_tail = self.tail[ij];
        swap_remove_tracked(&mut self.dout[old_tail], &mut self.pout, self.pout[ij]);
        self.pout[ij] = self.dout[k].len();
        self.dout[k].push(ij);
        self.tail[ij] = k;
    }

    /// Contracts arc `ij` by merging `j` into `i`: deletes every arc
    /// between `i` and `j`, reroutes every other arc touching `j` so it
    /// touches `i` instead, and updates the back-mapping. Parallel arcs
    /// created by the rewiring are deduplicated: the cheaper of a pair
    /// survives, ties broken by lower index.
    pub fn merge(&mut self, ij: usize, i: usize, j: usize) {
        debug_assert_eq!(self.tail[ij], i);
        debug_assert_eq!(self.head[ij], j);

        self.update_backmap_merge(i, j);

        let between: Vec<usize> = self.din[i].iter().chain(self.dout[i].iter())
            .copied()
            .filter(|&a| (self.tail[a] == j && self.head[a] == i) || (self.tail[a] == i && self.head[a] == j))
            .collect();
        for a in between {
            self.del_arc(a);
        }

        let incident_j: Vec<usize> = self.din[j].iter().chain(self.dout[j].iter()).copied().collect();
        for a in incident_j {
            if self.fe0[a] {
                continue;
            }
            if self.tail[a] == j {
                self.move_tail(a, i);
            } else {
                debug_assert_eq!(self.head[a], j);
                self.move_head(a, i);
            }
        }

        self.dedup_parallel_arcs(i);
        self.f0[j] = true;
    }

    /// After rewiring arcs onto `i`, remove duplicate same-direction
    /// parallel arcs between `i` and any neighbor, keeping the cheaper one
    /// (ties broken by lower arc index).
    fn dedup_parallel_arcs(&mut self, i: usize) {
        use std::collections::HashMap;

        let mut best_out: HashMap<usize, usize> = HashMap::new();
        for &a in &self.dout[i] {
            if self.fe0[a] {
                continue;
            }
            let h = self.head[a];
            match best_out.get(&h) {
                None => {
                    best_out.insert(h, a);
                }
                Some(&cur) => {
                    let (keep, drop) = cheaper(self, cur, a);
                    best_out.insert(h, keep);
                    self.del_arc(drop);
                }
            }
        }

        let mut best_in: HashMap<usize, usize> = HashMap::new();
        for &a in &self.din[i] {
            if self.fe0[a] {
                continue;
            }
            let t = self.tail[a];
            match best_in.get(&t) {
                None => {
                    best_in.insert(t, a);
                }
                Some(&cur) => {
                    let (keep, drop) = cheaper(self, cur, a);
                    best_in.insert(t, keep);
                    self.del_arc(drop);
                }
            }
        }

        fn cheaper(inst: &Instance, a: usize, b: usize) -> (usize, usize) {
            if inst.c[b] < inst.c[a] || (inst.c[b] == inst.c[a] && b < a) {
                (b, a)
            } else {
                (a, b)
            }
        }
    }

    /// Convenience wrapper around `merge` that contracts `ji` by folding
    /// the head's revenue/terminal/fixed-in flags into the tail, for the
    /// caller's "contract this terminal into its only neighbor" reductions.
    pub fn contract_arc(&mut self, ji: usize) {
        let survivor = self.tail[ji];
        let absorbed = self.head[ji];
        let p_absorbed = self.p[absorbed];
        self.p[survivor] += p_absorbed;
        self.p[absorbed] = 0.0;
        if self.t[absorbed] {
            self.t[survivor] = true;
        }
        if self.f1[absorbed] {
            self.f1[survivor] = true;
        }
        self.merge(ji, survivor, absorbed);
    }

    /// Increases `p[i]` by `val`, returning `val` (uniform with
    /// `decrease_revenue`'s "return the delta" contract).
    pub fn increase_revenue(&mut self, i: usize, val: f64) -> f64 {
        self.p[i] += val;
        val
    }

    /// Zeroes `p[i]`, returning the amount removed.
    pub fn decrease_revenue(&mut self, i: usize) -> f64 {
        let old = self.p[i];
        self.p[i] = 0.0;
        old
    }

    /// Total revenue of nodes unreachable from `start` via live out-arcs,
    /// ignoring fixed-out nodes.
    pub fn nonreachable_revenue(&self, start: usize) -> f64 {
        let reach = self.reachable_from(start);
        (0..self.n)
            .filter(|&i| !self.f0[i] && !reach[i])
            .map(|i| self.p[i])
            .sum()
    }

    /// Number of fixed-in nodes reachable from `r` via live out-arcs.
    pub fn count_reachable_fixed(&self, r: usize) -> usize {
        let reach = self.reachable_from(r);
        (0..self.n).filter(|&i| self.f1[i] && reach[i]).count()
    }

    /// BFS reachability from `start` over live out-arcs, skipping fixed-out
    /// nodes.
    pub fn reachable_from(&self, start: usize) -> Vec<bool> {
        let mut visited = vec![false; self.n];
        if self.f0[start] {
            return visited;
        }
        visited[start] = true;
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            for &ij in &self.dout[i] {
                if self.fe0[ij] {
                    continue;
                }
                let j = self.head[ij];
                if self.f0[j] || visited[j] {
                    continue;
                }
                visited[j] = true;
                stack.push(j);
            }
        }
        visited
    }
}

/// Swap-remove `pos` from `list`, fixing up `positions[list[pos_after_swap]]`
/// if an element was moved into the vacated slot.
fn swap_remove_tracked(list: &mut Vec<usize>, positions: &mut [usize], pos: usize) {
    let last = list.len() - 1;
    list.swap(pos, last);
    list.pop();
    if pos < list.len() {
        let moved_arc = list[pos];
        positions[moved_arc] = pos;
    }
}
