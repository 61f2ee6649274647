//! Revenue-preserving cost shift: moves weight from a node's incoming arcs
//! onto its outgoing arcs (or vice versa), without changing which
//! arborescences are feasible or what they cost.

use crate::instance::Instance;

impl Instance {
    /// For every non-root node with at least one live incoming arc, finds
    /// `m = min` incoming-arc cost, subtracts `m` from every incoming arc
    /// and adds `m` to every outgoing arc. Reports whether anything moved.
    pub fn cost_shift(&mut self) -> bool {
        self.cost_shift_direction(true)
    }

    /// As [`Instance::cost_shift`], but shifts weight from outgoing arcs
    /// onto incoming ones when `forward` is `false`.
    pub fn cost_shift_direction(&mut self, forward: bool) -> bool {
        let mut changed = false;
        for i in 0..self.n {
            if self.f0[i] || Some(i) == self.r {
                continue;
            }
            let (from, to): (&[usize], &[usize]) =
                if forward { (&self.din[i], &self.dout[i]) } else { (&self.dout[i], &self.din[i]) };
            let from: Vec<usize> = from.iter().copied().filter(|&ij| !self.fe0[ij]).collect();
            let to: Vec<usize> = to.iter().copied().filter(|&ij| !self.fe0[ij]).collect();
            if from.is_empty() {
                continue;
            }
            let m = from.iter().map(|&ij| self.c[ij]).fold(f64::INFINITY, f64::min);
            if m <= 0.0 {
                continue;
            }
            for ij in from {
                self.c[ij] -= m;
            }
            for ij in to {
                self.c[ij] += m;
            }
            changed = true;
        }
        changed
    }
}
