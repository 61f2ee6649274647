//! Root enumeration for unrooted instances: `fix_term` prevents an already
//! processed root from being re-selected as a later one's connection point.

use crate::instance::Instance;

/// After root `k` has been processed, inflates every arc incident to `k` to
/// an effectively infinite cost and zeroes its revenue, so later root
/// candidates no longer see `k` as a profitable detour — dapcstp's
/// `fixTerm`, applied only for symmetric instances (an asymmetric instance
/// can still profitably reach `k` through a one-way arc a later root
/// wouldn't otherwise have).
pub fn fix_term(inst: &mut Instance, k: usize) {
    let incident: Vec<usize> = inst.din[k].iter().chain(inst.dout[k].iter()).copied().collect();
    for ij in incident {
        if !inst.fe0[ij] {
            inst.c[ij] = crate::W_MAX;
        }
    }
    inst.p[k] = 0.0;
}
