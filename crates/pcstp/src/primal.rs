//! Primal heuristics: a greedy grow-and-prune constructor (`prim_i`), an
//! exact directed minimum spanning arborescence (`dmst`, Chu-Liu/Edmonds),
//! and the support-graph cost-vector helpers the B&B driver threads
//! between dual ascent and these two.

use crate::instance::Instance;
use crate::solution::Solution;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Returns a cost vector where every arc with `cr[ij] > dasat` is pushed to
/// an effectively-infinite cost, so a heuristic run against it only ever
/// considers the dual-ascent support graph.
pub fn set_support_graph(inst: &Instance, cr: &[f64], dasat: f64) -> Vec<f64> {
    set_support_graph_f(inst, cr, dasat, crate::W_MAX - 1.0)
}

/// As [`set_support_graph`], with an explicit sentinel cost instead of
/// `W_MAX - 1`.
pub fn set_support_graph_f(inst: &Instance, cr: &[f64], dasat: f64, sentinel: f64) -> Vec<f64> {
    (0..inst.m).map(|ij| if cr[ij] > dasat { sentinel } else { inst.c[ij] }).collect()
}

/// Perturbs `c` by `±heureps`: arcs in `incumbent` get cheaper (encourages
/// reuse), every other live arc gets pricier (encourages exploring
/// alternatives), clamped at zero. Diversifies repeated `prim_i` calls
/// across B&B nodes guided by different incumbents.
pub fn perturb_costs(inst: &Instance, base: &[f64], incumbent: Option<&Solution>, heureps: f64, rng: &mut StdRng) -> Vec<f64> {
    (0..inst.m)
        .map(|ij| {
            if inst.fe0[ij] {
                return base[ij];
            }
            let in_incumbent = incumbent.map_or(false, |s| s.arcs.get(ij).copied().unwrap_or(false));
            let jitter = rng.gen_range(0.0..heureps);
            let sign = if in_incumbent { -1.0 } else { 1.0 };
            (base[ij] * (1.0 + sign * jitter)).max(0.0)
        })
        .collect()
}

/// Greedy constructive heuristic: grows a spanning tree from `r` over
/// reachable live nodes by repeatedly attaching the cheapest arc from the
/// current tree to an unreached node (a directed Prim variant), then prunes
/// it bottom-up, dropping any subtree whose net contribution (its own
/// prize plus its kept children's net contributions, minus the cost of the
/// arc that attaches it) is not positive.
pub fn prim_i(inst: &Instance, r: usize, cost: &[f64]) -> Solution {
    let n = inst.n;
    let mut in_tree = vec![false; n];
    let mut parent_arc: Vec<Option<usize>> = vec![None; n];
    let mut order = vec![r];
    in_tree[r] = true;

    // Frontier of (cost, arc_idx) candidates, refreshed lazily: we keep a
    // simple candidate list and rescan, which is adequate at the instance
    // sizes this heuristic runs on (called many times per B&B node, but
    // never on a hot inner loop the way dual ascent is).
    loop {
        let mut best: Option<(f64, usize)> = None;
        for &i in &order {
            for &ij in &inst.dout[i] {
                if inst.fe0[ij] {
                    continue;
                }
                let h = inst.head[ij];
                if in_tree[h] || inst.f0[h] {
                    continue;
                }
                if best.map_or(true, |(bc, _)| cost[ij] < bc) {
                    best = Some((cost[ij], ij));
                }
            }
        }
        let Some((_, ij)) = best else { break };
        let h = inst.head[ij];
        in_tree[h] = true;
        parent_arc[h] = Some(ij);
        order.push(h);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &i in &order {
        if let Some(ij) = parent_arc[i] {
            children[inst.tail[ij]].push(i);
        }
    }

    let mut value = vec![0.0_f64; n];
    for &i in order.iter().rev() {
        let mut v = inst.p[i];
        for &c in &children[i] {
            let arc = parent_arc[c].unwrap();
            let net = value[c] - cost[arc];
            if net > 0.0 || inst.f1[c] || inst.t[c] {
                v += net.max(0.0);
            }
        }
        value[i] = v;
    }

    let mut sol = Solution::empty(inst);
    sol.r = Some(r);
    sol.nodes[r] = true;
    let mut stack = vec![r];
    while let Some(i) = stack.pop() {
        for &c in &children[i] {
            let arc = parent_arc[c].unwrap();
            let net = value[c] - cost[arc];
            if net > 0.0 || inst.f1[c] || inst.t[c] {
                sol.nodes[c] = true;
                sol.arcs[arc] = true;
                stack.push(c);
            }
        }
    }
    sol.recompute_objective(inst);
    sol
}

/// Edmonds' (Chu-Liu) minimum-cost spanning arborescence rooted at `r`,
/// restricted to live nodes reachable from `r`. Returns `None` if some live
/// required node is unreachable. `cost` indexes by `Instance` arc id.
pub fn dmst(inst: &Instance, r: usize, cost: &[f64]) -> Option<Solution> {
    let reach = inst.reachable_from(r);
    let live_nodes: Vec<usize> = (0..inst.n).filter(|&i| !inst.f0[i] && reach[i]).collect();
    if (0..inst.n).any(|i| (inst.f1[i] || inst.t[i]) && !inst.f0[i] && !reach[i]) {
        return None;
    }

    let mut local_of = vec![usize::MAX; inst.n];
    for (k, &i) in live_nodes.iter().enumerate() {
        local_of[i] = k;
    }
    let local_r = local_of[r];

    let mut edges: Vec<(usize, usize, f64)> = Vec::new();
    let mut edge_arc: Vec<usize> = Vec::new();
    for ij in 0..inst.m {
        if inst.fe0[ij] {
            continue;
        }
        let (t, h) = (inst.tail[ij], inst.head[ij]);
        if local_of[t] == usize::MAX || local_of[h] == usize::MAX {
            continue;
        }
        edges.push((local_of[t], local_of[h], cost[ij]));
        edge_arc.push(ij);
    }

    let (_, chosen) = min_arborescence(live_nodes.len(), local_r, &edges)?;

    let mut sol = Solution::empty(inst);
    sol.r = Some(r);
    sol.nodes[r] = true;
    for (_, &new_edge_idx) in chosen.iter() {
        let arc = edge_arc[new_edge_idx];
        sol.arcs[arc] = true;
        sol.nodes[inst.tail[arc]] = true;
        sol.nodes[inst.head[arc]] = true;
    }
    sol.recompute_objective(inst);
    Some(sol)
}

/// Chu-Liu/Edmonds' minimum spanning arborescence over a plain `(tail,
/// head, cost)` edge list, rooted at `root`. Returns the total cost and a
/// map from each non-root node to the index (into `edges`) of its chosen
/// incoming edge. `None` if some node is unreachable.
fn min_arborescence(n: usize, root: usize, edges: &[(usize, usize, f64)]) -> Option<(f64, HashMap<usize, usize>)> {
    let mut min_in: Vec<Option<(f64, usize)>> = vec![None; n];
    for (idx, &(u, v, w)) in edges.iter().enumerate() {
        if u == v || v == root {
            continue;
        }
        if min_in[v].map_or(true, |(mw, _)| w < mw) {
            min_in[v] = Some((w, idx));
        }
    }
    if (0..n).any(|v| v != root && min_in[v].is_none()) {
        return None;
    }
    let base_cost: f64 = (0..n).filter(|&v| v != root).map(|v| min_in[v].unwrap().0).sum();

    let mut state = vec![0u8; n];
    let mut cycle: Option<Vec<usize>> = None;
    'outer: for start in 0..n {
        if state[start] != 0 {
            continue;
        }
        let mut path = Vec::new();
        let mut v = start;
        while v != root && state[v] == 0 {
            state[v] = 1;
            path.push(v);
            v = edges[min_in[v].unwrap().1].0;
        }
        if v != root && state[v] == 1 {
            let pos = path.iter().position(|&x| x == v).unwrap();
            cycle = Some(path[pos..].to_vec());
            break 'outer;
        }
        for &p in &path {
            state[p] = 2;
        }
    }

    let Some(cyc) = cycle else {
        let map = (0..n).filter(|&v| v != root).map(|v| (v, min_in[v].unwrap().1)).collect();
        return Some((base_cost, map));
    };

    let cyc_set: HashSet<usize> = cyc.iter().copied().collect();
    let mut remap = vec![usize::MAX; n];
    let mut inv = vec![usize::MAX; n];
    let mut next_id = 0;
    for v in 0..n {
        if !cyc_set.contains(&v) {
            remap[v] = next_id;
            inv[next_id] = v;
            next_id += 1;
        }
    }
    let super_id = next_id;
    next_id += 1;
    for &v in &cyc {
        remap[v] = super_id;
    }
    let new_root = remap[root];

    let mut new_edges = Vec::new();
    let mut origin = Vec::new();
    for (idx, &(u, v, w)) in edges.iter().enumerate() {
        if u == v {
            continue;
        }
        let cu = remap[u];
        let cv = remap[v];
        if cu == cv {
            continue;
        }
        let w2 = if cyc_set.contains(&v) { w - min_in[v].unwrap().0 } else { w };
        new_edges.push((cu, cv, w2));
        origin.push(idx);
    }

    let (sub_cost, sub_map) = min_arborescence(next_id, new_root, &new_edges)?;
    let cycle_internal_cost: f64 = cyc.iter().map(|&v| min_in[v].unwrap().0).sum();

    let mut result: HashMap<usize, usize> = HashMap::new();
    for &v in &cyc {
        result.insert(v, min_in[v].unwrap().1);
    }
    for (&node, &new_edge_idx) in sub_map.iter() {
        let orig_idx = origin[new_edge_idx];
        if node == super_id {
            let (_, v, _) = edges[orig_idx];
            result.insert(v, orig_idx);
        } else {
            result.insert(inv[node], orig_idx);
        }
    }

    Some((sub_cost + cycle_internal_cost, result))
}
