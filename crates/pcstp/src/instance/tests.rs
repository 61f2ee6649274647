use super::types::{ArcInput, Instance};
use crate::error::InstanceError;

fn tiny_triangle() -> Instance {
    // 0 -> 1 -> 2, 0 -> 2 (all directed, asymmetric).
    let arcs = vec![
        ArcInput::new(0, 1, 1.0),
        ArcInput::new(1, 2, 2.0),
        ArcInput::new(0, 2, 10.0),
    ];
    Instance::build(
        3,
        arcs,
        vec![0.0, 0.0, 0.0],
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
fn build_rejects_out_of_range_arc() {
    let arcs = vec![ArcInput::new(0, 5, 1.0)];
    let err = Instance::build(
        3,
        arcs,
        vec![0.0; 3],
        vec![false; 3],
        vec![false; 3],
        vec![false; 3],
        None,
        true,
        true,
        false,
    )
    .unwrap_err();
    assert_eq!(err, InstanceError::ArcEndpointOutOfRange { arc_index: 0, node: 5, n: 3 });
}

#[test]
fn build_rejects_conflicting_fix_flags() {
    let err = Instance::build(
        2,
        vec![],
        vec![0.0; 2],
        vec![false; 2],
        vec![true, false],
        vec![true, false],
        None,
        true,
        true,
        false,
    )
    .unwrap_err();
    assert_eq!(err, InstanceError::ConflictingFixFlags { node: 0 });
}

#[test]
fn build_rejects_negative_cost_and_revenue() {
    let err = Instance::build(
        2,
        vec![ArcInput::new(0, 1, -1.0)],
        vec![0.0; 2],
        vec![false; 2],
        vec![false; 2],
        vec![false; 2],
        None,
        true,
        true,
        false,
    )
    .unwrap_err();
    assert_eq!(err, InstanceError::NegativeArcCost { arc_index: 0, cost: -1.0 });
}

#[test]
fn del_arc_keeps_adjacency_consistent() {
    let mut inst = tiny_triangle();
    inst.del_arc(1); // 1->2
    assert!(inst.fe0[1]);
    assert!(!inst.dout[1].contains(&1));
    assert!(!inst.din[2].contains(&1));
    for &ij in &inst.dout[0] {
        assert_eq!(inst.pout[ij], inst.dout[inst.tail[ij]].iter().position(|&a| a == ij).unwrap());
    }
}

#[test]
fn merge_reroutes_arcs_and_dedups_parallel() {
    // 0->1 (cost 1), 1->2 (cost 2), 0->2 (cost 10): merging along 0->1
    // reroutes 1->2 into 0->2, creating a parallel pair with the existing
    // 0->2 (cost 10); the cheaper (cost 2) must survive.
    let mut inst = tiny_triangle();
    inst.merge(0, 0, 1);
    assert!(inst.f0[1]);
    let live_out_0: Vec<usize> = inst.dout[0].iter().copied().filter(|&ij| !inst.fe0[ij]).collect();
    assert_eq!(live_out_0.len(), 1);
    assert_eq!(inst.c[live_out_0[0]], 2.0);
    assert_eq!(inst.head[live_out_0[0]], 2);
}

#[test]
fn contract_arc_folds_revenue_and_flags() {
    let mut inst = tiny_triangle();
    inst.p[1] = 4.0;
    inst.t[1] = true;
    inst.contract_arc(0); // arc 0: 0->1
    assert_eq!(inst.p[0], 4.0);
    assert!(inst.t[0]);
    assert!(inst.f0[1]);
}

#[test]
fn reachable_from_skips_fixed_out_nodes() {
    let mut inst = tiny_triangle();
    inst.f0[1] = true;
    inst.del_arc(0);
    inst.del_arc(1);
    let reach = inst.reachable_from(0);
    assert!(reach[0]);
    assert!(!reach[1]);
    assert!(reach[2]); // still reachable via 0->2
}

#[test]
fn nonreachable_revenue_sums_unreached_nodes() {
    let mut inst = tiny_triangle();
    inst.p = vec![0.0, 3.0, 7.0];
    inst.del_arc(0); // disconnect 1 from 0
    inst.del_arc(1);
    assert_eq!(inst.nonreachable_revenue(0), 3.0);
}
