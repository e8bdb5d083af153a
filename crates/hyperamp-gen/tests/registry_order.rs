use hyperamp_core::VertexId;
use hyperamp_gen::{IdConfig, Registry};

fn registry_with(vertices: usize, budget: u64) -> (Registry, Vec<VertexId>) {
    let mut registry = Registry::new(&IdConfig::default());
    let ids = (0..vertices)
        .map(|_| registry.register_vertex(budget).unwrap())
        .collect();
    (registry, ids)
}

fn is_ascending(ids: &[VertexId]) -> bool {
    ids.windows(2).all(|pair| pair[0] < pair[1])
}

#[test]
fn eviction_keeps_generation_order() {
    let (mut registry, ids) = registry_with(6, 1);
    registry.consume(ids[0]).unwrap();

    assert_eq!(registry.active_ids(), ids[1..].to_vec());
    assert_eq!(registry.active_at(0), None);
    assert_eq!(registry.active_at(1), Some(ids[1]));
    assert_eq!(registry.active_len(), 5);

    registry.consume(ids[3]).unwrap();
    let active = registry.active_ids();
    assert!(is_ascending(&active));
    assert_eq!(active, vec![ids[1], ids[2], ids[4], ids[5]]);
}

#[test]
fn compaction_preserves_order_once_tombstones_dominate() {
    let (mut registry, ids) = registry_with(10, 1);
    for vid in &ids[..5] {
        registry.consume(*vid).unwrap();
    }
    assert_eq!(registry.slot_count(), 10);

    registry.consume(ids[7]).unwrap();
    assert_eq!(registry.slot_count(), 4);
    assert_eq!(registry.active_ids(), vec![ids[5], ids[6], ids[8], ids[9]]);
    assert_eq!(registry.active_at(2), Some(ids[8]));
}

#[test]
fn recredit_revives_a_tombstone_in_place() {
    let (mut registry, ids) = registry_with(6, 1);
    registry.consume(ids[2]).unwrap();
    registry.recredit(ids[2], 4).unwrap();

    assert_eq!(registry.active_ids(), ids);
    assert_eq!(registry.budget(ids[2]), Some(4));
    assert_eq!(registry.active_len(), 6);
}

#[test]
fn recredit_after_compaction_appends() {
    let (mut registry, ids) = registry_with(4, 1);
    for vid in &ids[..3] {
        registry.consume(*vid).unwrap();
    }
    assert_eq!(registry.active_ids(), vec![ids[3]]);
    assert_eq!(registry.slot_count(), 1);

    registry.recredit(ids[0], 2).unwrap();
    assert_eq!(registry.active_ids(), vec![ids[3], ids[0]]);
}

#[test]
fn consuming_an_evicted_vertex_is_an_invariant_violation() {
    let (mut registry, ids) = registry_with(3, 1);
    registry.consume(ids[1]).unwrap();
    let err = registry.consume(ids[1]).unwrap_err();
    assert_eq!(err.info().code, "unknown-vertex");

    let unminted = VertexId::from_raw(ids[2].as_raw() + 1);
    assert_eq!(
        registry.recredit(unminted, 1).unwrap_err().info().code,
        "unknown-vertex"
    );
}
