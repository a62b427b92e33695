use std::collections::BTreeMap;

use uncover_core::ElementId;
use uncover_graph::{mapping_hash, Mapping};

fn id(raw: u64) -> ElementId {
    ElementId::from_raw(raw)
}

#[test]
fn forward_and_inverse_lookup_stay_in_sync() {
    let mut mapping = Mapping::new();
    assert_eq!(mapping.insert(id(1), id(10)), None);
    mapping.insert(id(2), id(10));
    mapping.insert(id(3), id(11));

    assert_eq!(mapping.get(id(1)), Some(id(10)));
    assert_eq!(mapping.preimages(id(10)).collect::<Vec<_>>(), vec![id(1), id(2)]);
    assert_eq!(mapping.preimage_count(id(11)), 1);
    assert!(!mapping.is_injective());

    assert_eq!(mapping.insert(id(2), id(12)), Some(id(10)));
    assert_eq!(mapping.preimages(id(10)).collect::<Vec<_>>(), vec![id(1)]);
    assert!(mapping.is_injective());
}

#[test]
fn removal_by_source_and_target() {
    let mut mapping: Mapping = [(id(1), id(5)), (id(2), id(5)), (id(3), id(6))]
        .into_iter()
        .collect();
    let removed = mapping.remove_target(id(5));
    assert_eq!(removed.into_iter().collect::<Vec<_>>(), vec![id(1), id(2)]);
    assert!(!mapping.has_preimage(id(5)));
    assert_eq!(mapping.remove_source(id(3)), Some(id(6)));
    assert!(mapping.is_empty());
    assert_eq!(mapping.remove_source(id(3)), None);
}

#[test]
fn concat_composes_and_drops_unmapped() {
    let first: Mapping = [(id(1), id(10)), (id(2), id(11))].into_iter().collect();
    let second: Mapping = [(id(10), id(100))].into_iter().collect();
    let composite = first.concat(&second);
    assert_eq!(composite.len(), 1);
    assert_eq!(composite.get(id(1)), Some(id(100)));
    assert!(!composite.contains(id(2)));
}

#[test]
fn redirects_follow_merges() {
    let mut into_graph: Mapping = [(id(1), id(10)), (id(2), id(11)), (id(3), id(12))]
        .into_iter()
        .collect();
    let redirects: BTreeMap<_, _> = [(id(11), id(10)), (id(12), id(10))].into_iter().collect();
    into_graph.redirect_targets(&redirects);
    assert_eq!(into_graph.preimage_count(id(10)), 3);
    assert_eq!(into_graph.collisions().count(), 1);

    let mut out_of_graph: Mapping = [(id(10), id(7)), (id(11), id(7)), (id(12), id(8))]
        .into_iter()
        .collect();
    out_of_graph.redirect_sources(&redirects);
    assert_eq!(out_of_graph.len(), 1);
    assert_eq!(out_of_graph.get(id(10)), Some(id(7)));
}

#[test]
fn identity_and_hash() {
    let identity = Mapping::identity([id(4), id(9)]);
    assert_eq!(identity.domain().collect::<Vec<_>>(), vec![id(4), id(9)]);
    assert_eq!(identity.image().collect::<Vec<_>>(), vec![id(4), id(9)]);
    let same = Mapping::identity([id(9), id(4)]);
    assert_eq!(mapping_hash(&identity), mapping_hash(&same));
    assert_eq!(identity, same);
}
