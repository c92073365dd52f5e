//! Service behavior against both store backends

use familybook::{
    ChainResolver, FamilyError, FamilyService, InMemoryStore, MemberAttributes, NetworkStore,
    RelationshipType, SqliteStore,
};
use std::sync::Arc;

/// Build the four-generation family used by several tests:
///
///   Grandma ─parent→ Mom ─sibling→ Aunt ─parent→ Cousin
///                     └─parent→ Me
fn seed(service: &FamilyService) -> (String, Vec<String>) {
    let network = service.create_network("Seed", "Grandma", None).unwrap();
    let grandma = network.members()[0].id.clone();

    let mut ids = vec![grandma];
    for name in ["Mom", "Aunt", "Me", "Cousin"] {
        ids.push(
            service
                .add_member(&network.id, MemberAttributes::named(name))
                .unwrap()
                .id,
        );
    }

    let (grandma, mom, aunt, me, cousin) = (&ids[0], &ids[1], &ids[2], &ids[3], &ids[4]);
    for (from, to, kind) in [
        (grandma, mom, RelationshipType::Parent),
        (mom, aunt, RelationshipType::Sibling),
        (mom, me, RelationshipType::Parent),
        (aunt, cousin, RelationshipType::Parent),
    ] {
        service.add_relationship(&network.id, from, to, kind).unwrap();
    }

    (network.id, ids)
}

fn exercise(store: Arc<dyn NetworkStore>) {
    let service = FamilyService::new(store);
    let (network_id, ids) = seed(&service);
    let (grandma, mom, aunt, me, cousin) = (&ids[0], &ids[1], &ids[2], &ids[3], &ids[4]);

    let chain = service.find_relationship_chain(&network_id, me, aunt).unwrap();
    assert_eq!(chain.summary, "child's sibling");

    let chain = service.find_relationship_chain(&network_id, me, cousin).unwrap();
    assert_eq!(chain.chain.len(), 4);
    assert_eq!(chain.summary, "Connected through 2 intermediate family member(s)");

    let chain = service.find_relationship_chain(&network_id, grandma, grandma).unwrap();
    assert_eq!(chain.summary, "Same person.");

    let chain = service.find_relationship_chain(&network_id, mom, me).unwrap();
    assert_eq!(chain.summary, "parent");

    let err = service
        .add_relationship(&network_id, me, "ghost", RelationshipType::Cousin)
        .unwrap_err();
    assert!(matches!(err, FamilyError::MemberNotFound(_)));

    let network = service.get_network(&network_id).unwrap();
    for member in network.members() {
        for edge in network.graph.neighbors(&member.id) {
            let expected = edge.relationship.reciprocal();
            let back = network.graph.neighbors(&edge.member_id);
            assert!(
                back.iter()
                    .any(|e| e.member_id == member.id && e.relationship == expected),
                "one-sided edge from {}",
                member.name()
            );
        }
    }
}

#[test]
fn test_in_memory_store() {
    exercise(Arc::new(InMemoryStore::new()));
}

#[test]
fn test_sqlite_store() {
    exercise(Arc::new(SqliteStore::open_in_memory().unwrap()));
}

#[test]
fn test_sqlite_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("family.db");

    let (network_id, ids) = {
        let service = FamilyService::new(Arc::new(SqliteStore::open(&path).unwrap()));
        seed(&service)
    };

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.count().unwrap(), 1);

    let network = store.get_network(&network_id).unwrap().unwrap();
    assert_eq!(network.member_count(), 5);

    let resolver = ChainResolver::new(&network.graph);
    let path = resolver.find_shortest_chain(&ids[4], &ids[0]);
    assert_eq!(path.len(), 4);
    assert_eq!(
        network.graph.relationship_between(&ids[4], &ids[2]),
        Some(&RelationshipType::Child)
    );
}

#[test]
fn test_duplicate_relationships_survive_persistence() {
    let service = FamilyService::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
    let network = service.create_network("Dup", "A", None).unwrap();
    let a = network.members()[0].id.clone();
    let b = service
        .add_member(&network.id, MemberAttributes::named("B"))
        .unwrap()
        .id;

    for _ in 0..2 {
        service
            .add_relationship(&network.id, &a, &b, RelationshipType::Spouse)
            .unwrap();
    }

    let stored = service.get_network(&network.id).unwrap();
    assert_eq!(stored.graph.neighbors(&a).len(), 2);
    assert_eq!(stored.graph.neighbors(&b).len(), 2);
}
