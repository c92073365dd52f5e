//! Query surface consumed by the CLI and HTTP layers.
//!
//! Every mutation is a load → mutate → save cycle under one lock per network,
//! so concurrent writers to the same network are serialized and a reader only
//! ever sees snapshots with complete reciprocal edge pairs.

use crate::chain::RelationshipChain;
use crate::error::{FamilyError, Result};
use crate::member::{Member, MemberAttributes};
use crate::network::{FamilyNetwork, NetworkSummary};
use crate::relationship::RelationshipType;
use crate::store::NetworkStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

pub struct FamilyService {
    store: Arc<dyn NetworkStore>,

    /// network id → write lock for that network
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FamilyService {
    pub fn new(store: Arc<dyn NetworkStore>) -> Self {
        FamilyService {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn network_lock(&self, network_id: &str) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| FamilyError::Poisoned(e.to_string()))?;
        Ok(locks
            .entry(network_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    /// Load, mutate and save one network while holding its lock.
    /// Nothing is saved if `mutate` fails.
    pub fn apply<T>(
        &self,
        network_id: &str,
        mutate: impl FnOnce(&mut FamilyNetwork) -> Result<T>,
    ) -> Result<T> {
        // Networks are never deleted, so an id that exists now still exists
        // once the lock is held. Unknown ids never get a lock entry.
        self.require_network(network_id)?;

        let lock = self.network_lock(network_id)?;
        let _guard = lock
            .lock()
            .map_err(|e| FamilyError::Poisoned(e.to_string()))?;

        let mut network = self.require_network(network_id)?;
        let value = mutate(&mut network)?;
        self.store.save_network(&network)?;
        Ok(value)
    }

    fn require_network(&self, network_id: &str) -> Result<FamilyNetwork> {
        self.store
            .get_network(network_id)?
            .ok_or_else(|| FamilyError::NetworkNotFound(network_id.to_string()))
    }

    // ------------------------------------------------------------------------
    // Networks
    // ------------------------------------------------------------------------

    pub fn create_network(
        &self,
        name: &str,
        creator_name: &str,
        description: Option<String>,
    ) -> Result<FamilyNetwork> {
        let network = FamilyNetwork::new(name, creator_name, description)?;
        self.store.save_network(&network)?;
        info!(network_id = %network.id, name = %network.name, "created family network");
        Ok(network)
    }

    pub fn get_network(&self, network_id: &str) -> Result<FamilyNetwork> {
        self.require_network(network_id)
    }

    pub fn list_networks(&self) -> Result<Vec<NetworkSummary>> {
        self.store.list_networks()
    }

    // ------------------------------------------------------------------------
    // Members & relationships
    // ------------------------------------------------------------------------

    pub fn add_member(&self, network_id: &str, attributes: MemberAttributes) -> Result<Member> {
        let member = self.apply(network_id, |network| network.add_member(attributes))?;
        info!(network_id, member_id = %member.id, "added family member");
        Ok(member)
    }

    /// Add a member and, in the same write, relate them to an existing one.
    /// If the relationship is rejected the member is not added either.
    pub fn add_related_member(
        &self,
        network_id: &str,
        attributes: MemberAttributes,
        related_to: &str,
        kind: RelationshipType,
    ) -> Result<Member> {
        let member = self.apply(network_id, |network| {
            let member = network.add_member(attributes)?;
            network.add_relationship(&member.id, related_to, kind)?;
            Ok(member)
        })?;
        info!(network_id, member_id = %member.id, related_to, "added related family member");
        Ok(member)
    }

    pub fn add_relationship(
        &self,
        network_id: &str,
        from: &str,
        to: &str,
        kind: RelationshipType,
    ) -> Result<()> {
        let label = kind.to_string();
        let result = self.apply(network_id, |network| network.add_relationship(from, to, kind));

        match &result {
            Ok(()) => info!(network_id, from, to, relationship = %label, "added relationship"),
            Err(e) => warn!(
                network_id,
                from,
                to,
                relationship = %label,
                error = %e,
                "relationship rejected"
            ),
        }

        result
    }

    /// Shortest chain between two members.
    ///
    /// Unknown members yield an empty chain; only an unknown network is an error.
    pub fn find_relationship_chain(
        &self,
        network_id: &str,
        from: &str,
        to: &str,
    ) -> Result<RelationshipChain> {
        let network = self.require_network(network_id)?;
        let chain = network.relationship_chain(from, to);
        debug!(network_id, from, to, links = chain.chain.len(), "chain query");
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn service() -> FamilyService {
        FamilyService::new(Arc::new(InMemoryStore::new()))
    }

    #[test]
    fn test_create_and_get_network() {
        let service = service();
        let network = service.create_network("Brontë", "Patrick", None).unwrap();

        let loaded = service.get_network(&network.id).unwrap();
        assert_eq!(loaded.name, "Brontë");
        assert_eq!(loaded.member_count(), 1);
    }

    #[test]
    fn test_unknown_network_is_not_found() {
        let service = service();

        let err = service.get_network("nope").unwrap_err();
        assert!(matches!(err, FamilyError::NetworkNotFound(_)));

        let err = service.find_relationship_chain("nope", "a", "b").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_relationship_persists_between_calls() {
        let service = service();
        let network = service.create_network("Brontë", "Patrick", None).unwrap();
        let patrick = network.members()[0].id.clone();
        let emily = service
            .add_member(&network.id, MemberAttributes::named("Emily"))
            .unwrap();

        service
            .add_relationship(&network.id, &patrick, &emily.id, RelationshipType::Parent)
            .unwrap();

        let chain = service
            .find_relationship_chain(&network.id, &emily.id, &patrick)
            .unwrap();
        assert_eq!(chain.summary, "child");
    }

    #[test]
    fn test_rejected_relationship_leaves_network_unchanged() {
        let service = service();
        let network = service.create_network("Brontë", "Patrick", None).unwrap();
        let patrick = network.members()[0].id.clone();

        let err = service
            .add_relationship(&network.id, &patrick, "ghost", RelationshipType::Sibling)
            .unwrap_err();
        assert!(matches!(err, FamilyError::MemberNotFound(_)));

        let loaded = service.get_network(&network.id).unwrap();
        assert_eq!(loaded.graph.edge_count(), 0);
    }

    #[test]
    fn test_add_related_member_is_atomic() {
        let service = service();
        let network = service.create_network("Brontë", "Patrick", None).unwrap();
        let patrick = network.members()[0].id.clone();

        let anne = service
            .add_related_member(
                &network.id,
                MemberAttributes::named("Anne"),
                &patrick,
                RelationshipType::Child,
            )
            .unwrap();
        let loaded = service.get_network(&network.id).unwrap();
        assert_eq!(
            loaded.graph.relationship_between(&patrick, &anne.id),
            Some(&RelationshipType::Parent)
        );

        let err = service
            .add_related_member(
                &network.id,
                MemberAttributes::named("Branwell"),
                "ghost",
                RelationshipType::Sibling,
            )
            .unwrap_err();
        assert!(matches!(err, FamilyError::MemberNotFound(_)));
        assert_eq!(service.get_network(&network.id).unwrap().member_count(), 2);
    }

    #[test]
    fn test_chain_with_unknown_member_is_empty() {
        let service = service();
        let network = service.create_network("Brontë", "Patrick", None).unwrap();
        let patrick = network.members()[0].id.clone();

        let chain = service
            .find_relationship_chain(&network.id, &patrick, "nobody")
            .unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_writes_to_unknown_networks_leave_no_locks() {
        let service = service();

        for i in 0..100 {
            let network_id = format!("unknown-{}", i);
            let err = service
                .add_relationship(&network_id, "a", "b", RelationshipType::Sibling)
                .unwrap_err();
            assert!(matches!(err, FamilyError::NetworkNotFound(_)));
            assert!(service
                .add_member(&network_id, MemberAttributes::named("Nobody"))
                .is_err());
        }

        assert_eq!(service.locks.lock().unwrap().len(), 0);

        let network = service.create_network("Brontë", "Patrick", None).unwrap();
        service
            .add_member(&network.id, MemberAttributes::named("Emily"))
            .unwrap();
        assert_eq!(service.locks.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_edges() {
        let service = Arc::new(service());
        let network = service.create_network("Brontë", "Patrick", None).unwrap();
        let patrick = network.members()[0].id.clone();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                let network_id = network.id.clone();
                let patrick = patrick.clone();
                std::thread::spawn(move || {
                    let name = format!("Child {}", i);
                    let child = service
                        .add_member(&network_id, MemberAttributes::named(name))
                        .unwrap();
                    service
                        .add_relationship(
                            &network_id,
                            &patrick,
                            &child.id,
                            RelationshipType::Parent,
                        )
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let loaded = service.get_network(&network.id).unwrap();
        assert_eq!(loaded.member_count(), 9);
        assert_eq!(loaded.graph.neighbors(&patrick).len(), 8);
        assert_eq!(loaded.graph.edge_count(), 16);
    }
}
