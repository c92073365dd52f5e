//! Network stores.
//!
//! The core never performs I/O itself: a store hands out a network snapshot,
//! the caller mutates it in memory and hands it back to be saved.

use crate::error::{FamilyError, Result};
use crate::network::{FamilyNetwork, NetworkSummary};
use std::collections::HashMap;
use std::sync::RwLock;

/// Snapshot persistence for family networks
pub trait NetworkStore: Send + Sync {
    /// Load a network snapshot, `None` if the id is unknown
    fn get_network(&self, id: &str) -> Result<Option<FamilyNetwork>>;

    /// Insert or replace the stored snapshot
    fn save_network(&self, network: &FamilyNetwork) -> Result<()>;

    /// All stored networks, oldest first
    fn list_networks(&self) -> Result<Vec<NetworkSummary>>;
}

/// Process-local store. Lives as long as the component that owns it.
#[derive(Default)]
pub struct InMemoryStore {
    networks: RwLock<HashMap<String, FamilyNetwork>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NetworkStore for InMemoryStore {
    fn get_network(&self, id: &str) -> Result<Option<FamilyNetwork>> {
        let networks = self
            .networks
            .read()
            .map_err(|e| FamilyError::Poisoned(e.to_string()))?;
        Ok(networks.get(id).cloned())
    }

    fn save_network(&self, network: &FamilyNetwork) -> Result<()> {
        let mut networks = self
            .networks
            .write()
            .map_err(|e| FamilyError::Poisoned(e.to_string()))?;
        networks.insert(network.id.clone(), network.clone());
        Ok(())
    }

    fn list_networks(&self) -> Result<Vec<NetworkSummary>> {
        let networks = self
            .networks
            .read()
            .map_err(|e| FamilyError::Poisoned(e.to_string()))?;

        let mut summaries: Vec<NetworkSummary> =
            networks.values().map(FamilyNetwork::summary).collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::MemberAttributes;

    #[test]
    fn test_get_unknown_network() {
        let store = InMemoryStore::new();
        assert!(store.get_network("nope").unwrap().is_none());
    }

    #[test]
    fn test_save_then_get_returns_snapshot() {
        let store = InMemoryStore::new();
        let mut network = FamilyNetwork::new("Curie", "Marie", None).unwrap();
        store.save_network(&network).unwrap();

        // Mutating the local copy does not touch the stored snapshot
        network.add_member(MemberAttributes::named("Pierre")).unwrap();
        assert_eq!(store.get_network(&network.id).unwrap().unwrap().member_count(), 1);

        store.save_network(&network).unwrap();
        assert_eq!(store.get_network(&network.id).unwrap().unwrap().member_count(), 2);
    }

    #[test]
    fn test_list_networks() {
        let store = InMemoryStore::new();
        store
            .save_network(&FamilyNetwork::new("Curie", "Marie", None).unwrap())
            .unwrap();
        store
            .save_network(&FamilyNetwork::new("Darwin", "Charles", None).unwrap())
            .unwrap();

        let summaries = store.list_networks().unwrap();
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.member_count == 1));
    }
}
