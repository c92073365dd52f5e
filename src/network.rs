// 👨‍👩‍👧 Family Network - A named collection of members and their relationships
//
// A network owns exactly one RelationshipGraph. The whole record is the unit
// of persistence: stores load it, the service mutates it, stores save it back.

use crate::chain::{ChainResolver, RelationshipChain};
use crate::error::{FamilyError, Result};
use crate::graph::RelationshipGraph;
use crate::member::{Member, MemberAttributes};
use crate::relationship::RelationshipType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role given to the member that created the network
pub const CREATOR_ROLE: &str = "Creator";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyNetwork {
    /// Stable identity (UUID)
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Display name of the person who created the network
    pub created_by: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub graph: RelationshipGraph,
}

/// Listing entry, cheap to compute from a stored network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSummary {
    pub id: String,
    pub name: String,
    pub member_count: usize,
    pub created_at: DateTime<Utc>,
}

impl FamilyNetwork {
    /// Create a network whose first member is its creator
    pub fn new(name: &str, creator_name: &str, description: Option<String>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FamilyError::InvalidInput(
                "family name must not be empty".to_string(),
            ));
        }

        let mut graph = RelationshipGraph::new();
        graph.add_member(MemberAttributes::named(creator_name).with_role(CREATOR_ROLE))?;

        Ok(FamilyNetwork {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.filter(|d| !d.trim().is_empty()),
            created_by: creator_name.trim().to_string(),
            created_at: Utc::now(),
            graph,
        })
    }

    pub fn member_count(&self) -> usize {
        self.graph.len()
    }

    pub fn members(&self) -> &[Member] {
        self.graph.members()
    }

    pub fn add_member(&mut self, attributes: MemberAttributes) -> Result<Member> {
        self.graph.add_member(attributes)
    }

    pub fn add_relationship(
        &mut self,
        from: &str,
        to: &str,
        kind: RelationshipType,
    ) -> Result<()> {
        self.graph.add_relationship(from, to, kind)
    }

    /// Resolve a member reference that is either an id or a (case-insensitive) name
    pub fn find_member(&self, reference: &str) -> Option<&Member> {
        self.graph
            .member(reference)
            .or_else(|| self.graph.member_by_name(reference))
    }

    pub fn relationship_chain(&self, from: &str, to: &str) -> RelationshipChain {
        ChainResolver::new(&self.graph).resolve(from, to)
    }

    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            member_count: self.member_count(),
            created_at: self.created_at,
        }
    }
}
