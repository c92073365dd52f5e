// 🌳 Relationship Graph - Members + reciprocal typed edges for one network
//
// Source of truth: per-member adjacency lists (insertion order preserved).
// Derived: (from, to) → label cache, rebuilt whenever a snapshot is loaded.
//
// Invariant: every relationship is stored as BOTH directional entries.
// add_relationship validates both endpoints before touching either list,
// so a one-sided edge can never be observed. Loaded snapshots are held to
// the same rule: entries that break it are dropped on the way in.

use crate::error::{FamilyError, Result};
use crate::member::{Member, MemberAttributes};
use crate::relationship::RelationshipType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

// ============================================================================
// EDGE
// ============================================================================

/// Outgoing edge: "the owner of this list is <relationship> of <member_id>"
/// read from the owner's side, e.g. A's edge {B, parent} means A → B is "parent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub member_id: String,
    pub relationship: RelationshipType,
}

// ============================================================================
// SERIALIZED FORM
// ============================================================================

/// What actually gets persisted. The label cache is never written out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GraphRecord {
    #[serde(default)]
    members: Vec<Member>,

    #[serde(default)]
    edges: BTreeMap<String, Vec<Edge>>,
}

// ============================================================================
// RELATIONSHIP GRAPH
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphRecord", into = "GraphRecord")]
pub struct RelationshipGraph {
    /// Insertion order = display order
    members: Vec<Member>,

    /// member id → outgoing edges
    edges: HashMap<String, Vec<Edge>>,

    /// (from, to) → most recently inserted label for that direction
    labels: HashMap<(String, String), RelationshipType>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    /// Create a member with a fresh id and an empty edge list
    pub fn add_member(&mut self, attributes: MemberAttributes) -> Result<Member> {
        let member = Member::new(attributes)?;
        self.edges.insert(member.id.clone(), Vec::new());
        self.members.push(member.clone());
        Ok(member)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// First member (in display order) whose name matches, ignoring case
    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.has_name(name))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    // ------------------------------------------------------------------------
    // Relationships
    // ------------------------------------------------------------------------

    /// Record `from → to` as `kind` and `to → from` as `kind.reciprocal()`.
    ///
    /// Not idempotent: repeating the call appends parallel edges.
    /// Fails with `MemberNotFound` (graph untouched) if either id is unknown.
    pub fn add_relationship(
        &mut self,
        from: &str,
        to: &str,
        kind: RelationshipType,
    ) -> Result<()> {
        for id in [from, to] {
            if !self.contains(id) {
                return Err(FamilyError::MemberNotFound(id.to_string()));
            }
        }

        let reciprocal = kind.reciprocal();

        self.push_edge(from, to, kind);
        self.push_edge(to, from, reciprocal);

        Ok(())
    }

    fn push_edge(&mut self, from: &str, to: &str, kind: RelationshipType) {
        self.labels
            .insert((from.to_string(), to.to_string()), kind.clone());
        self.edges.entry(from.to_string()).or_default().push(Edge {
            member_id: to.to_string(),
            relationship: kind,
        });
    }

    /// Outgoing edges of a member; empty for unknown ids
    pub fn neighbors(&self, id: &str) -> &[Edge] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Directed label stored for `from → to`, if any edge exists
    pub fn relationship_between(&self, from: &str, to: &str) -> Option<&RelationshipType> {
        self.labels.get(&(from.to_string(), to.to_string()))
    }

    /// Number of directed edge entries (two per relationship)
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn relationship_count(&self) -> usize {
        self.edge_count() / 2
    }
}

impl From<GraphRecord> for RelationshipGraph {
    fn from(record: GraphRecord) -> Self {
        let mut stored = record.edges;
        let mut lists: HashMap<String, Vec<Edge>> = HashMap::with_capacity(record.members.len());
        for member in &record.members {
            let list = stored.remove(&member.id).unwrap_or_default();
            lists.insert(member.id.clone(), list);
        }
        if !stored.is_empty() {
            warn!(lists = stored.len(), "snapshot has edge lists for unknown members");
        }

        // An edge survives only if its target is a member holding the reverse entry
        let has_reverse = |from: &str, edge: &Edge| {
            let expected = edge.relationship.reciprocal();
            lists.get(&edge.member_id).is_some_and(|back| {
                back.iter()
                    .any(|e| e.member_id == from && e.relationship == expected)
            })
        };

        let mut edges = HashMap::with_capacity(lists.len());
        for (from, list) in &lists {
            let (kept, dropped): (Vec<Edge>, Vec<Edge>) =
                list.iter().cloned().partition(|edge| has_reverse(from, edge));
            if !dropped.is_empty() {
                warn!(
                    member_id = %from,
                    dropped = dropped.len(),
                    "dropping one-sided edges from snapshot"
                );
            }
            edges.insert(from.clone(), kept);
        }

        let mut labels = HashMap::new();
        for (from, list) in &edges {
            for edge in list {
                labels.insert(
                    (from.clone(), edge.member_id.clone()),
                    edge.relationship.clone(),
                );
            }
        }

        RelationshipGraph {
            members: record.members,
            edges,
            labels,
        }
    }
}

impl From<RelationshipGraph> for GraphRecord {
    fn from(graph: RelationshipGraph) -> Self {
        GraphRecord {
            members: graph.members,
            edges: graph.edges.into_iter().collect(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
