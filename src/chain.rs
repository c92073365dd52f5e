// 🧭 Chain Resolver - Shortest relationship chain between two members
//
// Breadth-first search over the graph. Every relationship is stored in both
// directions, so following outgoing edges already covers the undirected view.
//
// Ties between equally short chains go to whichever path was discovered
// first, i.e. adjacency-list insertion order under FIFO expansion.

use crate::graph::RelationshipGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Label shown when a consecutive pair has no stored edge
pub const UNKNOWN_RELATIONSHIP: &str = "related to";

pub const NO_RELATIONSHIP: &str = "No relationship found.";
pub const SAME_PERSON: &str = "Same person.";

// ============================================================================
// CHAIN RESULT
// ============================================================================

/// One step of a rendered chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainLink {
    pub member_id: String,
    pub member_name: String,

    /// Label from this member toward the next one (None on the last link)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_to_next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipChain {
    pub chain: Vec<ChainLink>,
    pub summary: String,
}

impl RelationshipChain {
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

// ============================================================================
// CHAIN RESOLVER
// ============================================================================

/// Read-only view over one graph; never mutates it
pub struct ChainResolver<'a> {
    graph: &'a RelationshipGraph,
}

impl<'a> ChainResolver<'a> {
    pub fn new(graph: &'a RelationshipGraph) -> Self {
        ChainResolver { graph }
    }

    /// Member ids from `start` to `end` along a minimum-edge path.
    ///
    /// - `[start]` when both ids name the same existing member
    /// - empty when either id is unknown or the two are disconnected
    pub fn find_shortest_chain(&self, start: &str, end: &str) -> Vec<String> {
        if !self.graph.contains(start) || !self.graph.contains(end) {
            return Vec::new();
        }

        if start == end {
            return vec![start.to_string()];
        }

        // child → parent in the BFS tree; first discovery wins
        let mut came_from: HashMap<&str, &str> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if current == end {
                return Self::reconstruct(&came_from, start, end);
            }

            for edge in self.graph.neighbors(current) {
                let next = edge.member_id.as_str();
                if visited.insert(next) {
                    came_from.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        Vec::new()
    }

    fn reconstruct<'p>(
        came_from: &HashMap<&'p str, &'p str>,
        start: &str,
        end: &'p str,
    ) -> Vec<String> {
        let mut path = vec![end.to_string()];
        let mut cursor = end;

        while cursor != start {
            match came_from.get(cursor) {
                Some(&prev) => {
                    path.push(prev.to_string());
                    cursor = prev;
                }
                None => return Vec::new(),
            }
        }

        path.reverse();
        path
    }

    /// Label stored on the `from → to` edge, or the generic placeholder
    fn label_between(&self, from: &str, to: &str) -> String {
        self.graph
            .relationship_between(from, to)
            .map(|kind| kind.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_RELATIONSHIP.to_string())
    }

    /// Pair each member on the path with its label toward the next member
    pub fn describe_chain(&self, path: &[String]) -> Vec<ChainLink> {
        path.iter()
            .enumerate()
            .map(|(i, id)| {
                let member_name = self
                    .graph
                    .member(id)
                    .map(|m| m.name().to_string())
                    .unwrap_or_else(|| id.clone());

                let relationship_to_next = path.get(i + 1).map(|next| self.label_between(id, next));

                ChainLink {
                    member_id: id.clone(),
                    member_name,
                    relationship_to_next,
                }
            })
            .collect()
    }

    /// One-line description of a path.
    ///
    /// Two hops compose textually ("parent's sibling"); longer chains only
    /// report how many people sit in between.
    pub fn summarize(&self, path: &[String]) -> String {
        match path.len() {
            0 => NO_RELATIONSHIP.to_string(),
            1 => SAME_PERSON.to_string(),
            2 => self.label_between(&path[0], &path[1]),
            3 => format!(
                "{}'s {}",
                self.label_between(&path[0], &path[1]),
                self.label_between(&path[1], &path[2])
            ),
            n => format!("Connected through {} intermediate family member(s)", n - 2),
        }
    }

    /// Shortest chain, rendered and summarized
    pub fn resolve(&self, start: &str, end: &str) -> RelationshipChain {
        let path = self.find_shortest_chain(start, end);
        debug!(start, end, length = path.len(), "resolved relationship chain");

        RelationshipChain {
            chain: self.describe_chain(&path),
            summary: self.summarize(&path),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
