// 🔗 Relationship Types - Typed labels with a static reciprocal table
//
// Every relationship is stored from both endpoints' perspective:
//   A → B labeled T, B → A labeled reciprocal(T)
//
// The table is purely textual. "nephew" maps to "uncle" regardless of the
// actual gender of the other person; no kinship inference happens here.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// RELATIONSHIP TYPE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipType {
    Parent,
    Child,
    Sibling,
    Spouse,
    Grandparent,
    Grandchild,
    Uncle,
    Nephew,
    Aunt,
    Niece,
    Cousin,

    /// Any label outside the table, kept verbatim
    Other(String),
}

impl RelationshipType {
    /// All types with a defined reciprocal, in the order the add-member form lists them
    pub const KNOWN: [RelationshipType; 11] = [
        RelationshipType::Parent,
        RelationshipType::Child,
        RelationshipType::Sibling,
        RelationshipType::Spouse,
        RelationshipType::Grandparent,
        RelationshipType::Grandchild,
        RelationshipType::Uncle,
        RelationshipType::Aunt,
        RelationshipType::Nephew,
        RelationshipType::Niece,
        RelationshipType::Cousin,
    ];

    /// Parse a label. Known labels match case-insensitively; anything else
    /// becomes `Other` with the trimmed text preserved.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "parent" => RelationshipType::Parent,
            "child" => RelationshipType::Child,
            "sibling" => RelationshipType::Sibling,
            "spouse" => RelationshipType::Spouse,
            "grandparent" => RelationshipType::Grandparent,
            "grandchild" => RelationshipType::Grandchild,
            "uncle" => RelationshipType::Uncle,
            "nephew" => RelationshipType::Nephew,
            "aunt" => RelationshipType::Aunt,
            "niece" => RelationshipType::Niece,
            "cousin" => RelationshipType::Cousin,
            _ => RelationshipType::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RelationshipType::Parent => "parent",
            RelationshipType::Child => "child",
            RelationshipType::Sibling => "sibling",
            RelationshipType::Spouse => "spouse",
            RelationshipType::Grandparent => "grandparent",
            RelationshipType::Grandchild => "grandchild",
            RelationshipType::Uncle => "uncle",
            RelationshipType::Nephew => "nephew",
            RelationshipType::Aunt => "aunt",
            RelationshipType::Niece => "niece",
            RelationshipType::Cousin => "cousin",
            RelationshipType::Other(label) => label,
        }
    }

    /// The same relationship seen from the other endpoint.
    ///
    /// Involution: `t.reciprocal().reciprocal() == t` for every value.
    pub fn reciprocal(&self) -> RelationshipType {
        match self {
            RelationshipType::Parent => RelationshipType::Child,
            RelationshipType::Child => RelationshipType::Parent,
            RelationshipType::Sibling => RelationshipType::Sibling,
            RelationshipType::Spouse => RelationshipType::Spouse,
            RelationshipType::Grandparent => RelationshipType::Grandchild,
            RelationshipType::Grandchild => RelationshipType::Grandparent,
            RelationshipType::Uncle => RelationshipType::Nephew,
            RelationshipType::Nephew => RelationshipType::Uncle,
            RelationshipType::Aunt => RelationshipType::Niece,
            RelationshipType::Niece => RelationshipType::Aunt,
            RelationshipType::Cousin => RelationshipType::Cousin,
            // Unmapped labels are their own reciprocal
            RelationshipType::Other(label) => RelationshipType::Other(label.clone()),
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RelationshipType {
    fn from(label: &str) -> Self {
        RelationshipType::parse(label)
    }
}

impl From<String> for RelationshipType {
    fn from(label: String) -> Self {
        RelationshipType::parse(&label)
    }
}

impl From<RelationshipType> for String {
    fn from(kind: RelationshipType) -> Self {
        kind.as_str().to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================
