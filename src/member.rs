// 👤 Member Entity - Stable identity + opaque personal attributes
//
// Identity: UUID assigned at creation (never changes)
// Values: name and contact attributes (payload, never read by the graph)

use crate::error::{FamilyError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// MEMBER ATTRIBUTES
// ============================================================================

/// Everything a caller supplies when adding someone to a network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAttributes {
    /// Display name (required, non-empty)
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Free-form date string as entered (e.g. "1961-04-12")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,

    /// Data URL or path of the profile photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// Role tag inside the network (e.g. "Creator")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Name of the user who added this member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
}

impl MemberAttributes {
    /// Attributes with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        MemberAttributes {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

// ============================================================================
// MEMBER ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Stable identity (UUID) - NEVER changes
    pub id: String,

    #[serde(flatten)]
    pub attributes: MemberAttributes,

    pub added_at: DateTime<Utc>,
}

impl Member {
    /// Create a member with a fresh UUID.
    ///
    /// Fails with `InvalidInput` when the name is blank.
    pub fn new(mut attributes: MemberAttributes) -> Result<Self> {
        let name = attributes.name.trim();
        if name.is_empty() {
            return Err(FamilyError::InvalidInput(
                "member name must not be empty".to_string(),
            ));
        }
        attributes.name = name.to_string();

        Ok(Member {
            id: uuid::Uuid::new_v4().to_string(),
            attributes,
            added_at: Utc::now(),
        })
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    /// Case-insensitive name comparison (used by CLI lookups and CSV import).
    ///
    /// Full Unicode lowercasing, so "ZOË" and "zoë" name the same person.
    pub fn has_name(&self, name: &str) -> bool {
        self.attributes.name.to_lowercase() == name.trim().to_lowercase()
    }
}
