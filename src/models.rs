// Core data structures for the Equilibrium admin client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque identifier as sent by the backend.
///
/// The structure endpoint serializes accounts by username (a string) while
/// the queue endpoint uses numeric primary keys, so both JSON forms are
/// accepted and compared by their textual value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident(String);

impl Ident {
    /// Create an identifier from anything string-like
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Textual form of the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty identifiers are treated like a missing one
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Ident {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for Ident {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for Ident {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdent {
    Int(i64),
    Str(String),
}

impl<'de> Deserialize<'de> for Ident {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawIdent::deserialize(deserializer)? {
            RawIdent::Int(n) => Self(n.to_string()),
            RawIdent::Str(s) => Self(s),
        })
    }
}

// Blank parents ("" from some serializers) mean "no parent"
fn deserialize_parent<'de, D>(deserializer: D) -> Result<Option<Ident>, D::Error>
where
    D: Deserializer<'de>,
{
    let parent = Option::<Ident>::deserialize(deserializer)?;
    Ok(parent.filter(|p| !p.is_blank()))
}

// ============================================================================
// Structure
// ============================================================================

/// One partner position in the structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: Option<Ident>,
    pub user: Ident,
    #[serde(default, deserialize_with = "deserialize_parent")]
    pub parent: Option<Ident>,
    /// Depth as reported by the server. Grouping never relies on it.
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub direct: u32,
    #[serde(default)]
    pub total: u32,
    /// Tariff primary key, or a label from older serializers
    #[serde(default)]
    pub tariff: Option<Ident>,
    #[serde(default)]
    pub user_display: Option<String>,
    #[serde(default)]
    pub position: Option<u32>,
}

impl Node {
    /// Create a node with only the linking fields set
    pub fn new(user: impl Into<Ident>, parent: Option<Ident>) -> Self {
        Self {
            id: None,
            user: user.into(),
            parent,
            level: 0,
            direct: 0,
            total: 0,
            tariff: None,
            user_display: None,
            position: None,
        }
    }

    /// Whether this node claims to be the root
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Identifiers a child's `parent` may use to reference this node
    pub fn keys(&self) -> impl Iterator<Item = &Ident> {
        let id = self.id.as_ref().filter(|id| **id != self.user);
        std::iter::once(&self.user).chain(id)
    }

    /// Human readable label
    pub fn label(&self) -> &str {
        self.user_display
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.user.as_str())
    }
}

// ============================================================================
// Registration queue
// ============================================================================

/// Tariff summary nested in a queue entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffInfo {
    pub code: String,
    pub name: String,
    pub entry_amount: String,
}

/// One pending registration awaiting manual completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: u64,
    pub user: u64,
    #[serde(default)]
    pub user_display: Option<String>,
    #[serde(default)]
    pub inviter: Option<String>,
    pub amount: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub tariff: TariffInfo,
}

impl QueueEntry {
    /// Display label, falling back to the numeric user id
    pub fn label(&self) -> String {
        match self.user_display.as_deref() {
            Some(display) if !display.is_empty() => display.to_string(),
            _ => format!("user #{}", self.user),
        }
    }
}

/// Body of the complete-registration request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub user_id: u64,
}

/// Backend acknowledgement of a completed registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReceipt {
    #[serde(default)]
    pub detail: Option<String>,
    /// Username of the node the new partner was placed under
    #[serde(default)]
    pub placement_parent: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
}
