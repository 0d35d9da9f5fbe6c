use std::fmt;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

// ═══════════════════════════════════════════════════════════════
//  Record
// ═══════════════════════════════════════════════════════════════

/// A single document written to a table.
///
/// `id` is required and is also sent in the `UUID` request header.
/// Any other fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), fields: Map::new() }
    }

    /// Record with a fresh version-7 UUID as its id.
    pub fn with_fresh_id() -> Self {
        Self::new(uuid::Uuid::now_v7().to_string())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════
//  Table name
// ═══════════════════════════════════════════════════════════════

/// Name of a table on the store. Used verbatim as a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn parse(name: impl Into<String>) -> Result<Self, ClientError> {
        let name = name.into();
        if name.is_empty() || name.contains(['/', '?', '#']) {
            return Err(ClientError::InvalidTable(name));
        }
        Ok(Self(name))
    }

    /// Fresh name from the random tail of a v7 UUID (last 12 hex digits).
    pub fn fresh() -> Self {
        let id = uuid::Uuid::now_v7().simple().to_string();
        Self(id[id.len() - 12..].to_string())
    }

    /// Fresh 16-character alphanumeric name.
    pub fn random_alphanumeric<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let name: String = (0..16).map(|_| char::from(rng.sample(Alphanumeric))).collect();
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
