//! Graph query — which connection semantics to render, and around whom.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Relationship semantics the graph and its bounds are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// Direct subject–predicate–object relations.
    Relation,
    /// Entities appearing in the same context.
    Cooccurrence,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Relation => "relation",
            ConnectionType::Cooccurrence => "cooccurrence",
        }
    }
}

impl std::fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConnectionType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "relation" => Ok(ConnectionType::Relation),
            "cooccurrence" => Ok(ConnectionType::Cooccurrence),
            other => Err(crate::Error::UnknownConnectionType(other.to_string())),
        }
    }
}

/// Non-filter query state: connection type plus optional focus entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQuery {
    /// `None` until the context has picked one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<ConnectionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_entities: Option<BTreeSet<EntityId>>,
}

impl GraphQuery {
    pub fn new(connection_type: ConnectionType) -> Self {
        Self { connection_type: Some(connection_type), focus_entities: None }
    }

    pub fn is_focused_on(&self, id: &EntityId) -> bool {
        self.focus_entities.as_ref().is_some_and(|s| s.contains(id))
    }
}
