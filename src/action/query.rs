//! Query action vocabulary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::decode_tagged;
use crate::model::{ConnectionType, EntityId};
use crate::Result;

/// Operations on a [`GraphQuery`](crate::GraphQuery).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(remote = "Self")]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryAction {
    SetConnectionType(ConnectionType),
    AddFocusEntity(EntityId),
    RemoveFocusEntity(EntityId),
    SetFocusEntities(Vec<EntityId>),
    ClearFocusEntities,
    Unknown,
}

impl Serialize for QueryAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        QueryAction::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for QueryAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        decode_tagged(deserializer, Self::TAGS, QueryAction::Unknown, |raw| {
            QueryAction::deserialize(raw)
        })
    }
}

impl QueryAction {
    pub const TAGS: &'static [&'static str] = &[
        "SET_CONNECTION_TYPE",
        "ADD_FOCUS_ENTITY",
        "REMOVE_FOCUS_ENTITY",
        "SET_FOCUS_ENTITIES",
        "CLEAR_FOCUS_ENTITIES",
    ];

    pub fn add_focus(id: impl Into<EntityId>) -> Self {
        QueryAction::AddFocusEntity(id.into())
    }

    pub fn remove_focus(id: impl Into<EntityId>) -> Self {
        QueryAction::RemoveFocusEntity(id.into())
    }

    pub fn tag(&self) -> &'static str {
        match self {
            QueryAction::SetConnectionType(_) => "SET_CONNECTION_TYPE",
            QueryAction::AddFocusEntity(_) => "ADD_FOCUS_ENTITY",
            QueryAction::RemoveFocusEntity(_) => "REMOVE_FOCUS_ENTITY",
            QueryAction::SetFocusEntities(_) => "SET_FOCUS_ENTITIES",
            QueryAction::ClearFocusEntities => "CLEAR_FOCUS_ENTITIES",
            QueryAction::Unknown => "UNKNOWN",
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_connection_type() {
        let a = QueryAction::from_json(r#"{"type":"SET_CONNECTION_TYPE","payload":"cooccurrence"}"#)
            .unwrap();
        assert_eq!(a, QueryAction::SetConnectionType(ConnectionType::Cooccurrence));
        assert_eq!(QueryAction::from_json(r#"{"type":"ZOOM"}"#).unwrap(), QueryAction::Unknown);
    }

    #[test]
    fn test_unknown_tag_with_payload_decodes_to_unknown() {
        let object = r#"{"type":"ZOOM","payload":{"level":3}}"#;
        assert_eq!(QueryAction::from_json(object).unwrap(), QueryAction::Unknown);
        let string = r#"{"type":"SET_LAYOUT","payload":"force"}"#;
        assert_eq!(QueryAction::from_json(string).unwrap(), QueryAction::Unknown);
    }

    #[test]
    fn test_known_tag_with_bad_payload_is_error() {
        let json = r#"{"type":"SET_CONNECTION_TYPE","payload":"hyperedge"}"#;
        assert!(QueryAction::from_json(json).is_err());
    }

    #[test]
    fn test_encode_uses_wire_tag() {
        let json = serde_json::to_value(QueryAction::add_focus("e1")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "ADD_FOCUS_ENTITY", "payload": "e1"}));
        assert!(QueryAction::TAGS.contains(&QueryAction::ClearFocusEntities.tag()));
    }
}
