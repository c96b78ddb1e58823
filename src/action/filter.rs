//! Filter action vocabulary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::decode_tagged;
use crate::model::{DateRange, EntityId, FrequencyRange, OrdinalRange};
use crate::{Error, Result};

/// One category value addressed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryValue {
    pub name: String,
    pub value: String,
}

impl CategoryValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Closed set of operations on a [`FilterConfiguration`](crate::FilterConfiguration).
///
/// Wire form is `{ "type": "<TAG>", "payload": <data> }`. A tag this crate
/// does not know decodes to [`FilterAction::Unknown`], which every reducer
/// treats as a no-op, whatever payload came with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(remote = "Self")]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterAction {
    SetNodeLimit(u32),
    SetEdgeLimit(u32),
    /// Overwrites both ends; an omitted end becomes absent.
    SetNodeFrequencyRange(FrequencyRange),
    SetEdgeFrequencyRange(FrequencyRange),
    /// Range over the number of documents an entity appears in.
    SetNodeDocFrequencyRange(FrequencyRange),
    SetEdgeDocFrequencyRange(FrequencyRange),
    /// Empty string clears the search.
    SetLabelSearch(String),
    SetDateRange(DateRange),
    SetOrdinalTimeRange(OrdinalRange),
    ToggleWhitelistEntity(EntityId),
    AddWhitelistEntity(EntityId),
    RemoveWhitelistEntity(EntityId),
    SetWhitelistEntities(Vec<EntityId>),
    /// Variadic. Ids currently whitelisted are skipped.
    AddBlacklistEntity(Vec<EntityId>),
    RemoveBlacklistEntity(EntityId),
    ClearWhitelist,
    ClearBlacklist,
    ToggleCategory(CategoryValue),
    AddCategory(CategoryValue),
    RemoveCategory(CategoryValue),
    ResetCategory(String),
    ResetFilter,
    Unknown,
}

impl FilterAction {
    /// Wire tags decoded into a concrete variant.
    pub const TAGS: &'static [&'static str] = &[
        "SET_NODE_LIMIT",
        "SET_EDGE_LIMIT",
        "SET_NODE_FREQUENCY_RANGE",
        "SET_EDGE_FREQUENCY_RANGE",
        "SET_NODE_DOC_FREQUENCY_RANGE",
        "SET_EDGE_DOC_FREQUENCY_RANGE",
        "SET_LABEL_SEARCH",
        "SET_DATE_RANGE",
        "SET_ORDINAL_TIME_RANGE",
        "TOGGLE_WHITELIST_ENTITY",
        "ADD_WHITELIST_ENTITY",
        "REMOVE_WHITELIST_ENTITY",
        "SET_WHITELIST_ENTITIES",
        "ADD_BLACKLIST_ENTITY",
        "REMOVE_BLACKLIST_ENTITY",
        "CLEAR_WHITELIST",
        "CLEAR_BLACKLIST",
        "TOGGLE_CATEGORY",
        "ADD_CATEGORY",
        "REMOVE_CATEGORY",
        "RESET_CATEGORY",
        "RESET_FILTER",
    ];
}

impl Serialize for FilterAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        FilterAction::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for FilterAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        decode_tagged(deserializer, Self::TAGS, FilterAction::Unknown, |raw| {
            FilterAction::deserialize(raw)
        })
    }
}

impl FilterAction {
    // ========================================================================
    // Action creators
    // ========================================================================

    pub fn node_frequency(min: Option<u64>, max: Option<u64>) -> Self {
        FilterAction::SetNodeFrequencyRange(FrequencyRange::new(min, max))
    }

    pub fn edge_frequency(min: Option<u64>, max: Option<u64>) -> Self {
        FilterAction::SetEdgeFrequencyRange(FrequencyRange::new(min, max))
    }

    pub fn node_doc_frequency(min: Option<u64>, max: Option<u64>) -> Self {
        FilterAction::SetNodeDocFrequencyRange(FrequencyRange::new(min, max))
    }

    pub fn edge_doc_frequency(min: Option<u64>, max: Option<u64>) -> Self {
        FilterAction::SetEdgeDocFrequencyRange(FrequencyRange::new(min, max))
    }

    pub fn label_search(query: impl Into<String>) -> Self {
        FilterAction::SetLabelSearch(query.into())
    }

    pub fn toggle_whitelist(id: impl Into<EntityId>) -> Self {
        FilterAction::ToggleWhitelistEntity(id.into())
    }

    pub fn add_whitelist(id: impl Into<EntityId>) -> Self {
        FilterAction::AddWhitelistEntity(id.into())
    }

    pub fn remove_whitelist(id: impl Into<EntityId>) -> Self {
        FilterAction::RemoveWhitelistEntity(id.into())
    }

    pub fn set_whitelist(ids: impl IntoIterator<Item = impl Into<EntityId>>) -> Self {
        FilterAction::SetWhitelistEntities(ids.into_iter().map(Into::into).collect())
    }

    pub fn add_blacklist(ids: impl IntoIterator<Item = impl Into<EntityId>>) -> Self {
        FilterAction::AddBlacklistEntity(ids.into_iter().map(Into::into).collect())
    }

    pub fn remove_blacklist(id: impl Into<EntityId>) -> Self {
        FilterAction::RemoveBlacklistEntity(id.into())
    }

    pub fn toggle_category(name: impl Into<String>, value: impl Into<String>) -> Self {
        FilterAction::ToggleCategory(CategoryValue::new(name, value))
    }

    pub fn add_category(name: impl Into<String>, value: impl Into<String>) -> Self {
        FilterAction::AddCategory(CategoryValue::new(name, value))
    }

    pub fn remove_category(name: impl Into<String>, value: impl Into<String>) -> Self {
        FilterAction::RemoveCategory(CategoryValue::new(name, value))
    }

    pub fn reset_category(name: impl Into<String>) -> Self {
        FilterAction::ResetCategory(name.into())
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Wire tag, for logs and error messages.
    pub fn tag(&self) -> &'static str {
        match self {
            FilterAction::SetNodeLimit(_) => "SET_NODE_LIMIT",
            FilterAction::SetEdgeLimit(_) => "SET_EDGE_LIMIT",
            FilterAction::SetNodeFrequencyRange(_) => "SET_NODE_FREQUENCY_RANGE",
            FilterAction::SetEdgeFrequencyRange(_) => "SET_EDGE_FREQUENCY_RANGE",
            FilterAction::SetNodeDocFrequencyRange(_) => "SET_NODE_DOC_FREQUENCY_RANGE",
            FilterAction::SetEdgeDocFrequencyRange(_) => "SET_EDGE_DOC_FREQUENCY_RANGE",
            FilterAction::SetLabelSearch(_) => "SET_LABEL_SEARCH",
            FilterAction::SetDateRange(_) => "SET_DATE_RANGE",
            FilterAction::SetOrdinalTimeRange(_) => "SET_ORDINAL_TIME_RANGE",
            FilterAction::ToggleWhitelistEntity(_) => "TOGGLE_WHITELIST_ENTITY",
            FilterAction::AddWhitelistEntity(_) => "ADD_WHITELIST_ENTITY",
            FilterAction::RemoveWhitelistEntity(_) => "REMOVE_WHITELIST_ENTITY",
            FilterAction::SetWhitelistEntities(_) => "SET_WHITELIST_ENTITIES",
            FilterAction::AddBlacklistEntity(_) => "ADD_BLACKLIST_ENTITY",
            FilterAction::RemoveBlacklistEntity(_) => "REMOVE_BLACKLIST_ENTITY",
            FilterAction::ClearWhitelist => "CLEAR_WHITELIST",
            FilterAction::ClearBlacklist => "CLEAR_BLACKLIST",
            FilterAction::ToggleCategory(_) => "TOGGLE_CATEGORY",
            FilterAction::AddCategory(_) => "ADD_CATEGORY",
            FilterAction::RemoveCategory(_) => "REMOVE_CATEGORY",
            FilterAction::ResetCategory(_) => "RESET_CATEGORY",
            FilterAction::ResetFilter => "RESET_FILTER",
            FilterAction::Unknown => "UNKNOWN",
        }
    }

    /// Reject payloads that would store an invalid configuration.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidPayload {
            action: self.tag(),
            reason: reason.to_string(),
        };
        match self {
            FilterAction::SetNodeLimit(0) | FilterAction::SetEdgeLimit(0) => {
                Err(invalid("limit must be greater than zero"))
            }
            FilterAction::SetNodeFrequencyRange(r)
            | FilterAction::SetEdgeFrequencyRange(r)
            | FilterAction::SetNodeDocFrequencyRange(r)
            | FilterAction::SetEdgeDocFrequencyRange(r)
                if !r.is_ordered() =>
            {
                Err(invalid("minimum frequency exceeds maximum"))
            }
            FilterAction::SetDateRange(r) if !r.is_ordered() => {
                Err(invalid("start date is after end date"))
            }
            FilterAction::SetOrdinalTimeRange(r) if !r.is_ordered() => {
                Err(invalid("start ordinal is after end ordinal"))
            }
            _ => Ok(()),
        }
    }

    /// Decode one inbound action object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
