//! Filter configuration — the value the filter reducer transitions.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DataBounds, EntityId};

pub const DEFAULT_NODE_LIMIT: u32 = 100;
pub const DEFAULT_EDGE_LIMIT: u32 = 200;

/// Selected values per category name. Absent key = no restriction.
pub type CategorySelection = BTreeMap<String, BTreeSet<String>>;

// ============================================================================
// Range payloads
// ============================================================================

/// Optional numeric frequency window. Both ends absent = unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl FrequencyRange {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub fn between(min: u64, max: u64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    pub fn is_ordered(&self) -> bool {
        ordered(self.min.as_ref(), self.max.as_ref())
    }
}

/// Optional calendar window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_ordered(&self) -> bool {
        ordered(self.start.as_ref(), self.end.as_ref())
    }
}

/// Optional window over ordinal timestamps (document sequence numbers,
/// chapter indices and the like).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl OrdinalRange {
    pub fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self { start, end }
    }

    pub fn is_ordered(&self) -> bool {
        ordered(self.start.as_ref(), self.end.as_ref())
    }
}

fn ordered<T: PartialOrd>(lo: Option<&T>, hi: Option<&T>) -> bool {
    match (lo, hi) {
        (Some(lo), Some(hi)) => lo <= hi,
        _ => true,
    }
}

// ============================================================================
// FilterConfiguration
// ============================================================================

/// The complete set of constraints narrowing the displayed graph.
///
/// Treated as an immutable snapshot: the reducer never edits one in place,
/// it builds a new value and the history keeps the old one.
///
/// Invariants held by every value the reducer produces:
/// - `limit_nodes > 0`, `limit_edges > 0`
/// - every present range is ordered (min ≤ max, start ≤ end)
/// - whitelist and blacklist are disjoint
/// - no empty set or map is stored; empty collapses to `None`
/// - `label_search` is never `Some("")`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfiguration {
    pub limit_nodes: u32,
    pub limit_edges: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_node_frequency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_node_frequency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_edge_frequency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_edge_frequency: Option<u64>,
    /// Number of documents an entity must appear in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_node_doc_frequency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_node_doc_frequency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_edge_doc_frequency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_edge_doc_frequency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_ordinal_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_ordinal_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelisted_entity_ids: Option<BTreeSet<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklisted_entity_ids: Option<BTreeSet<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategorySelection>,
}

impl Default for FilterConfiguration {
    fn default() -> Self {
        Self::with_limits(DEFAULT_NODE_LIMIT, DEFAULT_EDGE_LIMIT)
    }
}

impl FilterConfiguration {
    /// The canonical initial configuration (`RESET_FILTER` target).
    pub fn initial() -> Self {
        Self::default()
    }

    /// A configuration with the given caps and nothing else constrained.
    pub fn with_limits(limit_nodes: u32, limit_edges: u32) -> Self {
        Self {
            limit_nodes,
            limit_edges,
            minimum_node_frequency: None,
            maximum_node_frequency: None,
            minimum_edge_frequency: None,
            maximum_edge_frequency: None,
            minimum_node_doc_frequency: None,
            maximum_node_doc_frequency: None,
            minimum_edge_doc_frequency: None,
            maximum_edge_doc_frequency: None,
            label_search: None,
            earliest_date: None,
            latest_date: None,
            earliest_ordinal_time: None,
            latest_ordinal_time: None,
            whitelisted_entity_ids: None,
            blacklisted_entity_ids: None,
            categories: None,
        }
    }

    // ========================================================================
    // Read accessors
    // ========================================================================

    pub fn node_frequency(&self) -> FrequencyRange {
        FrequencyRange::new(self.minimum_node_frequency, self.maximum_node_frequency)
    }

    pub fn edge_frequency(&self) -> FrequencyRange {
        FrequencyRange::new(self.minimum_edge_frequency, self.maximum_edge_frequency)
    }

    pub fn node_doc_frequency(&self) -> FrequencyRange {
        FrequencyRange::new(self.minimum_node_doc_frequency, self.maximum_node_doc_frequency)
    }

    pub fn edge_doc_frequency(&self) -> FrequencyRange {
        FrequencyRange::new(self.minimum_edge_doc_frequency, self.maximum_edge_doc_frequency)
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.earliest_date, self.latest_date)
    }

    pub fn ordinal_range(&self) -> OrdinalRange {
        OrdinalRange::new(self.earliest_ordinal_time, self.latest_ordinal_time)
    }

    pub fn is_whitelisted(&self, id: &EntityId) -> bool {
        self.whitelisted_entity_ids.as_ref().is_some_and(|s| s.contains(id))
    }

    pub fn is_blacklisted(&self, id: &EntityId) -> bool {
        self.blacklisted_entity_ids.as_ref().is_some_and(|s| s.contains(id))
    }

    /// Selected values for one category, `None` when unrestricted.
    pub fn selected_values(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.as_ref().and_then(|c| c.get(category))
    }

    pub fn is_category_value_selected(&self, category: &str, value: &str) -> bool {
        self.selected_values(category).is_some_and(|s| s.contains(value))
    }

    // ========================================================================
    // Effective ranges (absent ends fall back to the data bounds)
    // ========================================================================

    pub fn effective_node_frequency(&self, bounds: &DataBounds) -> (u64, u64) {
        (
            self.minimum_node_frequency.unwrap_or(bounds.minimum_possible_node_frequency),
            self.maximum_node_frequency.unwrap_or(bounds.maximum_possible_node_frequency),
        )
    }

    pub fn effective_edge_frequency(&self, bounds: &DataBounds) -> (u64, u64) {
        (
            self.minimum_edge_frequency.unwrap_or(bounds.minimum_possible_edge_frequency),
            self.maximum_edge_frequency.unwrap_or(bounds.maximum_possible_edge_frequency),
        )
    }

    pub fn effective_date_range(&self, bounds: &DataBounds) -> DateRange {
        DateRange::new(
            self.earliest_date.or(bounds.earliest_date),
            self.latest_date.or(bounds.latest_date),
        )
    }

    pub fn effective_ordinal_range(&self, bounds: &DataBounds) -> OrdinalRange {
        OrdinalRange::new(
            self.earliest_ordinal_time.or(bounds.earliest_ordinal_time),
            self.latest_ordinal_time.or(bounds.latest_ordinal_time),
        )
    }

    // ========================================================================
    // Invariant check
    // ========================================================================

    /// True when every documented invariant holds.
    pub fn is_consistent(&self) -> bool {
        let disjoint = match (&self.whitelisted_entity_ids, &self.blacklisted_entity_ids) {
            (Some(w), Some(b)) => w.is_disjoint(b),
            _ => true,
        };
        let no_empty_sets = !self.whitelisted_entity_ids.as_ref().is_some_and(|s| s.is_empty())
            && !self.blacklisted_entity_ids.as_ref().is_some_and(|s| s.is_empty())
            && self
                .categories
                .as_ref()
                .is_none_or(|c| !c.is_empty() && c.values().all(|v| !v.is_empty()));

        self.limit_nodes > 0
            && self.limit_edges > 0
            && self.node_frequency().is_ordered()
            && self.edge_frequency().is_ordered()
            && self.node_doc_frequency().is_ordered()
            && self.edge_doc_frequency().is_ordered()
            && self.date_range().is_ordered()
            && self.ordinal_range().is_ordered()
            && self.label_search.as_deref() != Some("")
            && disjoint
            && no_empty_sets
    }
}
