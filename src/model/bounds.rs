//! Data bounds — legal ranges reported by the graph service.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Read-only range metadata for one connection type.
///
/// Owned by the bounds service; the reducers never touch it. Values are
/// trusted as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBounds {
    pub minimum_possible_node_frequency: u64,
    pub maximum_possible_node_frequency: u64,
    pub minimum_possible_edge_frequency: u64,
    pub maximum_possible_edge_frequency: u64,
    /// Category name → allowed values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_ordinal_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_ordinal_time: Option<i64>,
}

impl DataBounds {
    pub fn new(min_node: u64, max_node: u64, min_edge: u64, max_edge: u64) -> Self {
        Self {
            minimum_possible_node_frequency: min_node,
            maximum_possible_node_frequency: max_node,
            minimum_possible_edge_frequency: min_edge,
            maximum_possible_edge_frequency: max_edge,
            categories: None,
            earliest_date: None,
            latest_date: None,
            earliest_ordinal_time: None,
            latest_ordinal_time: None,
        }
    }

    pub fn with_category(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.categories
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_dates(mut self, earliest: NaiveDate, latest: NaiveDate) -> Self {
        self.earliest_date = Some(earliest);
        self.latest_date = Some(latest);
        self
    }

    pub fn with_ordinal_times(mut self, earliest: i64, latest: i64) -> Self {
        self.earliest_ordinal_time = Some(earliest);
        self.latest_ordinal_time = Some(latest);
        self
    }

    /// Known category names, in name order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().flat_map(|c| c.keys().map(String::as_str))
    }

    /// Allowed values for a category, empty when the category is unknown.
    pub fn category_values(&self, name: &str) -> &[String] {
        self.categories
            .as_ref()
            .and_then(|c| c.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
