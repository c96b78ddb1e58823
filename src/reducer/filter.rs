//! Filter reducer — applies a [`FilterAction`] to a [`FilterConfiguration`].
//!
//! Entity lists follow one precedence rule: the whitelist wins. Every way
//! of putting an id on the whitelist (toggle-on, add, set) evicts it from
//! the blacklist; adding to the blacklist skips ids that are whitelisted.
//! Removing from either list, including toggle-off, never touches the
//! other one, so a toggle pair on a blacklisted id leaves it off both.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::action::{CategoryValue, FilterAction};
use crate::model::{CategorySelection, EntityId, FilterConfiguration};
use super::{Reducer, commit};

/// Pure filter state machine.
#[derive(Debug, Clone, Default)]
pub struct FilterReducer {
    /// Target of `RESET_FILTER`.
    initial: FilterConfiguration,
}

impl FilterReducer {
    pub fn new(initial: FilterConfiguration) -> Self {
        Self { initial }
    }

    /// Value-level transition. Rejected payloads return a copy of `state`.
    pub fn apply(&self, state: &FilterConfiguration, action: &FilterAction) -> FilterConfiguration {
        if let Err(e) = action.validate() {
            warn!(action = action.tag(), error = %e, "rejected filter action");
            return state.clone();
        }

        let mut next = state.clone();
        match action {
            FilterAction::SetNodeLimit(n) => next.limit_nodes = *n,
            FilterAction::SetEdgeLimit(n) => next.limit_edges = *n,

            FilterAction::SetNodeFrequencyRange(r) => {
                next.minimum_node_frequency = r.min;
                next.maximum_node_frequency = r.max;
            }
            FilterAction::SetEdgeFrequencyRange(r) => {
                next.minimum_edge_frequency = r.min;
                next.maximum_edge_frequency = r.max;
            }
            FilterAction::SetNodeDocFrequencyRange(r) => {
                next.minimum_node_doc_frequency = r.min;
                next.maximum_node_doc_frequency = r.max;
            }
            FilterAction::SetEdgeDocFrequencyRange(r) => {
                next.minimum_edge_doc_frequency = r.min;
                next.maximum_edge_doc_frequency = r.max;
            }

            FilterAction::SetLabelSearch(q) => {
                next.label_search = if q.is_empty() { None } else { Some(q.clone()) };
            }

            FilterAction::SetDateRange(r) => {
                next.earliest_date = r.start;
                next.latest_date = r.end;
            }
            FilterAction::SetOrdinalTimeRange(r) => {
                next.earliest_ordinal_time = r.start;
                next.latest_ordinal_time = r.end;
            }

            FilterAction::ToggleWhitelistEntity(id) => {
                if next.is_whitelisted(id) {
                    remove_whitelisted(&mut next, id);
                } else {
                    add_whitelisted(&mut next, id);
                }
            }
            FilterAction::AddWhitelistEntity(id) => add_whitelisted(&mut next, id),
            FilterAction::RemoveWhitelistEntity(id) => remove_whitelisted(&mut next, id),
            FilterAction::SetWhitelistEntities(ids) => {
                let whitelist: BTreeSet<EntityId> = ids.iter().cloned().collect();
                next.blacklisted_entity_ids = non_empty(
                    next.blacklisted_entity_ids
                        .take()
                        .unwrap_or_default()
                        .into_iter()
                        .filter(|id| !whitelist.contains(id))
                        .collect(),
                );
                next.whitelisted_entity_ids = non_empty(whitelist);
            }

            FilterAction::AddBlacklistEntity(ids) => {
                let mut blacklist = next.blacklisted_entity_ids.take().unwrap_or_default();
                for id in ids {
                    if state.is_whitelisted(id) {
                        debug!(entity = %id, "whitelisted entity not blacklisted");
                        continue;
                    }
                    blacklist.insert(id.clone());
                }
                next.blacklisted_entity_ids = non_empty(blacklist);
            }
            FilterAction::RemoveBlacklistEntity(id) => {
                let mut blacklist = next.blacklisted_entity_ids.take().unwrap_or_default();
                blacklist.remove(id);
                next.blacklisted_entity_ids = non_empty(blacklist);
            }

            FilterAction::ClearWhitelist => next.whitelisted_entity_ids = None,
            FilterAction::ClearBlacklist => next.blacklisted_entity_ids = None,

            FilterAction::ToggleCategory(cv) => {
                let selected = next.is_category_value_selected(&cv.name, &cv.value);
                update_category(&mut next, cv, !selected);
            }
            FilterAction::AddCategory(cv) => update_category(&mut next, cv, true),
            FilterAction::RemoveCategory(cv) => update_category(&mut next, cv, false),
            FilterAction::ResetCategory(name) => {
                let mut categories = next.categories.take().unwrap_or_default();
                categories.remove(name);
                next.categories = non_empty_map(categories);
            }

            FilterAction::ResetFilter => next = self.initial.clone(),

            FilterAction::Unknown => {
                debug!("unknown filter action ignored");
            }
        }
        next
    }
}

impl Reducer for FilterReducer {
    type State = FilterConfiguration;
    type Action = FilterAction;

    fn reduce(&self, state: &Arc<FilterConfiguration>, action: &FilterAction) -> Arc<FilterConfiguration> {
        let next = self.apply(state, action);
        debug_assert!(
            !state.is_consistent() || next.is_consistent(),
            "{} broke a filter invariant",
            action.tag()
        );
        commit(state, next)
    }
}

/// Apply `action` with the canonical initial configuration as reset target.
pub fn reduce(state: &FilterConfiguration, action: &FilterAction) -> FilterConfiguration {
    FilterReducer::default().apply(state, action)
}

// ============================================================================
// Helpers
// ============================================================================

fn add_whitelisted(f: &mut FilterConfiguration, id: &EntityId) {
    let mut whitelist = f.whitelisted_entity_ids.take().unwrap_or_default();
    whitelist.insert(id.clone());
    f.whitelisted_entity_ids = Some(whitelist);

    if let Some(mut blacklist) = f.blacklisted_entity_ids.take() {
        blacklist.remove(id);
        f.blacklisted_entity_ids = non_empty(blacklist);
    }
}

fn remove_whitelisted(f: &mut FilterConfiguration, id: &EntityId) {
    let mut whitelist = f.whitelisted_entity_ids.take().unwrap_or_default();
    whitelist.remove(id);
    f.whitelisted_entity_ids = non_empty(whitelist);
}

fn update_category(f: &mut FilterConfiguration, cv: &CategoryValue, selected: bool) {
    let mut categories: CategorySelection = f.categories.take().unwrap_or_default();
    let mut values = categories.remove(&cv.name).unwrap_or_default();
    if selected {
        values.insert(cv.value.clone());
    } else {
        values.remove(&cv.value);
    }
    if !values.is_empty() {
        categories.insert(cv.name.clone(), values);
    }
    f.categories = non_empty_map(categories);
}

fn non_empty<T: Ord>(set: BTreeSet<T>) -> Option<BTreeSet<T>> {
    if set.is_empty() { None } else { Some(set) }
}

fn non_empty_map<K: Ord, V>(map: BTreeMap<K, V>) -> Option<BTreeMap<K, V>> {
    if map.is_empty() { None } else { Some(map) }
}
