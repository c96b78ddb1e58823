//! Query reducer — connection type and focus entities.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::action::QueryAction;
use crate::model::{EntityId, GraphQuery};
use super::{Reducer, commit};

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryReducer;

impl QueryReducer {
    pub fn apply(&self, state: &GraphQuery, action: &QueryAction) -> GraphQuery {
        let mut next = state.clone();
        match action {
            QueryAction::SetConnectionType(ct) => next.connection_type = Some(*ct),
            QueryAction::AddFocusEntity(id) => {
                let mut focus = next.focus_entities.take().unwrap_or_default();
                focus.insert(id.clone());
                next.focus_entities = Some(focus);
            }
            QueryAction::RemoveFocusEntity(id) => {
                let mut focus = next.focus_entities.take().unwrap_or_default();
                focus.remove(id);
                next.focus_entities = (!focus.is_empty()).then_some(focus);
            }
            QueryAction::SetFocusEntities(ids) => {
                let focus: BTreeSet<EntityId> = ids.iter().cloned().collect();
                next.focus_entities = (!focus.is_empty()).then_some(focus);
            }
            QueryAction::ClearFocusEntities => next.focus_entities = None,
            QueryAction::Unknown => debug!("unknown query action ignored"),
        }
        next
    }
}

impl Reducer for QueryReducer {
    type State = GraphQuery;
    type Action = QueryAction;

    fn reduce(&self, state: &Arc<GraphQuery>, action: &QueryAction) -> Arc<GraphQuery> {
        commit(state, self.apply(state, action))
    }
}
