//! Query context configuration.

use serde::{Deserialize, Serialize};

use crate::model::FilterConfiguration;

/// What happens to filter history when the connection type changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionChangePolicy {
    /// Keep the current filter, its undo/redo log and the focus entities.
    #[default]
    Preserve,
    /// Start over: initial filter, empty log, no focus entities.
    Reset,
}

/// Settings for a [`QueryContext`](super::QueryContext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextConfig {
    /// Starting filter and `RESET_FILTER` target.
    pub initial_filter: FilterConfiguration,
    /// Cap on undo depth. `None` = unlimited.
    pub history_limit: Option<usize>,
    pub connection_change: ConnectionChangePolicy,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            initial_filter: FilterConfiguration::initial(),
            history_limit: None,
            connection_change: ConnectionChangePolicy::Preserve,
        }
    }
}

impl ContextConfig {
    pub fn with_initial_filter(mut self, filter: FilterConfiguration) -> Self {
        self.initial_filter = filter;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn with_connection_change(mut self, policy: ConnectionChangePolicy) -> Self {
        self.connection_change = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let cfg: ContextConfig =
            serde_json::from_str(r#"{"historyLimit": 20, "connectionChange": "reset"}"#).unwrap();
        assert_eq!(cfg.history_limit, Some(20));
        assert_eq!(cfg.connection_change, ConnectionChangePolicy::Reset);
        assert_eq!(cfg.initial_filter, FilterConfiguration::initial());
    }
}
