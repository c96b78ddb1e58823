//! # Query Context
//!
//! Owns one viewer's filter history, graph query and data bounds, and is
//! passed by reference to whatever needs to read or dispatch.
//!
//! ```text
//! UI control → FilterAction → QueryContext::dispatch_filter
//!   → History<FilterReducer> → watch channel → graph fetcher, panels
//!
//! connection type change → BoundsService::data_bounds (async)
//!   → bounds land only if no newer request was made meanwhile
//! ```
//!
//! Until connection types and bounds have loaded the context is in the
//! loading state: reads and dispatches return `Error::Loading`.

pub mod config;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::action::{FilterAction, QueryAction};
use crate::bounds::BoundsService;
use crate::history::{History, HistoryStatus};
use crate::model::{ConnectionType, DataBounds, FilterConfiguration, GraphQuery};
use crate::reducer::{FilterReducer, QueryReducer, Reducer};
use crate::{Error, Result};

pub use config::{ConnectionChangePolicy, ContextConfig};

// ============================================================================
// Views
// ============================================================================

/// Everything a ready context exposes, as one consistent snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSnapshot {
    pub filter: Arc<FilterConfiguration>,
    pub query: Arc<GraphQuery>,
    pub bounds: Arc<DataBounds>,
    pub connection_types: Vec<ConnectionType>,
    pub history: HistoryStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContextView {
    /// Bounds not loaded yet; consumers show a loading indicator.
    Loading,
    Ready(ContextSnapshot),
}

impl ContextView {
    pub fn is_loading(&self) -> bool {
        matches!(self, ContextView::Loading)
    }
}

// ============================================================================
// QueryContext
// ============================================================================

pub struct QueryContext<S: BoundsService> {
    service: Arc<S>,
    config: ContextConfig,
    inner: Mutex<ContextInner>,
    filter_tx: watch::Sender<Arc<FilterConfiguration>>,
}

struct ContextInner {
    connection_types: Option<Vec<ConnectionType>>,
    query: Arc<GraphQuery>,
    filter: History<FilterReducer>,
    bounds: Option<Arc<DataBounds>>,
    /// Connection type the current `bounds` were fetched for.
    bounds_for: Option<ConnectionType>,
    /// Bumped on every bounds request; only the latest request may land.
    generation: u64,
    /// Generation of the request that produced `bounds`.
    loaded_generation: u64,
    /// Reset policy switch waiting for its bounds.
    pending_reset: bool,
    last_error: Option<String>,
}

impl ContextInner {
    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// The latest request has landed and was for `connection_type`.
    fn is_loaded_for(&self, connection_type: ConnectionType) -> bool {
        self.bounds_for == Some(connection_type) && self.loaded_generation == self.generation
    }

    fn is_ready(&self) -> bool {
        self.connection_types.is_some() && self.bounds.is_some()
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() { Ok(()) } else { Err(Error::Loading) }
    }
}

impl<S: BoundsService> QueryContext<S> {
    pub fn new(service: Arc<S>, config: ContextConfig) -> Self {
        let reducer = FilterReducer::new(config.initial_filter.clone());
        let filter = History::new(reducer, config.initial_filter.clone())
            .with_limit(config.history_limit);
        let (filter_tx, _) = watch::channel(Arc::clone(filter.current()));

        Self {
            service,
            config,
            inner: Mutex::new(ContextInner {
                connection_types: None,
                query: Arc::new(GraphQuery::default()),
                filter,
                bounds: None,
                bounds_for: None,
                generation: 0,
                loaded_generation: 0,
                pending_reset: false,
                last_error: None,
            }),
            filter_tx,
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Fetch the connection types, select the first and load its bounds.
    pub async fn initialize(&self) -> Result<()> {
        let types = match self.service.connection_types().await {
            Ok(types) => types,
            Err(e) => {
                warn!(error = %e, "connection type fetch failed");
                self.inner.lock().last_error = Some(e.to_string());
                return Err(e);
            }
        };
        let Some(&first) = types.first() else {
            return Err(Error::NoConnectionTypes);
        };

        let generation = {
            let mut inner = self.inner.lock();
            inner.connection_types = Some(types);
            inner.query = QueryReducer.reduce(&inner.query, &QueryAction::SetConnectionType(first));
            inner.next_generation()
        };
        info!(connection_type = %first, "query context initializing");
        self.fetch_bounds(first, generation).await
    }

    /// Switch connection type and re-fetch its bounds.
    ///
    /// If another switch happens before this fetch resolves, this response
    /// is discarded. A failed fetch keeps the previous bounds, and calling
    /// this again with the same connection type retries the fetch.
    ///
    /// Under [`ConnectionChangePolicy::Reset`] the filter history and focus
    /// entities are reset only once the new bounds land.
    pub async fn set_connection_type(&self, connection_type: ConnectionType) -> Result<()> {
        let (generation, reset) = {
            let mut inner = self.inner.lock();
            let Some(types) = inner.connection_types.as_ref() else {
                return Err(Error::Loading);
            };
            if !types.contains(&connection_type) {
                return Err(Error::UnknownConnectionType(connection_type.to_string()));
            }
            if inner.is_loaded_for(connection_type) {
                return Ok(());
            }

            let reset = self.config.connection_change == ConnectionChangePolicy::Reset;
            inner.pending_reset |= reset;
            let action = QueryAction::SetConnectionType(connection_type);
            inner.query = QueryReducer.reduce(&inner.query, &action);
            (inner.next_generation(), reset)
        };

        info!(%connection_type, reset, "connection type changed");
        self.fetch_bounds(connection_type, generation).await
    }

    /// Re-fetch bounds for the current connection type (e.g. after a failure).
    pub async fn refresh_bounds(&self) -> Result<()> {
        let (connection_type, generation) = {
            let mut inner = self.inner.lock();
            let Some(ct) = inner.query.connection_type else {
                return Err(Error::Loading);
            };
            (ct, inner.next_generation())
        };
        self.fetch_bounds(connection_type, generation).await
    }

    async fn fetch_bounds(&self, connection_type: ConnectionType, generation: u64) -> Result<()> {
        let result = self.service.data_bounds(connection_type).await;

        let mut inner = self.inner.lock();
        let current = inner.generation == generation;
        match result {
            Ok(bounds) if current => {
                info!(%connection_type, "data bounds loaded");
                inner.bounds = Some(Arc::new(bounds));
                inner.bounds_for = Some(connection_type);
                inner.loaded_generation = generation;
                inner.last_error = None;
                if std::mem::take(&mut inner.pending_reset) {
                    inner.filter.reset(self.config.initial_filter.clone());
                    inner.query = Arc::new(GraphQuery::new(connection_type));
                    self.filter_tx.send_replace(Arc::clone(inner.filter.current()));
                    info!(%connection_type, "filter history reset for new connection type");
                }
                Ok(())
            }
            Ok(_) => {
                warn!(%connection_type, generation, latest = inner.generation, "discarding stale data bounds");
                Ok(())
            }
            Err(e) => {
                warn!(%connection_type, error = %e, "data bounds fetch failed");
                if current {
                    inner.last_error = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn view(&self) -> ContextView {
        let inner = self.inner.lock();
        match (&inner.connection_types, &inner.bounds) {
            (Some(types), Some(bounds)) => ContextView::Ready(ContextSnapshot {
                filter: Arc::clone(inner.filter.current()),
                query: Arc::clone(&inner.query),
                bounds: Arc::clone(bounds),
                connection_types: types.clone(),
                history: inner.filter.status(),
            }),
            _ => ContextView::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.inner.lock().is_ready()
    }

    pub fn filter(&self) -> Result<Arc<FilterConfiguration>> {
        let inner = self.inner.lock();
        inner.ensure_ready()?;
        Ok(Arc::clone(inner.filter.current()))
    }

    pub fn query(&self) -> Result<Arc<GraphQuery>> {
        let inner = self.inner.lock();
        inner.ensure_ready()?;
        Ok(Arc::clone(&inner.query))
    }

    /// Latest accepted bounds, available even while a newer fetch is pending.
    pub fn bounds(&self) -> Option<Arc<DataBounds>> {
        self.inner.lock().bounds.clone()
    }

    /// Connection type the current bounds belong to. Differs from the
    /// query's connection type while a switch is pending or after it failed.
    pub fn bounds_connection_type(&self) -> Option<ConnectionType> {
        self.inner.lock().bounds_for
    }

    /// Most recent fetch failure, cleared by the next successful fetch.
    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }

    /// Receiver that sees every accepted filter transition.
    pub fn subscribe(&self) -> watch::Receiver<Arc<FilterConfiguration>> {
        self.filter_tx.subscribe()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Apply a filter action. Returns whether the filter changed.
    pub fn dispatch_filter(&self, action: FilterAction) -> Result<bool> {
        let mut inner = self.inner.lock();
        inner.ensure_ready()?;
        action.validate()?;

        debug!(action = action.tag(), "dispatch filter action");
        let changed = inner.filter.dispatch(&action);
        if changed {
            self.filter_tx.send_replace(Arc::clone(inner.filter.current()));
        }
        Ok(changed)
    }

    /// Apply a focus-entity action. Connection type changes must go
    /// through [`set_connection_type`](Self::set_connection_type).
    pub fn dispatch_query(&self, action: QueryAction) -> Result<bool> {
        if let QueryAction::SetConnectionType(_) = action {
            return Err(Error::InvalidPayload {
                action: action.tag(),
                reason: "connection type changes require a bounds fetch".to_string(),
            });
        }

        let mut inner = self.inner.lock();
        inner.ensure_ready()?;
        debug!(action = action.tag(), "dispatch query action");
        let next = QueryReducer.reduce(&inner.query, &action);
        let changed = !Arc::ptr_eq(&next, &inner.query);
        inner.query = next;
        Ok(changed)
    }

    // ========================================================================
    // History controls
    // ========================================================================

    pub fn undo(&self) -> Result<bool> {
        self.step(History::undo)
    }

    pub fn redo(&self) -> Result<bool> {
        self.step(History::redo)
    }

    pub fn history_status(&self) -> Result<HistoryStatus> {
        let inner = self.inner.lock();
        inner.ensure_ready()?;
        Ok(inner.filter.status())
    }

    fn step(&self, op: fn(&mut History<FilterReducer>) -> bool) -> Result<bool> {
        let mut inner = self.inner.lock();
        inner.ensure_ready()?;
        let moved = op(&mut inner.filter);
        if moved {
            self.filter_tx.send_replace(Arc::clone(inner.filter.current()));
        }
        Ok(moved)
    }
}
