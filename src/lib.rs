//! # graph-filter — Filter State Machine for Entity/Relation Graphs
//!
//! Narrow a large narrative graph to a meaningful subgraph, one typed
//! action at a time, and backtrack safely through those decisions.
//!
//! ## Design Principles
//!
//! 1. **Closed vocabulary**: `FilterAction` is an exhaustively matched enum
//! 2. **Pure reducers**: `(state, action) -> state`, no I/O, no hidden mutation
//! 3. **Generic history**: `History<R: Reducer>` wraps any reducer with undo/redo
//! 4. **Explicit ownership**: one `QueryContext` per viewer, passed by reference
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use graph_filter::{
//!     ConnectionType, ContextConfig, DataBounds, FilterAction,
//!     MemoryBoundsService, QueryContext,
//! };
//!
//! # async fn example() -> graph_filter::Result<()> {
//! let service = MemoryBoundsService::new()
//!     .with_bounds(ConnectionType::Relation, DataBounds::new(1, 120, 1, 40));
//! let ctx = QueryContext::new(Arc::new(service), ContextConfig::default());
//! ctx.initialize().await?;
//!
//! ctx.dispatch_filter(FilterAction::SetNodeLimit(50))?;
//! ctx.dispatch_filter(FilterAction::add_whitelist("e1"))?;
//! ctx.undo()?;
//!
//! assert_eq!(ctx.filter()?.limit_nodes, 50);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod action;
pub mod reducer;
pub mod history;
pub mod bounds;
pub mod context;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    EntityId, FilterConfiguration, FrequencyRange, DateRange, OrdinalRange,
    DataBounds, ConnectionType, GraphQuery,
};

// ============================================================================
// Re-exports: Actions and reducers
// ============================================================================

pub use action::{CategoryValue, FilterAction, QueryAction};
pub use reducer::{Reducer, FilterReducer, QueryReducer, FnReducer, from_fn, reduce};

// ============================================================================
// Re-exports: History and context
// ============================================================================

pub use history::{History, HistoryStatus};
pub use bounds::{BoundsService, MemoryBoundsService};
pub use context::{
    QueryContext, ContextConfig, ContextView, ContextSnapshot, ConnectionChangePolicy,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid payload for {action}: {reason}")]
    InvalidPayload { action: &'static str, reason: String },

    #[error("Query context is still loading")]
    Loading,

    #[error("Bounds service reported no connection types")]
    NoConnectionTypes,

    #[error("Unknown connection type: {0}")]
    UnknownConnectionType(String),

    #[error("Bounds fetch failed: {0}")]
    BoundsFetch(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
