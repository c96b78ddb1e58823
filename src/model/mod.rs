//! # Filter Model
//!
//! Plain values that cross every boundary: reducer ↔ history ↔ context ↔ UI.
//!
//! Design rule: this module is pure data — no I/O, no state, no async.

pub mod entity;
pub mod filter;
pub mod bounds;
pub mod query;

pub use entity::EntityId;
pub use filter::{
    FilterConfiguration, FrequencyRange, DateRange, OrdinalRange, CategorySelection,
    DEFAULT_NODE_LIMIT, DEFAULT_EDGE_LIMIT,
};
pub use bounds::DataBounds;
pub use query::{ConnectionType, GraphQuery};
