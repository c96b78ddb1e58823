//! # Bounds Service Trait
//!
//! The contract between the query context and whatever serves data
//! bounds (usually the graph HTTP service). The context only reads from it.
//!
//! ## Implementations
//!
//! | Service | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryBoundsService` | `memory` | Fixed bounds for testing/embedding |

pub mod memory;

use async_trait::async_trait;

use crate::model::{ConnectionType, DataBounds};
use crate::Result;

pub use memory::MemoryBoundsService;

/// Source of connection types and per-type data bounds.
///
/// Failures should be reported as `Error::BoundsFetch`.
#[async_trait]
pub trait BoundsService: Send + Sync + 'static {
    /// Connection types the service can compute graphs for, preferred first.
    async fn connection_types(&self) -> Result<Vec<ConnectionType>>;

    /// Legal ranges and category values for one connection type.
    async fn data_bounds(&self, connection_type: ConnectionType) -> Result<DataBounds>;
}
