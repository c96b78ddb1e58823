//! In-memory bounds service.
//!
//! Serves bounds registered up front. Useful for tests and for embedding
//! the filter machinery where bounds are already known.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::model::{ConnectionType, DataBounds};
use crate::{Error, Result};
use super::BoundsService;

#[derive(Default)]
pub struct MemoryBoundsService {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    /// Registration order doubles as preference order.
    order: Vec<ConnectionType>,
    bounds: HashMap<ConnectionType, DataBounds>,
}

impl MemoryBoundsService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(self, connection_type: ConnectionType, bounds: DataBounds) -> Self {
        self.insert(connection_type, bounds);
        self
    }

    /// Register or replace the bounds for a connection type.
    pub fn insert(&self, connection_type: ConnectionType, bounds: DataBounds) {
        let mut inner = self.inner.write();
        if !inner.order.contains(&connection_type) {
            inner.order.push(connection_type);
        }
        inner.bounds.insert(connection_type, bounds);
    }
}

#[async_trait]
impl BoundsService for MemoryBoundsService {
    async fn connection_types(&self) -> Result<Vec<ConnectionType>> {
        Ok(self.inner.read().order.clone())
    }

    async fn data_bounds(&self, connection_type: ConnectionType) -> Result<DataBounds> {
        self.inner
            .read()
            .bounds
            .get(&connection_type)
            .cloned()
            .ok_or_else(|| Error::BoundsFetch(format!("no bounds for connection type {connection_type}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_registered_bounds() {
        let svc = MemoryBoundsService::new()
            .with_bounds(ConnectionType::Cooccurrence, DataBounds::new(1, 9, 1, 4))
            .with_bounds(ConnectionType::Relation, DataBounds::new(1, 5, 1, 2));

        assert_eq!(
            svc.connection_types().await.unwrap(),
            vec![ConnectionType::Cooccurrence, ConnectionType::Relation]
        );
        let b = svc.data_bounds(ConnectionType::Relation).await.unwrap();
        assert_eq!(b.maximum_possible_node_frequency, 5);
    }

    #[tokio::test]
    async fn test_missing_bounds_is_fetch_error() {
        let svc = MemoryBoundsService::new();
        let err = svc.data_bounds(ConnectionType::Relation).await;
        assert!(matches!(err, Err(Error::BoundsFetch(_))));
    }
}
