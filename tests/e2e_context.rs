//! End-to-end tests for `QueryContext`: loading, bounds races, fetch
//! failures, connection-change policy and filter subscriptions.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use graph_filter::{
    BoundsService, ConnectionChangePolicy, ConnectionType, ContextConfig, ContextView,
    DataBounds, Error, FilterAction, FilterConfiguration, MemoryBoundsService, QueryAction,
    QueryContext, Result,
};

// ============================================================================
// Helper: a bounds service whose responses the test releases by hand.
// ============================================================================

type Pending = (ConnectionType, oneshot::Sender<Result<DataBounds>>);

struct GatedService {
    types: Vec<ConnectionType>,
    requests: mpsc::UnboundedSender<Pending>,
}

#[async_trait]
impl BoundsService for GatedService {
    async fn connection_types(&self) -> Result<Vec<ConnectionType>> {
        Ok(self.types.clone())
    }

    async fn data_bounds(&self, connection_type: ConnectionType) -> Result<DataBounds> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send((connection_type, tx))
            .map_err(|_| Error::BoundsFetch("test harness gone".into()))?;
        rx.await
            .map_err(|_| Error::BoundsFetch("request dropped".into()))?
    }
}

fn gated() -> (Arc<QueryContext<GatedService>>, mpsc::UnboundedReceiver<Pending>) {
    gated_with(ContextConfig::default())
}

fn gated_with(
    config: ContextConfig,
) -> (Arc<QueryContext<GatedService>>, mpsc::UnboundedReceiver<Pending>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let service = GatedService {
        types: vec![ConnectionType::Relation, ConnectionType::Cooccurrence],
        requests: tx,
    };
    let ctx = QueryContext::new(Arc::new(service), config);
    (Arc::new(ctx), rx)
}

async fn switch_and_reply(
    ctx: &Arc<QueryContext<GatedService>>,
    requests: &mut mpsc::UnboundedReceiver<Pending>,
    connection_type: ConnectionType,
    reply: Result<DataBounds>,
) -> Result<()> {
    let switch = tokio::spawn({
        let ctx = Arc::clone(ctx);
        async move { ctx.set_connection_type(connection_type).await }
    });
    let (ct, tx) = requests.recv().await.unwrap();
    assert_eq!(ct, connection_type);
    tx.send(reply).unwrap();
    switch.await.unwrap()
}

fn relation_bounds() -> DataBounds {
    DataBounds::new(1, 10, 1, 5)
}

fn cooccurrence_bounds() -> DataBounds {
    DataBounds::new(1, 900, 1, 400).with_category("kind", ["person", "place"])
}

async fn initialized(
    ctx: &Arc<QueryContext<GatedService>>,
    requests: &mut mpsc::UnboundedReceiver<Pending>,
) {
    let init = tokio::spawn({
        let ctx = Arc::clone(ctx);
        async move { ctx.initialize().await }
    });
    let (ct, reply) = requests.recv().await.unwrap();
    assert_eq!(ct, ConnectionType::Relation);
    reply.send(Ok(relation_bounds())).unwrap();
    init.await.unwrap().unwrap();
}

fn memory_service() -> Arc<MemoryBoundsService> {
    Arc::new(
        MemoryBoundsService::new()
            .with_bounds(ConnectionType::Relation, relation_bounds())
            .with_bounds(ConnectionType::Cooccurrence, cooccurrence_bounds()),
    )
}

// ============================================================================
// 1. Loading state hides filter and dispatch
// ============================================================================

#[tokio::test]
async fn test_loading_until_bounds_arrive() {
    let (ctx, mut requests) = gated();
    let init = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        async move { ctx.initialize().await }
    });

    let (_, reply) = requests.recv().await.unwrap();
    assert_eq!(ctx.view(), ContextView::Loading);
    assert!(matches!(ctx.dispatch_filter(FilterAction::SetNodeLimit(5)), Err(Error::Loading)));

    reply.send(Ok(relation_bounds())).unwrap();
    init.await.unwrap().unwrap();
    assert!(!ctx.view().is_loading());
    assert_eq!(*ctx.bounds().unwrap(), relation_bounds());
}

// ============================================================================
// 2. Overlapping fetches: the latest request wins
// ============================================================================

#[tokio::test]
async fn test_stale_bounds_response_is_discarded() {
    let (ctx, mut requests) = gated();
    initialized(&ctx, &mut requests).await;

    let first = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        async move { ctx.set_connection_type(ConnectionType::Cooccurrence).await }
    });
    let (ct, cooc_reply) = requests.recv().await.unwrap();
    assert_eq!(ct, ConnectionType::Cooccurrence);

    let second = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        async move { ctx.set_connection_type(ConnectionType::Relation).await }
    });
    let (ct, rel_reply) = requests.recv().await.unwrap();
    assert_eq!(ct, ConnectionType::Relation);

    // Newer request resolves first, the older one after it.
    let fresh = DataBounds::new(2, 20, 2, 8);
    rel_reply.send(Ok(fresh.clone())).unwrap();
    second.await.unwrap().unwrap();
    cooc_reply.send(Ok(cooccurrence_bounds())).unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(*ctx.bounds().unwrap(), fresh);
    assert_eq!(ctx.query().unwrap().connection_type, Some(ConnectionType::Relation));
}

// ============================================================================
// 3. Fetch failure keeps bounds and history
// ============================================================================

#[tokio::test]
async fn test_fetch_failure_preserves_state() {
    let (ctx, mut requests) = gated();
    initialized(&ctx, &mut requests).await;

    ctx.dispatch_filter(FilterAction::SetNodeLimit(42)).unwrap();
    ctx.dispatch_filter(FilterAction::add_whitelist("e1")).unwrap();

    let switch = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        async move { ctx.set_connection_type(ConnectionType::Cooccurrence).await }
    });
    let (_, reply) = requests.recv().await.unwrap();
    reply.send(Err(Error::BoundsFetch("503 Service Unavailable".into()))).unwrap();

    let result = switch.await.unwrap();
    assert!(matches!(result, Err(Error::BoundsFetch(_))));
    assert!(ctx.last_error().unwrap().contains("503"));

    assert_eq!(*ctx.bounds().unwrap(), relation_bounds());
    assert_eq!(ctx.filter().unwrap().limit_nodes, 42);
    assert!(ctx.history_status().unwrap().can_undo);

    // Retry succeeds and clears the error.
    let retry = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        async move { ctx.refresh_bounds().await }
    });
    let (ct, reply) = requests.recv().await.unwrap();
    assert_eq!(ct, ConnectionType::Cooccurrence);
    reply.send(Ok(cooccurrence_bounds())).unwrap();
    retry.await.unwrap().unwrap();
    assert_eq!(ctx.last_error(), None);
    assert_eq!(*ctx.bounds().unwrap(), cooccurrence_bounds());
}

#[tokio::test]
async fn test_retrying_failed_switch_fetches_again() {
    let (ctx, mut requests) = gated();
    initialized(&ctx, &mut requests).await;

    let failed = Err(Error::BoundsFetch("timeout".into()));
    let result = switch_and_reply(&ctx, &mut requests, ConnectionType::Cooccurrence, failed).await;
    assert!(result.is_err());
    assert_eq!(ctx.query().unwrap().connection_type, Some(ConnectionType::Cooccurrence));
    assert_eq!(ctx.bounds_connection_type(), Some(ConnectionType::Relation));

    // Same connection type again: a new request goes out.
    let ok = Ok(cooccurrence_bounds());
    switch_and_reply(&ctx, &mut requests, ConnectionType::Cooccurrence, ok).await.unwrap();
    assert_eq!(*ctx.bounds().unwrap(), cooccurrence_bounds());
    assert_eq!(ctx.bounds_connection_type(), Some(ConnectionType::Cooccurrence));
    assert_eq!(ctx.last_error(), None);

    // Now loaded: selecting it again issues no request.
    ctx.set_connection_type(ConnectionType::Cooccurrence).await.unwrap();
    assert!(requests.try_recv().is_err());
}

// ============================================================================
// 4. Connection-change policies
// ============================================================================

#[tokio::test]
async fn test_preserve_policy_keeps_history() {
    let ctx = QueryContext::new(memory_service(), ContextConfig::default());
    ctx.initialize().await.unwrap();
    ctx.dispatch_filter(FilterAction::SetNodeLimit(7)).unwrap();
    ctx.dispatch_query(QueryAction::add_focus("e9")).unwrap();

    ctx.set_connection_type(ConnectionType::Cooccurrence).await.unwrap();

    assert_eq!(ctx.filter().unwrap().limit_nodes, 7);
    assert!(ctx.history_status().unwrap().can_undo);
    assert!(ctx.query().unwrap().is_focused_on(&"e9".into()));
    assert_eq!(ctx.bounds().unwrap().maximum_possible_node_frequency, 900);
}

#[tokio::test]
async fn test_reset_policy_clears_history() {
    let config = ContextConfig::default()
        .with_initial_filter(FilterConfiguration::with_limits(30, 60))
        .with_connection_change(ConnectionChangePolicy::Reset);
    let ctx = QueryContext::new(memory_service(), config);
    ctx.initialize().await.unwrap();
    ctx.dispatch_filter(FilterAction::SetNodeLimit(7)).unwrap();
    ctx.dispatch_query(QueryAction::add_focus("e9")).unwrap();

    ctx.set_connection_type(ConnectionType::Cooccurrence).await.unwrap();

    assert_eq!(*ctx.filter().unwrap(), FilterConfiguration::with_limits(30, 60));
    assert!(!ctx.history_status().unwrap().can_undo);
    assert_eq!(ctx.query().unwrap().focus_entities, None);
}

#[tokio::test]
async fn test_reset_policy_waits_for_bounds() {
    let config = ContextConfig::default().with_connection_change(ConnectionChangePolicy::Reset);
    let (ctx, mut requests) = gated_with(config);
    initialized(&ctx, &mut requests).await;
    ctx.dispatch_filter(FilterAction::SetNodeLimit(7)).unwrap();
    ctx.dispatch_query(QueryAction::add_focus("e9")).unwrap();
    let mut rx = ctx.subscribe();

    let failed = Err(Error::BoundsFetch("503".into()));
    let result = switch_and_reply(&ctx, &mut requests, ConnectionType::Cooccurrence, failed).await;
    assert!(result.is_err());
    assert_eq!(ctx.filter().unwrap().limit_nodes, 7);
    assert!(ctx.history_status().unwrap().can_undo);
    assert!(ctx.query().unwrap().is_focused_on(&"e9".into()));
    assert!(!rx.has_changed().unwrap());

    let ok = Ok(cooccurrence_bounds());
    switch_and_reply(&ctx, &mut requests, ConnectionType::Cooccurrence, ok).await.unwrap();
    assert_eq!(*ctx.filter().unwrap(), FilterConfiguration::initial());
    assert!(!ctx.history_status().unwrap().can_undo);
    assert_eq!(ctx.query().unwrap().focus_entities, None);
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().limit_nodes, 100);
}

#[tokio::test]
async fn test_unknown_connection_type_rejected() {
    let service = Arc::new(
        MemoryBoundsService::new().with_bounds(ConnectionType::Relation, relation_bounds()),
    );
    let ctx = QueryContext::new(service, ContextConfig::default());
    ctx.initialize().await.unwrap();

    let err = ctx.set_connection_type(ConnectionType::Cooccurrence).await;
    assert!(matches!(err, Err(Error::UnknownConnectionType(_))));
}

// ============================================================================
// 5. Subscribers see every accepted transition
// ============================================================================

#[tokio::test]
async fn test_subscribers_receive_transitions() {
    let ctx = QueryContext::new(memory_service(), ContextConfig::default());
    ctx.initialize().await.unwrap();
    let mut rx = ctx.subscribe();

    ctx.dispatch_filter(FilterAction::SetNodeLimit(50)).unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().limit_nodes, 50);

    ctx.dispatch_filter(FilterAction::SetNodeLimit(50)).unwrap();
    assert!(!rx.has_changed().unwrap());

    ctx.undo().unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().limit_nodes, 100);

    ctx.redo().unwrap();
    assert_eq!(rx.borrow_and_update().limit_nodes, 50);
}

// ============================================================================
// 6. History limit from configuration
// ============================================================================

#[tokio::test]
async fn test_history_limit() {
    let ctx = QueryContext::new(memory_service(), ContextConfig::default().with_history_limit(2));
    ctx.initialize().await.unwrap();
    for n in 1..=5 {
        ctx.dispatch_filter(FilterAction::SetEdgeLimit(n)).unwrap();
    }
    assert!(ctx.undo().unwrap());
    assert!(ctx.undo().unwrap());
    assert!(!ctx.undo().unwrap());
    assert_eq!(ctx.filter().unwrap().limit_edges, 3);
}
