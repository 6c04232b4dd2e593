use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::common::labels::Labels;
use crate::common::types::TimeRange;
use crate::error::ProxyResult;
use crate::store::{LabelRequest, SeriesRequest, SeriesResponse};

/// A store's response stream. Series within one stream arrive in
/// non-decreasing label-set order, each label set at most once; warnings may
/// interleave anywhere. An `Err` item is terminal.
pub type SeriesStream = BoxStream<'static, ProxyResult<SeriesResponse>>;

/// StoreClient is the capability set one storage backend exposes to the
/// proxy. Clients outlive individual requests and are shared read-only
/// across concurrent requests.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Identifies the store in warnings and log lines.
    fn name(&self) -> &str;

    /// The advisory time window this store could answer for. A store may
    /// still legitimately return no data inside it.
    fn time_range(&self) -> TimeRange;

    /// Label sets this store is known to serve, used to prune fan-out.
    /// Empty means unknown.
    fn label_sets(&self) -> Vec<Labels> {
        Vec::new()
    }

    /// Opens a streaming series query. Resolves once the store begins
    /// responding; the response-start deadline applies to this call.
    async fn series(&self, request: &SeriesRequest) -> ProxyResult<SeriesStream>;

    /// Label names with data in the request window.
    async fn label_names(&self, request: &LabelRequest) -> ProxyResult<Vec<String>>;

    /// Values of `name` with data in the request window.
    async fn label_values(&self, name: &str, request: &LabelRequest) -> ProxyResult<Vec<String>>;
}

/// The live store set, refreshed externally on its own cadence. The proxy
/// calls it once per request and treats the returned list as an immutable
/// snapshot for the lifetime of that request.
pub type StoreProvider = Arc<dyn Fn() -> Vec<Arc<dyn StoreClient>> + Send + Sync>;
