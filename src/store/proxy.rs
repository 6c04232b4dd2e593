use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::common::types::TimeRange;
use crate::config::Settings;
use crate::error::{ProxyError, ProxyResult};
use crate::store::fanout::start_streams;
use crate::store::merge::{merge_streams, MergeOutput};
use crate::store::select::select_stores;
use crate::store::{
    LabelRequest, LabelResult, QueryResult, SeriesRequest, StoreClient, StoreProvider,
};

/// ProxyStore fans a series request out to every store that could hold
/// matching data and merges the streamed responses into one label-set
/// ordered result. Individual store faults degrade the result to a partial
/// one with warnings; only losing every store fails the call.
pub struct ProxyStore {
    stores: StoreProvider,
    settings: Settings,
}

enum LabelQuery {
    Names,
    Values(String),
}

impl ProxyStore {
    pub fn new(stores: StoreProvider, settings: Settings) -> Self {
        Self { stores, settings }
    }

    /// The union of the advisory time ranges of all currently known stores.
    /// Empty when no stores are known.
    pub fn time_range(&self) -> TimeRange {
        (self.stores)()
            .iter()
            .map(|store| store.time_range())
            .fold(TimeRange::new(i64::MAX, i64::MIN), |acc, range| {
                acc.union(&range)
            })
    }

    /// Queries series matching the request across all eligible stores.
    /// Series come back sorted by label set; warnings carry every non-fatal
    /// store problem in the order it surfaced.
    pub async fn series(&self, request: &SeriesRequest) -> ProxyResult<QueryResult> {
        self.series_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Like [`series`](Self::series), bounded by a caller-owned cancellation
    /// token. Cancelling it fails the call with `Cancelled` and promptly
    /// stops every in-flight store task.
    pub async fn series_with_cancel(
        &self,
        request: &SeriesRequest,
        cancel: CancellationToken,
    ) -> ProxyResult<QueryResult> {
        // An inverted time window selects nothing by definition.
        if request.range().is_empty() {
            return Ok(QueryResult::default());
        }

        let stores = (self.stores)();
        let selected = select_stores(stores, request);
        if selected.is_empty() {
            debug!("no store matched the request");
            return Ok(QueryResult::default());
        }
        let selected_count = selected.len();
        debug!(stores = selected_count, "fanning series request out");

        // Store tasks listen on a child token so that both the caller's
        // cancel and this future being dropped tear them down.
        let child = cancel.child_token();
        let _stop_on_drop = child.clone().drop_guard();
        let streams = start_streams(
            &selected,
            request,
            self.settings.response_timeout,
            self.settings.stream_buffer_size,
            &child,
        );

        let merged = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProxyError::Cancelled),
            merged = merge_streams(streams) => merged,
        };

        let MergeOutput {
            series,
            warnings,
            mut failures,
        } = merged;
        if failures.len() == selected_count {
            return Err(ProxyError::AllStoresFailed(selected_count));
        }
        if !request.partial_response {
            if let Some(err) = failures.drain(..).next() {
                return Err(err);
            }
        }
        Ok(QueryResult { series, warnings })
    }

    /// Label names present across all eligible stores, sorted and
    /// deduplicated, under the same partial-response policy as `series`.
    pub async fn label_names(&self, request: &LabelRequest) -> ProxyResult<LabelResult> {
        self.fanout_labels(request, LabelQuery::Names).await
    }

    /// Values of one label name across all eligible stores, sorted and
    /// deduplicated.
    pub async fn label_values(&self, name: &str, request: &LabelRequest) -> ProxyResult<LabelResult> {
        self.fanout_labels(request, LabelQuery::Values(name.to_string()))
            .await
    }

    async fn fanout_labels(
        &self,
        request: &LabelRequest,
        query: LabelQuery,
    ) -> ProxyResult<LabelResult> {
        if request.range().is_empty() {
            return Ok(LabelResult::default());
        }

        let range = request.range();
        let selected: Vec<Arc<dyn StoreClient>> = (self.stores)()
            .into_iter()
            .filter(|store| store.time_range().overlaps(&range))
            .collect();
        if selected.is_empty() {
            return Ok(LabelResult::default());
        }

        let timeout = self.settings.response_timeout;
        let calls = selected
            .iter()
            .map(|store| bounded_label_call(store.as_ref(), request, &query, timeout));
        let responses = futures::future::join_all(calls).await;

        let mut values: Vec<String> = Vec::new();
        let mut warnings = Vec::new();
        let mut failures = Vec::new();
        for response in responses {
            match response {
                Ok(store_values) => values.extend(store_values),
                Err(err) => {
                    warnings.push(err.to_string());
                    failures.push(err);
                }
            }
        }
        if failures.len() == selected.len() {
            return Err(ProxyError::AllStoresFailed(selected.len()));
        }
        if !request.partial_response {
            if let Some(err) = failures.drain(..).next() {
                return Err(err);
            }
        }
        values.sort_unstable();
        values.dedup();
        Ok(LabelResult { values, warnings })
    }
}

async fn bounded_label_call(
    store: &dyn StoreClient,
    request: &LabelRequest,
    query: &LabelQuery,
    timeout: Duration,
) -> ProxyResult<Vec<String>> {
    let call = async {
        match query {
            LabelQuery::Names => store.label_names(request).await,
            LabelQuery::Values(name) => store.label_values(name, request).await,
        }
    };
    if timeout.is_zero() {
        return call
            .await
            .map_err(|err| ProxyError::store_stream(store.name(), err));
    }
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(|err| ProxyError::store_stream(store.name(), err)),
        Err(_) => Err(ProxyError::StoreTimeout {
            store: store.name().to_string(),
            after: timeout,
        }),
    }
}
