use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;

use crate::common::labels::Labels;
use crate::common::types::TimeRange;
use crate::error::{ProxyError, ProxyResult};
use crate::store::{
    LabelRequest, Series, SeriesRequest, SeriesResponse, SeriesStream, StoreClient, StoreProvider,
};

/// A scripted store for tests: replays a fixed response sequence, optionally
/// after a delay or behind an open error, and counts how often it is hit.
pub(crate) struct MockStore {
    name: String,
    range: TimeRange,
    label_sets: Vec<Labels>,
    responses: Vec<ProxyResult<SeriesResponse>>,
    label_names: Vec<String>,
    label_values: Vec<String>,
    open_error: Option<ProxyError>,
    open_delay: Duration,
    series_calls: AtomicUsize,
}

impl MockStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            range: TimeRange::UNBOUNDED,
            label_sets: Vec::new(),
            responses: Vec::new(),
            label_names: Vec::new(),
            label_values: Vec::new(),
            open_error: None,
            open_delay: Duration::ZERO,
            series_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_label_sets(mut self, label_sets: Vec<Labels>) -> Self {
        self.label_sets = label_sets;
        self
    }

    pub fn with_series(mut self, series: Vec<Series>) -> Self {
        self.responses
            .extend(series.into_iter().map(|s| Ok(SeriesResponse::Series(s))));
        self
    }

    pub fn with_warning(mut self, warning: &str) -> Self {
        self.responses
            .push(Ok(SeriesResponse::Warning(warning.to_string())));
        self
    }

    /// Terminates the scripted stream with an error after whatever was
    /// queued so far.
    pub fn with_stream_error(mut self, message: &str) -> Self {
        self.responses
            .push(Err(ProxyError::General(message.to_string())));
        self
    }

    pub fn with_open_error(mut self, err: ProxyError) -> Self {
        self.open_error = Some(err);
        self
    }

    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    pub fn with_label_names(mut self, names: &[&str]) -> Self {
        self.label_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_label_values(mut self, values: &[&str]) -> Self {
        self.label_values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn series_calls(&self) -> usize {
        self.series_calls.load(Ordering::SeqCst)
    }

    async fn begin(&self) -> ProxyResult<()> {
        if !self.open_delay.is_zero() {
            tokio::time::sleep(self.open_delay).await;
        }
        match &self.open_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StoreClient for MockStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn time_range(&self) -> TimeRange {
        self.range
    }

    fn label_sets(&self) -> Vec<Labels> {
        self.label_sets.clone()
    }

    async fn series(&self, _request: &SeriesRequest) -> ProxyResult<SeriesStream> {
        self.series_calls.fetch_add(1, Ordering::SeqCst);
        self.begin().await?;
        Ok(futures::stream::iter(self.responses.clone()).boxed())
    }

    async fn label_names(&self, _request: &LabelRequest) -> ProxyResult<Vec<String>> {
        self.begin().await?;
        Ok(self.label_names.clone())
    }

    async fn label_values(&self, _name: &str, _request: &LabelRequest) -> ProxyResult<Vec<String>> {
        self.begin().await?;
        Ok(self.label_values.clone())
    }
}

/// Wraps a fixed store list as the provider closure the proxy consumes.
pub(crate) fn fixed_provider(stores: Vec<Arc<dyn StoreClient>>) -> StoreProvider {
    Arc::new(move || stores.clone())
}
