use serde::{Deserialize, Serialize};

mod client;
mod fanout;
mod merge;
mod proxy;
mod select;

use crate::common::labels::Labels;
use crate::common::matchers::Matcher;
use crate::common::types::{TimeRange, Timestamp};

pub use client::*;
pub use proxy::*;

/// Chunk is an opaque, time-bounded slice of encoded samples. The proxy
/// never decodes chunk payloads; it forwards them by their inclusive
/// `[min_time, max_time]` bounds.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub min_time: Timestamp,
    pub max_time: Timestamp,
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn new(min_time: Timestamp, max_time: Timestamp, data: Vec<u8>) -> Self {
        Self {
            min_time,
            max_time,
            data,
        }
    }
}

/// Series is a label set plus its chunks. Chunks are ordered by `min_time`
/// within one store's response; once merged across stores they keep
/// contributor order and may overlap in time.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub labels: Labels,
    pub chunks: Vec<Chunk>,
}

impl Series {
    pub fn new(labels: Labels, chunks: Vec<Chunk>) -> Self {
        Self { labels, chunks }
    }
}

/// One unit of a store's response stream: either a series or a recoverable
/// store-side problem the caller should see.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SeriesResponse {
    Series(Series),
    Warning(String),
}

/// SeriesRequest selects series by inclusive time bounds and matchers.
/// Matchers are evaluated by the stores, not by the proxy.
#[derive(Clone, Debug)]
pub struct SeriesRequest {
    pub min_time: Timestamp,
    pub max_time: Timestamp,
    pub matchers: Vec<Matcher>,

    /// When false, the first store fault fails the whole request instead of
    /// degrading it to a warning.
    pub partial_response: bool,
}

impl SeriesRequest {
    pub fn new(min_time: Timestamp, max_time: Timestamp, matchers: Vec<Matcher>) -> Self {
        Self {
            min_time,
            max_time,
            matchers,
            partial_response: true,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.min_time, self.max_time)
    }
}

/// LabelRequest bounds a label names/values query in time.
#[derive(Clone, Debug)]
pub struct LabelRequest {
    pub min_time: Timestamp,
    pub max_time: Timestamp,
    pub partial_response: bool,
}

impl LabelRequest {
    pub fn new(min_time: Timestamp, max_time: Timestamp) -> Self {
        Self {
            min_time,
            max_time,
            partial_response: true,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.min_time, self.max_time)
    }
}

/// Final outcome of a proxied series query: the merged series in label-set
/// order plus every warning collected along the way.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryResult {
    pub series: Vec<Series>,
    pub warnings: Vec<String>,
}

/// Outcome of a proxied label names/values query: sorted, deduplicated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LabelResult {
    pub values: Vec<String>,
    pub warnings: Vec<String>,
}
