//! Fan-out series query proxy.
//!
//! A [`ProxyStore`] takes one series request, fans it out to every
//! [`StoreClient`] that could hold matching data, and merges the streamed,
//! per-store-sorted responses into a single result ordered by label set.
//! Stores answer at their own pace and fail independently; a fault in one
//! degrades the result to a partial one with warnings instead of failing
//! the request.

mod common;
mod config;
mod error;
mod store;

#[cfg(test)]
mod tests;

pub use common::labels::{Label, Labels};
pub use common::matchers::{matches_label_sets, MatchOp, Matcher};
pub use common::types::{TimeRange, Timestamp};
pub use config::{Settings, DEFAULT_RESPONSE_TIMEOUT, DEFAULT_STREAM_BUFFER_SIZE};
pub use error::{ProxyError, ProxyResult};
pub use store::*;
