use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error, Eq, PartialEq)]
/// Enum for various errors in the proxy.
pub enum ProxyError {
  #[error("Store {store} did not start responding within {after:?}.")]
  StoreTimeout { store: String, after: Duration },

  #[error("Store {store} stream failed. {message}")]
  StoreStream { store: String, message: String },

  #[error("All {0} selected stores failed.")]
  AllStoresFailed(usize),

  #[error("Query cancelled.")]
  Cancelled,

  #[error("Invalid matcher. {0}")]
  InvalidMatcher(String),

  #[error("{0}")]
  General(String),
}

pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
  /// Attributes an arbitrary store fault to `store` as a stream error.
  /// Faults that already carry a store identity pass through unchanged.
  pub fn store_stream(store: &str, err: ProxyError) -> ProxyError {
    match err {
      ProxyError::StoreTimeout { .. } | ProxyError::StoreStream { .. } => err,
      other => ProxyError::StoreStream {
        store: store.to_string(),
        message: other.to_string(),
      },
    }
  }
}
