use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ProxyError, ProxyResult};
use crate::store::{SeriesRequest, SeriesResponse, SeriesStream, StoreClient};

/// One store's response sequence as handed to the merge engine: a pull-based
/// queue fed by that store's task. The channel closing means the stream
/// ended cleanly; an `Err` item is terminal and never followed by more data.
pub(crate) struct StoreStream {
    pub rx: mpsc::Receiver<ProxyResult<SeriesResponse>>,
}

/// Starts one task per store, all querying concurrently. Tasks never share
/// state; each one owns its transport stream and hands completed units to
/// the single consumer through its own bounded channel.
pub(crate) fn start_streams(
    stores: &[Arc<dyn StoreClient>],
    request: &SeriesRequest,
    response_timeout: Duration,
    buffer_size: usize,
    cancel: &CancellationToken,
) -> Vec<StoreStream> {
    stores
        .iter()
        .map(|store| {
            let (tx, rx) = mpsc::channel(buffer_size.max(1));
            tokio::spawn(run_stream(
                Arc::clone(store),
                request.clone(),
                response_timeout,
                cancel.clone(),
                tx,
            ));
            StoreStream { rx }
        })
        .collect()
}

async fn run_stream(
    store: Arc<dyn StoreClient>,
    request: SeriesRequest,
    response_timeout: Duration,
    cancel: CancellationToken,
    tx: mpsc::Sender<ProxyResult<SeriesResponse>>,
) {
    let name = store.name().to_string();
    debug!(store = %name, "starting series stream");

    let mut stream = match open_stream(store.as_ref(), &request, response_timeout, &cancel).await {
        Ok(Some(stream)) => stream,
        // cancelled while opening
        Ok(None) => return,
        Err(err) => {
            warn!(store = %name, error = %err, "series stream failed to start");
            let _ = tx.send(Err(err)).await;
            return;
        }
    };

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            unit = stream.next() => match unit {
                Some(Ok(unit)) => {
                    if tx.send(Ok(unit)).await.is_err() {
                        // consumer hung up
                        return;
                    }
                }
                Some(Err(err)) => {
                    warn!(store = %name, error = %err, "series stream aborted");
                    let _ = tx.send(Err(ProxyError::store_stream(&name, err))).await;
                    return;
                }
                None => return,
            }
        }
    }
}

/// Opens the store's stream, bounded by the response-start deadline.
/// A zero deadline means unbounded. Returns Ok(None) on cancellation.
async fn open_stream(
    store: &dyn StoreClient,
    request: &SeriesRequest,
    response_timeout: Duration,
    cancel: &CancellationToken,
) -> ProxyResult<Option<SeriesStream>> {
    let open = store.series(request);
    if response_timeout.is_zero() {
        return tokio::select! {
            biased;
            _ = cancel.cancelled() => Ok(None),
            opened = open => opened
                .map(Some)
                .map_err(|err| ProxyError::store_stream(store.name(), err)),
        };
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Ok(None),
        opened = tokio::time::timeout(response_timeout, open) => match opened {
            Ok(opened) => opened
                .map(Some)
                .map_err(|err| ProxyError::store_stream(store.name(), err)),
            Err(_) => Err(ProxyError::StoreTimeout {
                store: store.name().to_string(),
                after: response_timeout,
            }),
        },
    }
}
