use crate::error::ProxyError;
use crate::store::fanout::StoreStream;
use crate::store::{Series, SeriesResponse};

/// Everything the merge loop accumulates while draining the store streams:
/// the globally ordered series, warnings in encounter order, and the
/// terminal fault of every store that did not finish cleanly.
#[derive(Default)]
pub(crate) struct MergeOutput {
    pub series: Vec<Series>,
    pub warnings: Vec<String>,
    pub failures: Vec<ProxyError>,
}

/// One store's sequence plus its current frontier entry.
struct Sequence {
    stream: StoreStream,
    head: Option<Series>,
}

/// K-way merge of per-store sorted sequences into one sequence sorted by
/// label set.
///
/// Each round takes the minimum label set among the frontier heads and
/// merges EVERY sequence currently presenting it, concatenating their chunk
/// lists in sequence order with no contributor limit. Emitting on the first
/// match alone would silently drop sibling contributors, so the grouping
/// step is not optional. Chunks are never re-ordered; a merged series is
/// not guaranteed to be internally time-sorted when stores overlap in time.
///
/// The frontier is scanned linearly: the sequence count is the store count,
/// which stays small.
pub(crate) async fn merge_streams(streams: Vec<StoreStream>) -> MergeOutput {
    let mut out = MergeOutput::default();
    let mut frontier: Vec<Sequence> = streams
        .into_iter()
        .map(|stream| Sequence { stream, head: None })
        .collect();
    for seq in frontier.iter_mut() {
        seq.head = next_series(seq, &mut out).await;
    }

    loop {
        let min = frontier
            .iter()
            .filter_map(|seq| seq.head.as_ref().map(|head| &head.labels))
            .min()
            .cloned();
        let Some(min) = min else {
            break;
        };

        let mut merged: Option<Series> = None;
        for seq in frontier.iter_mut() {
            let contributes = seq.head.as_ref().is_some_and(|head| head.labels == min);
            if !contributes {
                continue;
            }
            if let Some(series) = seq.head.take() {
                match merged.as_mut() {
                    None => merged = Some(series),
                    Some(merged) => merged.chunks.extend(series.chunks),
                }
            }
            seq.head = next_series(seq, &mut out).await;
        }
        // the minimum came from at least one head, so merged is always set
        if let Some(series) = merged {
            out.series.push(series);
        }
    }
    out
}

/// Pulls the next series from one sequence, sieving warnings into the
/// aggregate as they appear. A terminal error ends the sequence but keeps
/// everything it already produced; the fault itself is recorded both as a
/// warning and for the final all-failed decision.
async fn next_series(seq: &mut Sequence, out: &mut MergeOutput) -> Option<Series> {
    loop {
        match seq.stream.rx.recv().await {
            Some(Ok(SeriesResponse::Series(series))) => return Some(series),
            Some(Ok(SeriesResponse::Warning(warning))) => out.warnings.push(warning),
            Some(Err(err)) => {
                out.warnings.push(err.to_string());
                out.failures.push(err);
                return None;
            }
            None => return None,
        }
    }
}
