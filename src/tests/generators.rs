use rand::prelude::*;

use crate::common::labels::{Label, Labels};
use crate::common::types::Timestamp;
use crate::store::{Chunk, Series};

pub(crate) fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Generates `count` series with distinct label sets already in canonical
/// order, each carrying `chunks_per_series` consecutive chunks of random
/// payload. The zero-padded series label keeps lexicographic and numeric
/// order aligned.
pub(crate) fn generate_sorted_series(
    rng: &mut StdRng,
    count: usize,
    chunks_per_series: usize,
) -> Vec<Series> {
    (0..count)
        .map(|i| {
            let labels = Labels::new(vec![
                Label::new("__name__", "http_request_duration_seconds"),
                Label::new("series", format!("{i:06}")),
            ]);
            Series::new(labels, generate_chunks(rng, 0, chunks_per_series))
        })
        .collect()
}

/// Generates `count` adjacent chunks starting at `start`, 100ms wide each.
pub(crate) fn generate_chunks(rng: &mut StdRng, start: Timestamp, count: usize) -> Vec<Chunk> {
    (0..count)
        .map(|i| {
            let min_time = start + (i as i64) * 100;
            let payload: [u8; 16] = rng.gen();
            Chunk::new(min_time, min_time + 99, payload.to_vec())
        })
        .collect()
}
