use std::sync::Arc;

use tracing::debug;

use crate::common::matchers::{matches_label_sets, Matcher};
use crate::common::types::TimeRange;
use crate::store::{SeriesRequest, StoreClient};

/// Returns the subset of stores that could hold data for the request,
/// preserving provider order. Pruning is advisory: a selected store may
/// still return nothing, which is not an error.
pub(crate) fn select_stores(
    stores: Vec<Arc<dyn StoreClient>>,
    request: &SeriesRequest,
) -> Vec<Arc<dyn StoreClient>> {
    let range = request.range();
    stores
        .into_iter()
        .filter(|store| {
            let keep = store_matches(store.as_ref(), &range, &request.matchers);
            if !keep {
                debug!(store = store.name(), "store pruned from fan-out");
            }
            keep
        })
        .collect()
}

fn store_matches(store: &dyn StoreClient, range: &TimeRange, matchers: &[Matcher]) -> bool {
    if !store.time_range().overlaps(range) {
        return false;
    }
    matches_label_sets(matchers, &store.label_sets())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::labels::Labels;
    use crate::common::matchers::Matcher;
    use crate::tests::mock::MockStore;

    fn select_names(stores: Vec<Arc<dyn StoreClient>>, request: &SeriesRequest) -> Vec<String> {
        select_stores(stores, request)
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    #[test]
    fn test_range_pruning() {
        let stores: Vec<Arc<dyn StoreClient>> = vec![
            Arc::new(MockStore::new("old").with_range(TimeRange::new(0, 100))),
            Arc::new(MockStore::new("recent").with_range(TimeRange::new(200, 300))),
            Arc::new(MockStore::new("unbounded")),
        ];
        let request = SeriesRequest::new(150, 250, vec![]);
        assert_eq!(select_names(stores, &request), vec!["recent", "unbounded"]);
    }

    #[test]
    fn test_label_set_hint_pruning() {
        let eu = Labels::from_strings(&["region", "eu"]);
        let us = Labels::from_strings(&["region", "us"]);
        let stores: Vec<Arc<dyn StoreClient>> = vec![
            Arc::new(MockStore::new("eu").with_label_sets(vec![eu])),
            Arc::new(MockStore::new("us").with_label_sets(vec![us])),
            Arc::new(MockStore::new("unknown")),
        ];
        let request =
            SeriesRequest::new(0, 100, vec![Matcher::equal("region", "eu")]);
        // hint pruning drops "us"; "unknown" declares nothing and stays in
        assert_eq!(select_names(stores, &request), vec!["eu", "unknown"]);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let build = || -> Vec<Arc<dyn StoreClient>> {
            vec![
                Arc::new(MockStore::new("a")),
                Arc::new(MockStore::new("b")),
                Arc::new(MockStore::new("c")),
            ]
        };
        let request = SeriesRequest::new(0, 100, vec![]);
        assert_eq!(select_names(build(), &request), select_names(build(), &request));
        assert_eq!(select_names(build(), &request), vec!["a", "b", "c"]);
    }
}
