//! Property tests for the page contract on the in-memory store: pages are
//! disjoint slices of one id-ordered result, and the total never depends
//! on `limit` or `skip`.

use backend::domain::{PageRequest, PlayerFilter};
use proptest::prelude::*;

use crate::support::backends::Harness;
use crate::support::fixtures::create_players;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pages_tile_the_full_result(n in 0usize..25, limit in 1i64..=10) {
        let rt = runtime();
        let (expected, pages, totals) = rt.block_on(async {
            let h = Harness::memory().await.expect("harness");
            let ids = create_players(&h, n).await.expect("players");

            let mut pages = Vec::new();
            let mut totals = Vec::new();
            let mut skip = 0;
            loop {
                let page = h
                    .stores
                    .players
                    .search(&PlayerFilter::default(), PageRequest::new(limit, skip).unwrap())
                    .await
                    .expect("search");
                totals.push(page.total_count);
                if page.items.is_empty() {
                    break;
                }
                pages.push(page.items.into_iter().map(|p| p.id).collect::<Vec<_>>());
                skip += limit;
            }
            (ids, pages, totals)
        });

        prop_assert!(totals.iter().all(|t| *t == n as u64));
        prop_assert!(pages.iter().all(|p| p.len() as i64 <= limit));
        let flattened: Vec<i64> = pages.into_iter().flatten().collect();
        prop_assert_eq!(flattened, expected);
    }

    #[test]
    fn name_filter_total_matches_unpaged_count(
        names in proptest::collection::vec("[a-c]{1,4}", 0..15),
        needle in "[a-c]{1,2}",
        limit in 1i64..=5,
        skip in 0i64..20,
    ) {
        let rt = runtime();
        let (unpaged, paged) = rt.block_on(async {
            let h = Harness::memory().await.expect("harness");
            for name in &names {
                crate::support::fixtures::create_player(&h, name).await.expect("player");
            }
            let filter = PlayerFilter { name: Some(needle.clone()) };
            let unpaged = h
                .stores
                .players
                .search(&filter, PageRequest::new(100, 0).unwrap())
                .await
                .expect("search");
            let paged = h
                .stores
                .players
                .search(&filter, PageRequest::new(limit, skip).unwrap())
                .await
                .expect("search");
            (unpaged, paged)
        });

        let expected = names.iter().filter(|n| n.contains(needle.as_str())).count();
        prop_assert_eq!(unpaged.total_count, expected as u64);
        prop_assert_eq!(paged.total_count, unpaged.total_count);
        let window: Vec<i64> = unpaged
            .items
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .map(|p| p.id)
            .collect();
        prop_assert_eq!(paged.items.iter().map(|p| p.id).collect::<Vec<_>>(), window);
    }
}
