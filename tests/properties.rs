use std::collections::HashSet;
use std::time::Duration;

use places_sweep::grid::{GridWalker, dedup_places};
use places_sweep::model::{LatLng, Place};
use places_sweep::places::AreaSearcher;
use proptest::prelude::*;

mod util;
use util::{ScriptedSource, page};

/// Places drawn from a tiny domain so duplicates are common.
fn arb_place() -> impl Strategy<Value = Place> {
    (0u8..4, 0u8..3, 0u8..3).prop_map(|(n, lat, lng)| {
        Place::new(format!("P{n}"), f64::from(lat) * 0.5, f64::from(lng) * 0.5)
    })
}

fn distinct(places: &[Place]) -> usize {
    places.iter().map(|p| p.key()).collect::<HashSet<_>>().len()
}

proptest! {
    #[test]
    fn sweep_never_exceeds_cap(
        cells_per_axis in 0u32..5,
        cap in 0usize..25,
        cells in prop::collection::vec(prop::collection::vec(arb_place(), 0..8), 0..25),
    ) {
        let source = ScriptedSource::new(cells.into_iter().map(|ps| page(ps, None)).collect());
        let walker = GridWalker::new(AreaSearcher::new(&source, Duration::ZERO), 2500);
        let found = walker.sweep(LatLng::new(0.0, 0.0), 0.015, cells_per_axis, cap).unwrap();

        prop_assert!(found.len() <= cap);
        prop_assert_eq!(distinct(&found), found.len());
        prop_assert!(source.call_count() <= (cells_per_axis * cells_per_axis) as usize);
    }

    #[test]
    fn dedup_is_idempotent(places in prop::collection::vec(arb_place(), 0..40)) {
        let mut places = places;
        dedup_places(&mut places);
        let once = places.clone();
        dedup_places(&mut places);
        prop_assert_eq!(once, places);
    }

    #[test]
    fn dedup_keeps_each_tuple_exactly_once_in_first_seen_order(
        places in prop::collection::vec(arb_place(), 0..40),
    ) {
        let mut deduped = places.clone();
        dedup_places(&mut deduped);

        let mut expected: Vec<Place> = Vec::new();
        for p in &places {
            if !expected.contains(p) {
                expected.push(p.clone());
            }
        }
        prop_assert_eq!(deduped, expected);
    }
}
