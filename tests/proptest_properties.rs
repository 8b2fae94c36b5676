use std::collections::HashMap;

use pbfway::decoder::split_group;
use pbfway::{
    BlockEncoder, Grid, Info, RecordDecoder, StringTableBuilder, Way, WayDecoder, WayEncoder,
};
use proptest::prelude::*;

fn arb_info() -> impl Strategy<Value = Info> {
    (
        any::<i64>(),
        any::<i64>(),
        any::<i32>(),
        "[a-z0-9_]{0,12}",
        any::<i32>(),
        any::<bool>(),
    )
        .prop_map(
            |(changeset, timestamp, uid, username, version, visible)| Info {
                changeset,
                timestamp,
                uid,
                username,
                version,
                visible,
            },
        )
}

fn arb_tags() -> impl Strategy<Value = HashMap<String, String>> {
    proptest::collection::hash_map("[a-z:]{1,10}", "[a-zA-Z0-9 ]{0,16}", 0..6)
}

/// A way that satisfies the coordinate-cardinality invariant: either no
/// inline coordinates or one lat/lon pair per node.
fn arb_way() -> impl Strategy<Value = Way> {
    (
        any::<i64>(),
        arb_tags(),
        proptest::option::of(arb_info()),
        proptest::collection::vec(any::<i64>(), 0..24),
        any::<bool>(),
    )
        .prop_flat_map(|(id, tags, info, nodes, with_coords)| {
            let len = if with_coords { nodes.len() } else { 0 };
            (
                Just(id),
                Just(tags),
                Just(info),
                Just(nodes),
                proptest::collection::vec(-90.0f64..90.0, len),
                proptest::collection::vec(-180.0f64..180.0, len),
            )
        })
        .prop_map(|(id, tags, info, nodes, lat, lon)| Way {
            id,
            tags,
            info,
            nodes,
            lat,
            lon,
        })
}

fn roundtrip(ways: &[Way], grid: Grid) -> Vec<Way> {
    let mut strings = StringTableBuilder::new();
    let mut encoder = WayEncoder::new(&mut strings, grid);
    for way in ways {
        encoder.add(way).unwrap();
    }
    let group = encoder.finalize().unwrap();
    let table = strings.freeze();
    let decoder = WayDecoder::new(&table, grid);
    split_group(&group)
        .unwrap()
        .into_iter()
        .map(|record| decoder.parse(record).unwrap())
        .collect()
}

proptest! {
    #[test]
    fn prop_roundtrip_preserves_ways(ways in proptest::collection::vec(arb_way(), 0..8)) {
        let grid = Grid::default();
        let decoded = roundtrip(&ways, grid);
        prop_assert_eq!(decoded.len(), ways.len());
        for (out, orig) in decoded.iter().zip(&ways) {
            prop_assert_eq!(out.id, orig.id);
            prop_assert_eq!(&out.tags, &orig.tags);
            prop_assert_eq!(&out.info, &orig.info);
            prop_assert_eq!(&out.nodes, &orig.nodes);
            prop_assert_eq!(out.lat.len(), orig.lat.len());
            prop_assert_eq!(out.lon.len(), orig.lon.len());
            for i in 0..orig.lat.len() {
                prop_assert!((out.lat[i] - orig.lat[i]).abs() <= grid.tolerance());
                prop_assert!((out.lon[i] - orig.lon[i]).abs() <= grid.tolerance());
            }
        }
    }

    #[test]
    fn prop_roundtrip_holds_for_any_grid(
        way in arb_way(),
        granularity in 1i32..100_000,
        lat_offset in -1_000_000_000i64..1_000_000_000,
        lon_offset in -1_000_000_000i64..1_000_000_000,
    ) {
        let grid = Grid::new(granularity, lat_offset, lon_offset);
        let decoded = &roundtrip(std::slice::from_ref(&way), grid)[0];
        prop_assert_eq!(&decoded.nodes, &way.nodes);
        for i in 0..way.lat.len() {
            prop_assert!((decoded.lat[i] - way.lat[i]).abs() <= grid.tolerance());
            prop_assert!((decoded.lon[i] - way.lon[i]).abs() <= grid.tolerance());
        }
    }

    #[test]
    fn prop_estimate_is_monotonic(ways in proptest::collection::vec(arb_way(), 0..12)) {
        let mut strings = StringTableBuilder::new();
        let mut encoder = WayEncoder::new(&mut strings, Grid::default());
        let mut last = encoder.estimate_size();
        prop_assert_eq!(last, 0);
        for way in &ways {
            encoder.add(way).unwrap();
            let now = encoder.estimate_size();
            prop_assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn prop_decoder_never_panics_on_garbage(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let table = StringTableBuilder::new().freeze();
        let decoder = WayDecoder::new(&table, Grid::default());
        // Result content is irrelevant; decoding must stay panic-free.
        let _ = decoder.parse(&bytes);
    }
}
