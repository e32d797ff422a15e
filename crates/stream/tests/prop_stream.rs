use proptest::prelude::*;
use skyline_assets::FactoryRegistry;
use skyline_common::TravelDirection;
use skyline_layout::LayoutConfig;
use skyline_stream::{StreamConfig, StreamEvent, StreamPhase, StreamingWorld};

fn world(
    block_x: usize,
    block_z: usize,
    gap: usize,
    blocks: usize,
    direction: TravelDirection,
    seed: u64,
) -> StreamingWorld {
    let registry = FactoryRegistry::with_builtins().unwrap();
    let layout = LayoutConfig {
        block_x,
        block_z,
        num_block_x: blocks,
        num_block_z: blocks,
        gap_width: gap,
        ..LayoutConfig::default()
    };
    let stream = StreamConfig {
        factory: "footprint".into(),
        direction,
        stop_follow: direction.sign() * 1.0e6,
        unload_offset: direction.sign() * 1.0e7,
        ..StreamConfig::default()
    };
    StreamingWorld::build(stream, layout, &registry, seed).unwrap()
}

fn arb_direction() -> impl Strategy<Value = TravelDirection> {
    prop_oneof![Just(TravelDirection::NegativeZ), Just(TravelDirection::PositiveZ)]
}

proptest! {
    #[test]
    fn loading_finishes_within_grid_area(
        bx in 1usize..7,
        bz in 1usize..9,
        gap in 0usize..3,
        blocks in 1usize..3,
        direction in arb_direction(),
        seed in any::<u64>(),
    ) {
        let mut w = world(bx, bz, gap, blocks, direction, seed);
        let (tx, tz) = (w.grid().total_x(), w.grid().total_z());
        let tracked = w.thresholds().load_bar + direction.sign();

        let mut completions = 0;
        let mut advances = 0;
        while w.phase() == StreamPhase::Loading {
            advances += 1;
            prop_assert!(advances <= tx * tz);
            for e in w.advance(tracked) {
                if matches!(e, StreamEvent::LoadingComplete { .. }) {
                    completions += 1;
                }
            }
        }
        prop_assert_eq!(completions, 1);
        prop_assert_eq!(w.phase(), StreamPhase::Following);
        prop_assert_eq!(w.rows().len(), tz);
        prop_assert!(w.is_visible());
    }

    #[test]
    fn recycling_is_round_robin(
        bx in 1usize..5,
        bz in 1usize..9,
        direction in arb_direction(),
        steps in 1usize..40,
    ) {
        let mut w = world(bx, bz, 0, 1, direction, 3);
        let tracked = w.thresholds().load_bar + direction.sign();
        while w.phase() == StreamPhase::Loading {
            w.advance(tracked);
        }
        let rows = w.rows().len();
        let far = direction.sign() * 1.0e5;
        let mut order = Vec::new();
        for _ in 0..steps {
            for e in w.advance(far) {
                if let StreamEvent::RowRepositioned { row, .. } = e {
                    order.push(row);
                }
            }
        }
        prop_assert_eq!(order.len(), steps);
        for (i, row) in order.iter().enumerate() {
            prop_assert_eq!(*row, i % rows);
        }
    }

    #[test]
    fn unload_retires_from_any_point(
        bx in 1usize..5,
        bz in 1usize..6,
        before in 0usize..40,
        direction in arb_direction(),
    ) {
        let mut w = world(bx, bz, 0, 1, direction, 11);
        let tracked = w.thresholds().load_bar + direction.sign();
        for _ in 0..before {
            w.advance(tracked);
        }
        let loaded = w.stats().total_cells_loaded;
        let past = w.thresholds().unload_at + direction.sign();

        prop_assert_eq!(w.advance(past), vec![StreamEvent::Hidden]);
        prop_assert_eq!(w.phase(), StreamPhase::Unloading);
        prop_assert!(!w.is_visible());
        let retired = w.advance(tracked);
        let is_retired = matches!(retired.as_slice(), [StreamEvent::Retired { .. }]);
        prop_assert!(is_retired);
        for _ in 0..5 {
            prop_assert!(w.advance(tracked).is_empty());
        }
        prop_assert_eq!(w.stats().total_cells_loaded, loaded);
        prop_assert!(w.rows().is_empty());
    }
}
