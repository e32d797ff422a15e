use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skyline_common::{ConfigError, GridCoord};
use skyline_layout::{LayoutConfig, PlacementGrid, WeightSpec, sample};

fn arb_layout() -> impl Strategy<Value = LayoutConfig> {
    (
        0usize..8,
        0usize..10,
        0usize..4,
        0usize..4,
        0usize..3,
        1u32..6,
        1u32..5,
    )
        .prop_flat_map(|(bx, bz, nx, nz, gap, max_w, max_h)| {
            (
                prop::collection::vec(0.0f64..=1.0, max_w as usize),
                prop::collection::vec(1u32..4, max_h as usize),
            )
                .prop_map(move |(width_probs, height_weights)| LayoutConfig {
                    block_x: bx,
                    block_z: bz,
                    num_block_x: nx,
                    num_block_z: nz,
                    gap_width: gap,
                    max_width: max_w,
                    width_probs,
                    max_height: max_h,
                    height_weights,
                    build_grids: true,
                })
        })
}

proptest! {
    #[test]
    fn sample_returns_a_listed_option(
        weights in prop::collection::vec(0u32..5, 1..8),
        seed in any::<u64>(),
    ) {
        prop_assume!(weights.iter().any(|&w| w > 0));
        let options: Vec<usize> = (0..weights.len()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..20 {
            let picked = *sample(&options, &weights, &mut rng).unwrap();
            prop_assert!(picked < options.len());
            prop_assert!(weights[picked] > 0);
        }
    }

    #[test]
    fn mismatched_lengths_always_error(
        options in 0usize..12,
        weights in prop::collection::vec(0u32..5, 0..12),
    ) {
        prop_assume!(options != weights.len());
        let opts: Vec<usize> = (0..options).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let is_mismatch = matches!(
            sample(&opts, &weights, &mut rng),
            Err(ConfigError::LengthMismatch { .. })
        );
        prop_assert!(is_mismatch);
        let is_mismatch = matches!(
            WeightSpec::new(opts, weights),
            Err(ConfigError::LengthMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }

    // Debug builds also assert inside the packing loop that no placed
    // footprint is ever overwritten.
    #[test]
    fn build_stays_in_bounds(config in arb_layout(), seed in any::<u64>()) {
        let grid = PlacementGrid::build(&config, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let (tx, tz) = config.totals();
        prop_assert_eq!((grid.total_x(), grid.total_z()), (tx, tz));
        if tx > 0 {
            prop_assert_eq!(tx, config.block_x + (config.block_x + config.gap_width) * (config.num_block_x - 1));
            prop_assert_eq!(tz, config.block_z + (config.block_z + config.gap_width) * (config.num_block_z - 1));
        }
        prop_assert!(grid.cell(GridCoord::new(tx, 0)).is_none());
        prop_assert!(grid.cell(GridCoord::new(0, tz)).is_none());
        for z in 0..tz {
            for x in 0..tx {
                let fp = grid.footprint(GridCoord::new(x, z));
                prop_assert!(fp.width <= config.max_width);
                prop_assert_eq!(fp.width == 0, fp.height == 0);
            }
        }
    }

    #[test]
    fn build_is_reproducible(config in arb_layout(), seed in any::<u64>()) {
        let a = PlacementGrid::build(&config, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let b = PlacementGrid::build(&config, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
