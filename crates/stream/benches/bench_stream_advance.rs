use std::hint::black_box;
use std::time::Instant;

use skyline_assets::FactoryRegistry;
use skyline_layout::LayoutConfig;
use skyline_stream::{StreamConfig, StreamPhase, StreamingWorld};

fn world(factory: &str, num_blocks: usize, cells_per_advance: usize) -> StreamingWorld {
    let registry = FactoryRegistry::with_builtins().unwrap();
    let layout = LayoutConfig {
        num_block_x: num_blocks,
        num_block_z: num_blocks,
        gap_width: 2,
        ..LayoutConfig::default()
    };
    let stream = StreamConfig {
        factory: factory.into(),
        cells_per_advance,
        stop_follow: -1.0e6,
        unload_offset: -1.0e7,
        ..StreamConfig::default()
    };
    StreamingWorld::build(stream, layout, &registry, 7).unwrap()
}

fn bench_load(factory: &str, num_blocks: usize, cells_per_advance: usize) {
    let mut w = world(factory, num_blocks, cells_per_advance);
    let (tx, tz) = (w.grid().total_x(), w.grid().total_z());

    let start = Instant::now();
    let mut advances = 0u32;
    while w.phase() == StreamPhase::Loading {
        let _ = black_box(w.advance(black_box(-1.0e5)));
        advances += 1;
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / advances.max(1);
    println!(
        "  load {factory} ({tx}x{tz} cells, budget {cells_per_advance}, {advances} advances): {per_iter:?}/advance, total {elapsed:?}"
    );
}

fn bench_follow(num_blocks: usize, iterations: usize) {
    let mut w = world("footprint", num_blocks, usize::MAX);
    w.advance(-1.0e5);

    let start = Instant::now();
    for i in 0..iterations {
        let _ = black_box(w.advance(black_box(-(i as f32))));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  follow ({} rows, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        w.rows().len()
    );
}

fn main() {
    println!("=== Stream Advance Benchmarks ===\n");

    println!("Incremental load:");
    bench_load("color_city", 1, 1);
    bench_load("color_city", 4, 8);
    bench_load("moving_city", 4, 8);
    bench_load("footprint", 16, 64);

    println!("\nRow recycling:");
    bench_follow(4, 10_000);
    bench_follow(16, 10_000);

    println!("\n=== Done ===");
}
