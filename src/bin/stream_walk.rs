//! Streaming walk: moves an observer through a generated world and reports
//! what the chunk streamer does along the way.
//!
//! Usage: cargo run --release --bin stream_walk -- [CONFIG.json] [OPTIONS]
//!
//! Options:
//!   --seed <SEED>     World seed (default: from config, or random without one)
//!   --steps <N>       Number of walk steps (default: 200)
//!   --speed <UNITS>   Distance covered per step (default: 4.0)

use std::time::Instant;

use glam::Vec3;

use strata::config::WorldConfig;
use strata::streaming::{ChunkDraw, ChunkRenderer, ChunkStreamer, Observer};

/// Renderer that only counts what it would draw
#[derive(Default)]
struct CountingRenderer {
    chunks: usize,
    vertices: usize,
}

impl ChunkRenderer for CountingRenderer {
    fn draw(&mut self, draw: ChunkDraw<'_>) {
        self.chunks += 1;
        self.vertices += draw.vertex_count;
    }
}

fn main() {
    strata::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).filter(|a| !a.starts_with("--"));

    let mut config = match config_path {
        Some(path) => match WorldConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => WorldConfig::with_random_seed(),
    };
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.seed = seed;
    }
    let steps = parse_usize_arg(&args, "--steps").unwrap_or(200);
    let speed = parse_f32_arg(&args, "--speed").unwrap_or(4.0);

    println!("=== Strata Streaming Walk ===");
    println!("Seed:  {}", config.seed);
    println!("Chunk: {}", config.chunk);
    println!("View:  far {}, fov {} deg", config.streaming.far, config.streaming.horizontal_fov);
    println!("Steps: {} x {} units", steps, speed);
    println!();

    let mut streamer = match ChunkStreamer::new(&config) {
        Ok(streamer) => streamer,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let mut position = Vec3::new(0.0, config.chunk.height as f32, 0.0);
    let mut renderer = CountingRenderer::default();
    let mut frames = 0usize;

    for step in 0..steps {
        // Slow left turn with a wobble so the heading keeps crossing snapshot bins
        let yaw = step as f32 * 0.02 + (step as f32 * 0.1).sin() * 0.3;
        let observer = Observer::new(position, yaw);
        streamer.update(&observer);
        position += observer.forward() * speed;

        renderer = CountingRenderer::default();
        streamer.render_active(&mut renderer);
        frames += 1;

        if step % 50 == 0 {
            log::info!(
                "Step {}: position ({:.0}, {:.0}), {} chunks drawn, {} vertices",
                step,
                position.x,
                position.z,
                renderer.chunks,
                renderer.vertices
            );
        }
    }

    let elapsed = start.elapsed();
    let stats = streamer.stats();
    println!();
    println!("=== Done ===");
    println!("Frames:      {}", frames);
    println!("Recomputes:  {}", stats.recomputes);
    println!("Generated:   {}", stats.generated);
    println!("Reused:      {}", stats.reused);
    println!("Deactivated: {}", stats.deactivated);
    println!("Evicted:     {}", stats.evicted);
    println!("Failed:      {}", stats.failed);
    println!("Cached:      {}", streamer.cached_len());
    println!("Last frame:  {} chunks, {} vertices", renderer.chunks, renderer.vertices);
    println!("Time:        {:.2}s", elapsed.as_secs_f64());
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}
