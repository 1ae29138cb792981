//! Quadtree simulation driver.
//!
//! Rebuilds a tree from a fresh batch of random particles every round, runs
//! collision detection on it and optionally checks the result against the
//! brute-force pair search.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::bail;
use glam::DVec2;
use quadtree::collision::pair_set;
use quadtree::config::SPAWN_EDGE_GAP;
use quadtree::{brute_force, Config, Particle, ParticleId, QuadTreeNode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Per-round results.
#[derive(Debug, Default)]
struct RoundStats {
    inserted: usize,
    rejected: usize,
    nodes: usize,
    depth: usize,
    collisions: usize,
    tree_time: Duration,
    brute_time: Option<Duration>,
}

/// Uniform coordinate in `lo..hi`, or the midpoint when the range is empty.
fn coordinate(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if lo < hi { rng.random_range(lo..hi) } else { (lo + hi) / 2.0 }
}

/// Spawn `config.scenario.particles` disks strictly inside the region.
///
/// Disks too large to fit with the edge gap are centered in the region
/// instead; [`Config::validate`] rules those out for loaded configs.
fn spawn_particles(rng: &mut StdRng, config: &Config) -> Vec<Particle> {
    let scenario = &config.scenario;
    let bounds = config.region.bounds();
    let (min, max) = (bounds.min(), bounds.max());

    (0..scenario.particles)
        .map(|_| {
            let r = if scenario.min_radius < scenario.max_radius {
                rng.random_range(scenario.min_radius..scenario.max_radius)
            } else {
                scenario.min_radius
            };
            let pad = r + SPAWN_EDGE_GAP;
            let x = coordinate(rng, min.x + pad, max.x - pad);
            let y = coordinate(rng, min.y + pad, max.y - pad);
            Particle::new(ParticleId::from_rng(rng), DVec2::new(x, y), r)
        })
        .collect()
}

/// Build a tree over `particles`, detect collisions and optionally verify.
fn run_round(config: &Config, particles: &[Particle]) -> anyhow::Result<RoundStats> {
    let started = Instant::now();
    let mut root = QuadTreeNode::from_config(&config.tree, &config.region);
    let mut accepted = Vec::with_capacity(particles.len());
    let mut stats = RoundStats::default();

    for particle in particles {
        match root.try_insert(*particle) {
            Ok(()) => accepted.push(*particle),
            Err(e) => {
                debug!("Particle {} not inserted: {}", particle.id, e);
                stats.rejected += 1;
            }
        }
    }
    let events = root.collisions_all();
    stats.tree_time = started.elapsed();

    stats.inserted = accepted.len();
    stats.nodes = root.node_count();
    stats.depth = root.depth();
    stats.collisions = events.len();

    if config.scenario.verify {
        let started = Instant::now();
        let expected = brute_force(&accepted);
        stats.brute_time = Some(started.elapsed());

        if events.len() != expected.len() || pair_set(&events) != pair_set(&expected) {
            bail!(
                "tree found {} collisions, brute force found {}",
                events.len(),
                expected.len()
            );
        }
    }

    Ok(stats)
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Quadtree simulation v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load_from(&PathBuf::from(path))?,
        None => Config::load()?,
    };
    info!("Loaded configuration");
    info!(
        "  Region: center ({}, {}), half-width {}",
        config.region.center_x, config.region.center_y, config.region.half_width
    );
    info!(
        "  Tree: min_width {}, max_objects {}, overflow {:?}",
        config.tree.min_width, config.tree.max_objects, config.tree.overflow
    );
    info!(
        "  Scenario: {} particles x {} rounds, radius {}..{}",
        config.scenario.particles,
        config.scenario.rounds,
        config.scenario.min_radius,
        config.scenario.max_radius
    );

    let seed = config.scenario.seed.unwrap_or_else(|| rand::rng().random());
    info!("  Seed: {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut total_collisions = 0;
    let mut tree_time = Duration::ZERO;
    for round in 0..config.scenario.rounds {
        let particles = spawn_particles(&mut rng, &config);
        let stats = run_round(&config, &particles)?;

        if stats.rejected > 0 {
            warn!("Round {}: {} particles rejected", round, stats.rejected);
        }
        info!(
            "Round {}: {} particles, {} nodes, depth {}, {} collisions in {:?}{}",
            round,
            stats.inserted,
            stats.nodes,
            stats.depth,
            stats.collisions,
            stats.tree_time,
            stats
                .brute_time
                .map(|t| format!(" (brute force {t:?})"))
                .unwrap_or_default()
        );
        total_collisions += stats.collisions;
        tree_time += stats.tree_time;
    }

    info!(
        "Done: {} collisions over {} rounds, tree time {:?}",
        total_collisions, config.scenario.rounds, tree_time
    );

    Ok(())
}
