//! Random site sets in 2D (jittered grid + replay tokens).
//!
//! Purpose
//! - Provide a small, deterministic sampler for point sets used by the
//!   Voronoi driver, benchmarks, and property tests.
//!
//! Model
//! - Start from a `k × k` grid over the requested bounds, jitter each point
//!   inside its cell, then keep the first `n` after a seeded shuffle. Grid
//!   cells keep sites apart by at least `(1 - 2·jitter)` times the cell size,
//!   which avoids near-duplicate sites.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Site sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct SiteCfg {
    pub count: usize,
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
    /// Jitter as a fraction of the cell size. Clamped to [0, 0.45].
    pub jitter: f64,
}

impl Default for SiteCfg {
    fn default() -> Self {
        Self {
            count: 16,
            min: Vector2::new(-1.0, -1.0),
            max: Vector2::new(1.0, 1.0),
            jitter: 0.3,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw `cfg.count` well-separated sites strictly inside `[min, max]`.
///
/// Returns `None` for an empty or inverted box.
pub fn draw_sites(cfg: SiteCfg, tok: ReplayToken) -> Option<Vec<Vector2<f64>>> {
    let span = cfg.max - cfg.min;
    if !(span.x > 0.0 && span.y > 0.0) {
        return None;
    }
    let mut rng = tok.to_std_rng();
    let k = (cfg.count as f64).sqrt().ceil().max(1.0) as usize;
    let cell = Vector2::new(span.x / k as f64, span.y / k as f64);
    let jitter = cfg.jitter.clamp(0.0, 0.45);
    let mut pts: Vec<Vector2<f64>> = Vec::with_capacity(k * k);
    for i in 0..k {
        for j in 0..k {
            let u = 0.5 + (rng.gen::<f64>() * 2.0 - 1.0) * jitter;
            let v = 0.5 + (rng.gen::<f64>() * 2.0 - 1.0) * jitter;
            pts.push(Vector2::new(
                cfg.min.x + (i as f64 + u) * cell.x,
                cfg.min.y + (j as f64 + v) * cell.y,
            ));
        }
    }
    pts.shuffle(&mut rng);
    pts.truncate(cfg.count);
    Some(pts)
}
