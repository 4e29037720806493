//! Tile generation
//!
//! The grid asks a [`TileGenerator`] for new tiles during board setup and refill.
//!
//! - [`WeightedGenerator`] draws copies of seed tiles by weight. Absolute weights are turned
//!   into a cumulative table over `[0, 1)` whenever a seed is added; the last entry is pinned
//!   to 1.0 so rounding never leaves a gap at the top.
//! - [`ScriptedGenerator`] hands out a fixed sequence, for reproducible setups.
//!
//! Also provides a simple LCG so weighted draws are deterministic per seed.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::GridError;
use crate::tile::Tile;

/// Source of new tiles
pub trait TileGenerator {
    /// Next tile; must be non-empty with a full capability set
    fn next_tile(&mut self) -> Result<Tile, GridError>;
}

impl<G: TileGenerator + ?Sized> TileGenerator for Box<G> {
    fn next_tile(&mut self) -> Result<Tile, GridError> {
        (**self).next_tile()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Uniform value in [0, 1) built from the high 24 bits
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

#[derive(Debug, Clone)]
struct Seed {
    tile: Tile,
    weight: f32,
    /// Upper bound of this seed's slice of [0, 1]
    cumulative: f32,
}

/// Weighted draw over seed tiles
#[derive(Debug, Clone)]
pub struct WeightedGenerator {
    seeds: Vec<Seed>,
    rng: SimpleRng,
}

impl WeightedGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            seeds: Vec::new(),
            rng: SimpleRng::new(seed),
        }
    }

    /// Standard tiles of kinds `1..=kinds`, equally weighted
    pub fn uniform(kinds: u32, seed: u32) -> Result<Self, GridError> {
        let mut generator = Self::new(seed);
        for kind in 1..=kinds {
            generator.add_seed(Tile::normal(kind), 1.0)?;
        }
        Ok(generator)
    }

    /// Add a seed tile with an absolute weight
    pub fn add_seed(&mut self, tile: Tile, weight: f32) -> Result<(), GridError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(GridError::InvalidWeight(weight));
        }
        tile.validate()?;
        self.seeds.push(Seed {
            tile,
            weight,
            cumulative: 0.0,
        });
        self.update_cumulative();
        Ok(())
    }

    fn update_cumulative(&mut self) {
        let sum: f32 = self.seeds.iter().map(|s| s.weight).sum();
        let last = self.seeds.len() - 1;
        let mut acc = 0.0;
        for (i, seed) in self.seeds.iter_mut().enumerate() {
            acc += seed.weight / sum;
            seed.cumulative = if i == last { 1.0 } else { acc };
        }
        debug!(
            table = ?self.seeds.iter().map(|s| s.cumulative).collect::<Vec<_>>(),
            "seed weights updated"
        );
    }

    /// Cumulative weight table, one entry per seed
    pub fn cumulative_weights(&self) -> Vec<f32> {
        self.seeds.iter().map(|s| s.cumulative).collect()
    }

    /// Seed tile selected by a sample in [0, 1)
    pub fn pick(&self, sample: f32) -> Result<Tile, GridError> {
        let Some(top) = self.seeds.last() else {
            return Err(GridError::NoSeeds);
        };
        self.seeds
            .iter()
            .find(|s| sample <= s.cumulative)
            .map(|s| s.tile.clone())
            .ok_or(GridError::WeightGap {
                sample,
                max: top.cumulative,
            })
    }
}

impl TileGenerator for WeightedGenerator {
    fn next_tile(&mut self) -> Result<Tile, GridError> {
        if self.seeds.is_empty() {
            return Err(GridError::NoSeeds);
        }
        let sample = self.rng.next_f32();
        self.pick(sample)
    }
}

/// Fixed sequence of tiles
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    queue: VecDeque<Tile>,
    cycle: bool,
}

impl ScriptedGenerator {
    /// Yields each tile once, then fails with `GeneratorExhausted`
    pub fn new<I: IntoIterator<Item = Tile>>(tiles: I) -> Self {
        Self {
            queue: tiles.into_iter().collect(),
            cycle: false,
        }
    }

    /// Yields the tiles round-robin forever
    pub fn cycle<I: IntoIterator<Item = Tile>>(tiles: I) -> Self {
        Self {
            queue: tiles.into_iter().collect(),
            cycle: true,
        }
    }

    /// Standard tiles of the given kinds, once each
    pub fn kinds(kinds: &[u32]) -> Self {
        Self::new(kinds.iter().map(|&k| Tile::normal(k)))
    }
}

impl TileGenerator for ScriptedGenerator {
    fn next_tile(&mut self) -> Result<Tile, GridError> {
        let tile = self.queue.pop_front().ok_or(GridError::GeneratorExhausted)?;
        if self.cycle {
            self.queue.push_back(tile.clone());
        }
        Ok(tile)
    }
}
