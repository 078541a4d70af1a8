//! Seed management for map generation
//!
//! Provides a separate seed for each generation stage, so a single stage can be
//! varied while the rest of the map stays the same.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generation stages, in pipeline order. The discriminant feeds sub-seed derivation,
/// so existing values must never change.
#[derive(Clone, Copy, Debug)]
enum Stage {
    Climate = 1,
    Continents = 2,
    Hydrography = 3,
    Biomes = 4,
    Rivers = 5,
    Placement = 6,
}

/// Seeds for all generation stages.
///
/// Each stage gets its own seed, derived from a master seed by default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Per-tile temperature and humidity jitter
    pub climate: u64,
    /// Continent seed placement and growth
    pub continents: u64,
    /// Edge noise and lake drying
    pub hydrography: u64,
    /// Elevation noise and terrain choice
    pub biomes: u64,
    /// River source selection
    pub rivers: u64,
    /// Ruins and bonus resources
    pub placement: u64,
}

impl MapSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            climate: derive_seed(master, Stage::Climate),
            continents: derive_seed(master, Stage::Continents),
            hydrography: derive_seed(master, Stage::Hydrography),
            biomes: derive_seed(master, Stage::Biomes),
            rivers: derive_seed(master, Stage::Rivers),
            placement: derive_seed(master, Stage::Placement),
        }
    }

    pub fn builder(master: u64) -> MapSeedsBuilder {
        MapSeedsBuilder::new(master)
    }
}

/// Builder for overriding individual stage seeds
pub struct MapSeedsBuilder {
    seeds: MapSeeds,
}

impl MapSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: MapSeeds::from_master(master),
        }
    }

    pub fn climate(mut self, seed: u64) -> Self {
        self.seeds.climate = seed;
        self
    }

    pub fn continents(mut self, seed: u64) -> Self {
        self.seeds.continents = seed;
        self
    }

    pub fn hydrography(mut self, seed: u64) -> Self {
        self.seeds.hydrography = seed;
        self
    }

    pub fn biomes(mut self, seed: u64) -> Self {
        self.seeds.biomes = seed;
        self
    }

    pub fn rivers(mut self, seed: u64) -> Self {
        self.seeds.rivers = seed;
        self
    }

    pub fn placement(mut self, seed: u64) -> Self {
        self.seeds.placement = seed;
        self
    }

    pub fn build(self) -> MapSeeds {
        self.seeds
    }
}

/// RNG for one stage
pub fn stage_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Derive a sub-seed from a master seed and a stage.
///
/// SplitMix64 over the master seed, stepped once per stage index. The mixer is
/// fixed, so sub-seeds are the same on every platform and toolchain.
fn derive_seed(master: u64, stage: Stage) -> u64 {
    splitmix64(master.wrapping_add((stage as u64).wrapping_mul(SPLITMIX_GAMMA)))
}

const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(SPLITMIX_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl std::fmt::Display for MapSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MapSeeds {{ master: {}, climate: {}, continents: {}, hydrography: {}, \
             biomes: {}, rivers: {}, placement: {} }}",
            self.master,
            self.climate,
            self.continents,
            self.hydrography,
            self.biomes,
            self.rivers,
            self.placement,
        )
    }
}
