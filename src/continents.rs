//! Continent growth engine
//!
//! Carves land out of an all-ocean grid with a seeded, energy-limited random walk.
//! Each continent seed carries growth energy that decays geometrically with every
//! step, so growth thins out unevenly and coastlines come out ragged rather than round.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::grid::Grid;
use crate::params::MapParameters;
use crate::terrain::TerrainType;

/// Terrain given to freshly grown land until the biome pass assigns the real type.
pub const PLACEHOLDER_LAND: TerrainType = TerrainType::Plains;

/// Attempts to find a free tile for each continent seed before giving up on it.
const SEED_PLACEMENT_ATTEMPTS: usize = 64;

/// Steps without claiming a tile, per map tile, before the frontier is checked for
/// any water it can still reach.
const STALL_STEPS_PER_TILE: usize = 4;

/// Frontier record: a tile a continent can still grow from, and its remaining energy.
#[derive(Clone, Copy, Debug)]
struct GrowthSeed {
    tile: usize,
    continent: u32,
    energy: f64,
}

/// Summary of one growth run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrowthStats {
    /// Continent seeds actually planted
    pub seeds: usize,
    /// Frontier records consumed
    pub steps: usize,
    /// Growth ended because no frontier record could reach open water
    pub exhausted: bool,
    /// Land tiles after growth, before the island pass
    pub grown_land: usize,
    /// Single-tile islands that were widened
    pub islands_grown: usize,
    /// Single-tile islands that were sunk
    pub islands_sunk: usize,
}

/// Columns continent seeds and growth may use: [min, max).
pub fn growth_columns(width: usize, min_edge: f64) -> (usize, usize) {
    let margin = (width as f64 * min_edge).round() as usize;
    if margin * 2 >= width {
        (0, width)
    } else {
        (margin, width - margin)
    }
}

/// Reset the grid to ocean and grow continents on it.
pub fn grow_continents(grid: &mut Grid, params: &MapParameters, rng: &mut ChaCha8Rng) -> GrowthStats {
    for tile in grid.tiles_mut() {
        tile.terrain = TerrainType::Ocean;
        tile.continent = 0;
    }

    let (min_x, max_x) = growth_columns(grid.width, params.min_edge);
    let in_columns = move |x: usize| x >= min_x && x < max_x;
    // Growth never leaves the band, so the band caps the budget
    let band_tiles = (max_x - min_x) * grid.height;
    let land_budget = ((grid.len() as f64 * params.max_land) as usize).clamp(1, band_tiles);
    let retention = 1.0 - params.landmass_decay;

    let mut stats = GrowthStats::default();
    let mut land = 0usize;
    let mut frontier: Vec<GrowthSeed> = Vec::new();

    // Plant seeds, one continent id each
    for continent in 1..=params.seed_count() as u32 {
        if land >= land_budget {
            break;
        }
        let mut planted = None;
        for _ in 0..SEED_PLACEMENT_ATTEMPTS {
            let x = rng.gen_range(min_x..max_x);
            let y = rng.gen_range(0..grid.height);
            let index = grid.index(x, y);
            if grid.tile(index).is_water() {
                planted = Some(index);
                break;
            }
        }
        let Some(tile) = planted else {
            continue;
        };

        let seed_tile = grid.tile_mut(tile);
        seed_tile.terrain = PLACEHOLDER_LAND;
        seed_tile.continent = continent;
        land += 1;
        stats.seeds += 1;

        frontier.push(GrowthSeed {
            tile,
            continent,
            energy: rng.gen_range(0.0..params.max_energy),
        });
    }

    // Consume the frontier in random order until it dries up or the map is full
    let mut eligible = Vec::with_capacity(8);
    let stall_limit = grid.len() * STALL_STEPS_PER_TILE;
    let mut stalled = 0usize;
    while !frontier.is_empty() && land < land_budget {
        let pick = rng.gen_range(0..frontier.len());
        let seed = frontier.swap_remove(pick);
        stats.steps += 1;
        stalled += 1;
        if stalled >= stall_limit {
            if !frontier_reaches_water(grid, &frontier, &seed, in_columns) {
                stats.exhausted = true;
                break;
            }
            stalled = 0;
        }

        eligible.clear();
        eligible.extend(grid.neighbors(seed.tile).iter().copied().filter(|&n| {
            let tile = grid.tile(n);
            in_columns(tile.x) && (tile.continent == 0 || tile.continent == seed.continent)
        }));
        if eligible.is_empty() {
            continue;
        }

        let next = eligible[rng.gen_range(0..eligible.len())];
        let tile = grid.tile_mut(next);
        if tile.is_water() {
            tile.terrain = PLACEHOLDER_LAND;
            tile.continent = seed.continent;
            land += 1;
            stalled = 0;
        }

        let energy = seed.energy * retention;
        if energy > 1.0 {
            frontier.push(GrowthSeed {
                tile: next,
                continent: seed.continent,
                energy,
            });
            frontier.push(GrowthSeed { energy, ..seed });
        }
    }
    stats.grown_land = land;

    resolve_single_tile_islands(grid, rng, &mut stats);

    tracing::debug!(
        seeds = stats.seeds,
        steps = stats.steps,
        land = stats.grown_land,
        budget = land_budget,
        exhausted = stats.exhausted,
        islands_grown = stats.islands_grown,
        islands_sunk = stats.islands_sunk,
        "continents.grown"
    );

    stats
}

/// Whether any frontier record, `current` included, can still walk through its own
/// continent to an unclaimed tile inside the growth band.
fn frontier_reaches_water<F>(grid: &Grid, frontier: &[GrowthSeed], current: &GrowthSeed, in_columns: F) -> bool
where
    F: Fn(usize) -> bool,
{
    let mut continents: Vec<u32> = frontier
        .iter()
        .chain(std::iter::once(current))
        .map(|s| s.continent)
        .collect();
    continents.sort_unstable();
    continents.dedup();

    continents.into_iter().any(|continent| {
        let starts = frontier
            .iter()
            .chain(std::iter::once(current))
            .filter(|s| s.continent == continent)
            .map(|s| s.tile);
        let reached = grid.flood_fill(starts, |t| in_columns(t.x) && (t.continent == continent || t.continent == 0));
        reached
            .iter()
            .zip(grid.tiles())
            .any(|(&r, t)| r && t.continent == 0 && in_columns(t.x))
    })
}

/// Widen or sink every land tile that has no land neighbor, on a coin flip.
fn resolve_single_tile_islands(grid: &mut Grid, rng: &mut ChaCha8Rng, stats: &mut GrowthStats) {
    let islands: Vec<usize> = (0..grid.len())
        .filter(|&i| grid.tile(i).is_land() && !grid.has_land_neighbor(i))
        .collect();

    for island in islands {
        // An earlier island may have grown into this one
        if grid.has_land_neighbor(island) || grid.tile(island).is_water() {
            continue;
        }

        if rng.gen_bool(0.5) {
            let continent = grid.tile(island).continent;
            let neighbors = grid.neighbors(island).to_vec();
            let mut grown: Vec<usize> = neighbors.iter().copied().filter(|_| rng.gen_bool(0.5)).collect();
            if grown.is_empty() {
                grown.push(neighbors[rng.gen_range(0..neighbors.len())]);
            }
            for n in grown {
                let tile = grid.tile_mut(n);
                tile.terrain = PLACEHOLDER_LAND;
                tile.continent = continent;
            }
            stats.islands_grown += 1;
        } else {
            let tile = grid.tile_mut(island);
            tile.terrain = TerrainType::Ocean;
            tile.continent = 0;
            stats.islands_sunk += 1;
        }
    }
}
