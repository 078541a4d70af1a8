//! Biome distributor
//!
//! Gives every land tile its concrete terrain. Elevation comes from coherent noise,
//! phase-shifted per continent; high tiles become Mountains or Hills, the rest pick
//! among the terrain types whose climate window contains the tile.

use std::collections::BTreeMap;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::error::{GenerationError, Result};
use crate::grid::Grid;
use crate::params::MapParameters;
use crate::perlin::{CoherentNoise, NoiseParams};
use crate::terrain::TerrainType;

/// Coarse elevation noise: one base cycle spans several tiles
pub const ELEVATION_NOISE: NoiseParams = NoiseParams::new(4, 0.5, 2.0, 6.0);

/// Elevation bands that force rugged terrain: (lower bound, chance of Mountains over Hills)
const RUGGED_BANDS: [(f64, f64); 3] = [(0.95, 1.0), (0.85, 0.7), (0.75, 0.3)];

/// Continent noise offsets are drawn from [0, CONTINENT_OFFSET_RANGE)
const CONTINENT_OFFSET_RANGE: f64 = 4096.0;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BiomeStats {
    /// Land tiles given a terrain by this pass
    pub assigned: usize,
    pub mountains: usize,
    pub hills: usize,
    pub forested: usize,
    /// Land tiles left alone because an earlier pass fixed their terrain
    pub kept_forced: usize,
}

/// Reshape raw noise into elevation in [0, 1]. Small exponents push most tiles up
/// towards the rugged bands.
pub fn shape_elevation(noise: f64, exponent: f64) -> f64 {
    noise.abs().min(1.0).powf(exponent)
}

/// Terrain types a tile may take given its climate and elevation.
pub fn eligible_terrain(
    temperature: i32,
    humidity: f64,
    elevation: f64,
    params: &MapParameters,
) -> Vec<TerrainType> {
    TerrainType::ALL
        .iter()
        .copied()
        .filter(|t| t.is_land() && t.accepts_climate(temperature, humidity))
        .filter(|t| match t {
            TerrainType::Mountains => elevation >= params.min_mountains_elevation,
            TerrainType::Hills => elevation >= params.min_hills_elevation,
            _ => true,
        })
        .collect()
}

/// Pick from `eligible`: a forest with probability `forest_cover` when one is on
/// offer, otherwise an open terrain uniformly.
pub fn choose_terrain(eligible: &[TerrainType], forest_cover: f64, rng: &mut ChaCha8Rng) -> Option<TerrainType> {
    let (forests, open): (Vec<TerrainType>, Vec<TerrainType>) =
        eligible.iter().copied().partition(|t| t.is_forested());

    let pool = if open.is_empty() || (!forests.is_empty() && rng.gen::<f64>() < forest_cover) {
        forests
    } else {
        open
    };

    if pool.is_empty() {
        None
    } else {
        Some(pool[rng.gen_range(0..pool.len())])
    }
}

/// Rugged terrain forced by elevation, if any
fn rugged_terrain(elevation: f64, rng: &mut ChaCha8Rng) -> Option<TerrainType> {
    let &(_, mountain_chance) = RUGGED_BANDS.iter().find(|(floor, _)| elevation > *floor)?;
    if rng.gen::<f64>() < mountain_chance {
        Some(TerrainType::Mountains)
    } else {
        Some(TerrainType::Hills)
    }
}

/// Assign elevation to every tile and terrain to every unforced land tile.
pub fn distribute_biomes(grid: &mut Grid, params: &MapParameters, rng: &mut ChaCha8Rng) -> Result<BiomeStats> {
    let noise = CoherentNoise::new(rng.gen());

    // One noise phase per continent, drawn in id order
    let mut offsets: BTreeMap<u32, (f64, f64)> = BTreeMap::new();
    for tile in grid.tiles().iter().filter(|t| t.is_land()) {
        offsets.entry(tile.continent).or_insert((0.0, 0.0));
    }
    for offset in offsets.values_mut() {
        *offset = (
            rng.gen_range(0.0..CONTINENT_OFFSET_RANGE),
            rng.gen_range(0.0..CONTINENT_OFFSET_RANGE),
        );
    }

    let exponent = params.elevation_exponent;
    let elevations: Vec<f64> = grid
        .tiles()
        .par_iter()
        .map(|tile| {
            if tile.is_water() {
                return 0.0;
            }
            let (ox, oy) = offsets.get(&tile.continent).copied().unwrap_or_default();
            let raw = noise.sample(tile.x as f64 + ox, tile.y as f64 + oy, &ELEVATION_NOISE);
            shape_elevation(raw, exponent)
        })
        .collect();

    let mut stats = BiomeStats::default();
    for (i, elevation) in elevations.into_iter().enumerate() {
        let tile = grid.tile_mut(i);
        tile.elevation = elevation;
        if tile.is_water() {
            continue;
        }
        if tile.forced {
            stats.kept_forced += 1;
            continue;
        }

        let terrain = match rugged_terrain(elevation, rng) {
            Some(rugged) => {
                tile.forced = true;
                rugged
            }
            None => {
                let eligible = eligible_terrain(tile.temperature, tile.humidity, elevation, params);
                choose_terrain(&eligible, params.forest_cover, rng).ok_or(
                    GenerationError::NoEligibleTerrain {
                        x: tile.x,
                        y: tile.y,
                        temperature: tile.temperature,
                        humidity: tile.humidity,
                    },
                )?
            }
        };

        tile.terrain = terrain;
        stats.assigned += 1;
        match terrain {
            TerrainType::Mountains => stats.mountains += 1,
            TerrainType::Hills => stats.hills += 1,
            t if t.is_forested() => stats.forested += 1,
            _ => {}
        }
    }

    tracing::debug!(
        continents = offsets.len(),
        assigned = stats.assigned,
        mountains = stats.mountains,
        hills = stats.hills,
        forested = stats.forested,
        kept_forced = stats.kept_forced,
        "biomes.distributed"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::assign_climate;
    use crate::continents::PLACEHOLDER_LAND;
    use rand::SeedableRng;

    fn land_grid(width: usize, height: usize, seed: u64) -> Grid {
        let mut grid = Grid::new(width, height);
        let params = MapParameters::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        assign_climate(&mut grid, &params, &mut rng);
        for tile in grid.tiles_mut() {
            if tile.x > 0 {
                tile.terrain = PLACEHOLDER_LAND;
                tile.continent = 1 + (tile.x % 2) as u32;
            }
        }
        grid
    }

    #[test]
    fn test_shape_elevation() {
        assert_eq!(shape_elevation(0.0, 0.25), 0.0);
        assert_eq!(shape_elevation(-1.0, 0.25), 1.0);
        assert!((shape_elevation(0.0625, 0.25) - 0.5).abs() < 1e-12);
        assert!((shape_elevation(-0.0625, 0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_climate_windows_hold() {
        let params = MapParameters::default();
        let mut grid = land_grid(30, 40, 8);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let stats = distribute_biomes(&mut grid, &params, &mut rng).expect("catalog covers the climate");
        assert_eq!(stats.assigned, 29 * 40);

        for tile in grid.tiles() {
            assert!((0.0..=1.0).contains(&tile.elevation));
            if tile.is_water() {
                assert_eq!(tile.elevation, 0.0);
                continue;
            }
            if !tile.forced {
                assert!(
                    tile.terrain.accepts_climate(tile.temperature, tile.humidity),
                    "{:?} at ({}, {}) with {}° / {:.2}",
                    tile.terrain,
                    tile.x,
                    tile.y,
                    tile.temperature,
                    tile.humidity
                );
                assert!(!tile.terrain.is_rugged() || tile.elevation >= params.min_hills_elevation);
            }
        }
    }

    #[test]
    fn test_forest_cover_extremes() {
        let mut params = MapParameters::default();
        params.forest_cover = 1.0;
        let mut grid = land_grid(20, 20, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        distribute_biomes(&mut grid, &params, &mut rng).expect("generated");
        assert!(grid
            .tiles()
            .iter()
            .filter(|t| t.is_land() && !t.forced)
            .all(|t| t.terrain.is_forested()));

        params.forest_cover = 0.0;
        let mut grid = land_grid(20, 20, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        distribute_biomes(&mut grid, &params, &mut rng).expect("generated");
        assert!(grid.tiles().iter().all(|t| !t.terrain.is_forested()));
    }

    #[test]
    fn test_rugged_tiles_are_high() {
        let params = MapParameters::default();
        let mut grid = land_grid(40, 40, 21);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        distribute_biomes(&mut grid, &params, &mut rng).expect("generated");
        for tile in grid.tiles().iter().filter(|t| t.terrain == TerrainType::Mountains) {
            assert!(tile.elevation > 0.75);
        }
        for tile in grid.tiles().iter().filter(|t| t.elevation > 0.95 && t.is_land()) {
            assert_eq!(tile.terrain, TerrainType::Mountains);
        }
    }

    #[test]
    fn test_forced_tiles_keep_terrain() {
        let params = MapParameters::default();
        let mut grid = land_grid(10, 10, 4);
        let pole = grid.index(5, 0);
        grid.tile_mut(pole).forced = true;
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let stats = distribute_biomes(&mut grid, &params, &mut rng).expect("generated");
        assert_eq!(stats.kept_forced, 1);
        assert_eq!(grid.tile(pole).terrain, PLACEHOLDER_LAND);
    }

    #[test]
    fn test_impossible_climate_is_an_error() {
        let params = MapParameters::default();
        assert!(eligible_terrain(60, 0.5, 0.1, &params).is_empty());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(choose_terrain(&[], 0.5, &mut rng), None);

        let mut grid = land_grid(16, 16, 5);
        for tile in grid.tiles_mut() {
            tile.temperature = 60;
        }
        let result = distribute_biomes(&mut grid, &params, &mut rng);
        assert!(matches!(result, Err(GenerationError::NoEligibleTerrain { temperature: 60, .. })));
    }

    #[test]
    fn test_only_forests_left_picks_forest() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let pick = choose_terrain(&[TerrainType::Conifer], 0.0, &mut rng);
        assert_eq!(pick, Some(TerrainType::Conifer));
    }

    #[test]
    fn test_same_seed_same_biomes() {
        let params = MapParameters::default();
        let run = || {
            let mut grid = land_grid(24, 24, 12);
            let mut rng = ChaCha8Rng::seed_from_u64(12);
            distribute_biomes(&mut grid, &params, &mut rng).expect("generated");
            grid.tiles().iter().map(|t| t.terrain).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
