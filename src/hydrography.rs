//! Hydrography classifier
//!
//! Separates oceans from lakes. Lakes and oceans are both plain water after continent
//! growth, so no elevation threshold can tell them apart. Instead:
//! 1. Force structural oceans: a sea lane down the east edge, ragged oceans on both
//!    sides, and leveled plains at the poles
//! 2. Flood-fill from the forced ocean across connected water
//! 3. Water the fill never reaches is enclosed: it either dries to land or becomes a lake
//! 4. Land touching ocean is marked coastal

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::continents::PLACEHOLDER_LAND;
use crate::grid::Grid;
use crate::params::MapParameters;
use crate::perlin::{CoherentNoise, NoiseParams};
use crate::terrain::TerrainType;

/// Summary of one classification run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HydrographyStats {
    /// Tiles forced to ocean or sea lane at the map edges
    pub forced_water: usize,
    pub sea_lanes: usize,
    /// Tiles leveled to plains at the poles
    pub pole_plains: usize,
    pub ocean_tiles: usize,
    pub lake_tiles: usize,
    /// Enclosed water turned into land
    pub dried_tiles: usize,
    pub coast_tiles: usize,
}

/// Run every classification pass in order.
pub fn classify_waters(grid: &mut Grid, params: &MapParameters, rng: &mut ChaCha8Rng) -> HydrographyStats {
    let mut stats = HydrographyStats::default();

    stats.pole_plains = level_poles(grid, params.pole_margin);
    let (forced, lanes) = force_edge_oceans(grid, params.min_edge, rng.gen());
    stats.forced_water = forced;
    stats.sea_lanes = lanes;

    let (ocean, lakes, dried) = separate_lakes(grid, rng);
    stats.ocean_tiles = ocean;
    stats.lake_tiles = lakes;
    stats.dried_tiles = dried;

    stats.coast_tiles = mark_coasts(grid);

    tracing::debug!(
        forced = stats.forced_water,
        sea_lanes = stats.sea_lanes,
        pole_plains = stats.pole_plains,
        ocean = stats.ocean_tiles,
        lakes = stats.lake_tiles,
        dried = stats.dried_tiles,
        coast = stats.coast_tiles,
        "hydrography.classified"
    );

    stats
}

// =============================================================================
// EDGE AND POLE FORCING
// =============================================================================

/// Level the `margin` rows at each pole: in every column where land reaches into
/// those rows, the whole span becomes forced plains. Returns tiles changed.
pub fn level_poles(grid: &mut Grid, margin: usize) -> usize {
    let margin = margin.min(grid.height / 2);
    if margin == 0 {
        return 0;
    }

    let north: Vec<usize> = (0..margin).collect();
    let south: Vec<usize> = (grid.height - margin..grid.height).collect();
    let mut leveled = 0;

    for rows in [north, south] {
        for x in 0..grid.width {
            let land = rows
                .iter()
                .map(|&y| grid.index(x, y))
                .find(|&i| grid.tile(i).is_land());
            let Some(land) = land else {
                continue;
            };

            let continent = grid.tile(land).continent;
            for &y in &rows {
                let i = grid.index(x, y);
                let tile = grid.tile_mut(i);
                tile.terrain = TerrainType::Plains;
                tile.forced = true;
                if tile.continent == 0 {
                    tile.continent = continent;
                }
                leveled += 1;
            }
        }
    }

    leveled
}

/// Force structural water along the east and west edges. The last column is always
/// a sea lane; ridged noise roughens the inner boundary of the forced band.
/// Returns (forced tiles, of which sea lanes).
pub fn force_edge_oceans(grid: &mut Grid, min_edge: f64, noise_seed: u64) -> (usize, usize) {
    let noise = CoherentNoise::new(noise_seed);
    let params = NoiseParams::RIDGED;
    let lane_threshold = 1.0 - min_edge / 2.0;
    let ocean_threshold = 1.0 - min_edge;
    let last_column = grid.width - 1;

    let mut forced = 0;
    let mut lanes = 0;

    for tile in grid.tiles_mut() {
        // Jitter in [-min_edge / 2, min_edge / 2]
        let jitter = (noise.ridged(tile.x as f64, tile.y as f64, &params) - 0.5) * min_edge;

        let terrain = if tile.x == last_column || tile.longitude + jitter > lane_threshold {
            TerrainType::SeaLane
        } else if tile.longitude.abs() + jitter > ocean_threshold {
            TerrainType::Ocean
        } else {
            continue;
        };

        tile.terrain = terrain;
        tile.ocean = true;
        tile.forced = true;
        tile.continent = 0;
        forced += 1;
        if terrain == TerrainType::SeaLane {
            lanes += 1;
        }
    }

    (forced, lanes)
}

// =============================================================================
// LAKE DETECTION
// =============================================================================

/// Flood-fill from every tile already flagged ocean. Reached water is ocean;
/// unreached water is enclosed and, per tile, stays as a lake with probability equal
/// to its humidity or dries to land otherwise.
/// Returns (ocean tiles, lake tiles, dried tiles).
pub fn separate_lakes(grid: &mut Grid, rng: &mut ChaCha8Rng) -> (usize, usize, usize) {
    let seeds: Vec<usize> = (0..grid.len()).filter(|&i| grid.tile(i).ocean).collect();

    if seeds.is_empty() {
        tracing::warn!("no forced ocean to flood from; treating all water as ocean");
        let mut ocean = 0;
        for tile in grid.tiles_mut().iter_mut().filter(|t| t.is_water()) {
            tile.ocean = true;
            ocean += 1;
        }
        return (ocean, 0, 0);
    }

    let reached = grid.flood_fill(seeds, |t| t.is_water());

    let mut ocean = 0;
    let mut lakes = 0;
    let mut dried = 0;
    for i in 0..grid.len() {
        if !grid.tile(i).is_water() {
            continue;
        }
        if reached[i] {
            grid.tile_mut(i).ocean = true;
            ocean += 1;
            continue;
        }

        let humidity = grid.tile(i).humidity;
        if rng.gen::<f64>() < humidity {
            let tile = grid.tile_mut(i);
            tile.terrain = TerrainType::Lakes;
            tile.ocean = false;
            lakes += 1;
        } else {
            let continent = grid
                .neighbors(i)
                .iter()
                .map(|&n| grid.tile(n).continent)
                .find(|&c| c != 0)
                .unwrap_or(0);
            let tile = grid.tile_mut(i);
            tile.terrain = PLACEHOLDER_LAND;
            tile.ocean = false;
            tile.continent = continent;
            dried += 1;
        }
    }

    (ocean, lakes, dried)
}

/// Flag land next to ocean as coast. Returns coast tiles.
pub fn mark_coasts(grid: &mut Grid) -> usize {
    let coastal: Vec<bool> = (0..grid.len())
        .map(|i| {
            grid.tile(i).is_land() && grid.neighbors(i).iter().any(|&n| grid.tile(n).ocean)
        })
        .collect();

    for (tile, coast) in grid.tiles_mut().iter_mut().zip(&coastal) {
        tile.coast = *coast;
    }
    coastal.iter().filter(|&&c| c).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn land_block(grid: &mut Grid, xs: std::ops::Range<usize>, ys: std::ops::Range<usize>) {
        for y in ys {
            for x in xs.clone() {
                let i = grid.index(x, y);
                let tile = grid.tile_mut(i);
                tile.terrain = PLACEHOLDER_LAND;
                tile.continent = 1;
            }
        }
    }

    #[test]
    fn test_east_column_is_sea_lane() {
        let mut grid = Grid::new(30, 20);
        land_block(&mut grid, 0..30, 3..17);
        let (forced, lanes) = force_edge_oceans(&mut grid, 0.15, 4);
        assert!(forced >= 2 * 20);
        assert!(lanes >= 20);
        for y in 0..20 {
            assert_eq!(grid.tile_at(29, y).map(|t| t.terrain), Some(TerrainType::SeaLane));
            let west = grid.tile_at(0, y).expect("on map");
            assert!(west.is_water() && west.ocean);
        }
    }

    #[test]
    fn test_enclosed_water_is_lake_or_land() {
        let mut grid = Grid::new(20, 12);
        land_block(&mut grid, 4..16, 2..10);
        // A 2x2 pond in the middle of the block
        for (x, y) in [(9, 5), (10, 5), (9, 6), (10, 6)] {
            let i = grid.index(x, y);
            grid.tile_mut(i).terrain = TerrainType::Ocean;
        }
        for tile in grid.tiles_mut() {
            tile.humidity = 1.0;
        }

        force_edge_oceans(&mut grid, 0.15, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let (ocean, lakes, dried) = separate_lakes(&mut grid, &mut rng);

        assert_eq!(lakes, 4);
        assert_eq!(dried, 0);
        assert!(ocean > 0);
        assert!(grid.tile_at(9, 5).map_or(false, |t| t.is_lake() && !t.ocean));
        assert!(grid.tile_at(0, 0).map_or(false, |t| t.ocean));
    }

    #[test]
    fn test_dry_pond_becomes_land() {
        let mut grid = Grid::new(20, 12);
        land_block(&mut grid, 4..16, 2..10);
        let pond = grid.index(9, 5);
        grid.tile_mut(pond).terrain = TerrainType::Ocean;
        grid.tile_mut(pond).continent = 0;
        // Humidity 0 never keeps a lake
        force_edge_oceans(&mut grid, 0.15, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let (_, lakes, dried) = separate_lakes(&mut grid, &mut rng);

        assert_eq!((lakes, dried), (0, 1));
        assert!(grid.tile(pond).is_land());
        assert_eq!(grid.tile(pond).continent, 1);
    }

    #[test]
    fn test_connected_inlet_stays_ocean() {
        let mut grid = Grid::new(20, 12);
        land_block(&mut grid, 4..16, 2..10);
        // Channel from the west ocean into the block
        for x in 0..10 {
            let i = grid.index(x, 6);
            grid.tile_mut(i).terrain = TerrainType::Ocean;
        }
        force_edge_oceans(&mut grid, 0.15, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let (_, lakes, _) = separate_lakes(&mut grid, &mut rng);

        assert_eq!(lakes, 0);
        assert!(grid.tile_at(9, 6).map_or(false, |t| t.ocean));
    }

    #[test]
    fn test_coasts_and_poles() {
        let mut grid = Grid::new(20, 12);
        land_block(&mut grid, 4..16, 0..10);
        let leveled = level_poles(&mut grid, 2);
        assert_eq!(leveled, 12 * 2);
        assert!(grid.tile_at(5, 1).map_or(false, |t| t.forced && t.terrain == TerrainType::Plains));
        assert!(grid.tile_at(5, 11).map_or(false, |t| !t.forced));

        force_edge_oceans(&mut grid, 0.15, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        separate_lakes(&mut grid, &mut rng);
        let coast = mark_coasts(&mut grid);
        assert!(coast > 0);
        assert!(grid.tile_at(4, 5).map_or(false, |t| t.coast));
        assert!(grid.tile_at(9, 5).map_or(false, |t| !t.coast));
    }
}
