//! Spread-out placement of points of interest
//!
//! Scatters ancient ruins and bonus resources so that no two are too close and no
//! single terrain type hogs them.

use std::collections::BTreeMap;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::{GenerationError, Result};
use crate::grid::Grid;
use crate::params::MapParameters;
use crate::terrain::{BonusResource, TerrainType};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlacementStats {
    pub ruins: usize,
    pub resources: usize,
}

/// Choose `count` tiles from `candidates` at least `initial_distance + 1` apart,
/// balancing picks across terrain types. When the count can't be met the whole
/// selection is retried one step closer, down to distance 1.
pub fn choose_spread_out(
    grid: &Grid,
    count: usize,
    candidates: &[usize],
    initial_distance: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<usize>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut best = 0;
    for distance in (1..=initial_distance.max(1)).rev() {
        let chosen = spread_once(grid, count, candidates, distance, rng);
        if chosen.len() == count {
            tracing::trace!(count, distance, "placement.spread");
            return Ok(chosen);
        }
        best = best.max(chosen.len());
    }

    Err(GenerationError::PlacementInfeasible {
        requested: count,
        placed: best,
    })
}

/// One greedy pass at a fixed distance
fn spread_once(
    grid: &Grid,
    count: usize,
    candidates: &[usize],
    distance: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<usize> {
    let mut available = candidates.to_vec();
    let mut chosen = Vec::with_capacity(count);

    let mut picks_per_terrain: BTreeMap<TerrainType, usize> = BTreeMap::new();
    for &i in candidates {
        picks_per_terrain.entry(grid.tile(i).terrain).or_insert(0);
    }

    while chosen.len() < count && !available.is_empty() {
        // Least-picked terrain that still has tiles, ties broken by catalog order
        let mut ranked: Vec<(usize, TerrainType)> =
            picks_per_terrain.iter().map(|(&t, &n)| (n, t)).collect();
        ranked.sort();
        let Some(terrain) = ranked
            .into_iter()
            .map(|(_, t)| t)
            .find(|&t| available.iter().any(|&i| grid.tile(i).terrain == t))
        else {
            break;
        };

        let of_terrain: Vec<usize> = available
            .iter()
            .copied()
            .filter(|&i| grid.tile(i).terrain == terrain)
            .collect();
        let pick = of_terrain[rng.gen_range(0..of_terrain.len())];

        available.retain(|&i| grid.distance(i, pick) > distance);
        chosen.push(pick);
        *picks_per_terrain.entry(terrain).or_insert(0) += 1;
    }

    chosen
}

/// Flag roughly one land tile in a hundred as an ancient ruin.
pub fn spread_ancient_ruins(grid: &mut Grid, params: &MapParameters, rng: &mut ChaCha8Rng) -> Result<usize> {
    let land: Vec<usize> = (0..grid.len()).filter(|&i| grid.tile(i).is_land()).collect();
    let count = (land.len() as f64 * params.ruin_density) as usize;

    let chosen = choose_spread_out(grid, count, &land, params.ruin_spacing, rng)?;
    for &i in &chosen {
        grid.tile_mut(i).lost_city = true;
    }

    tracing::debug!(requested = count, placed = chosen.len(), "placement.ruins");
    Ok(chosen.len())
}

/// Tiles that may receive their terrain's bonus resource: land, lakes and ocean
/// next to land, never a ruin.
pub fn resource_candidates(grid: &Grid) -> Vec<usize> {
    (0..grid.len())
        .filter(|&i| {
            let tile = grid.tile(i);
            if tile.lost_city || tile.terrain.bonus_resource() == BonusResource::None {
                return false;
            }
            tile.is_land() || tile.is_lake() || (tile.ocean && grid.has_land_neighbor(i))
        })
        .collect()
}

/// Scatter bonus resources; each chosen tile gets its terrain's affinity.
pub fn scatter_bonus_resources(grid: &mut Grid, params: &MapParameters, rng: &mut ChaCha8Rng) -> Result<usize> {
    let candidates = resource_candidates(grid);
    let count = ((grid.land_count() as f64 * params.resource_density) as usize).min(candidates.len());

    let chosen = choose_spread_out(grid, count, &candidates, params.resource_spacing, rng)?;
    for &i in &chosen {
        let tile = grid.tile_mut(i);
        tile.resource = tile.terrain.bonus_resource();
    }

    tracing::debug!(
        requested = count,
        candidates = candidates.len(),
        placed = chosen.len(),
        "placement.resources"
    );
    Ok(chosen.len())
}

/// Ruins first, then resources on the remaining tiles.
pub fn place_features(grid: &mut Grid, params: &MapParameters, rng: &mut ChaCha8Rng) -> Result<PlacementStats> {
    let ruins = spread_ancient_ruins(grid, params, rng)?;
    let resources = scatter_bonus_resources(grid, params, rng)?;
    Ok(PlacementStats { ruins, resources })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn set_land(grid: &mut Grid, cells: &[(usize, usize)], terrain: TerrainType) -> Vec<usize> {
        cells
            .iter()
            .map(|&(x, y)| {
                let i = grid.index(x, y);
                grid.tile_mut(i).terrain = terrain;
                i
            })
            .collect()
    }

    #[test]
    fn test_zero_count_is_empty() {
        let grid = Grid::new(4, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(choose_spread_out(&grid, 0, &[], 5, &mut rng), Ok(Vec::new()));
    }

    #[test]
    fn test_distance_relaxes_until_it_fits() {
        // Ten tiles three columns apart: only distances below 3 guarantee five picks
        let mut grid = Grid::new(30, 3);
        let cells: Vec<(usize, usize)> = (0..10).map(|k| (k * 3, 1)).collect();
        let candidates = set_land(&mut grid, &cells, TerrainType::Plains);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let chosen = choose_spread_out(&grid, 5, &candidates, 10, &mut rng).expect("fits at distance 2");
        assert_eq!(chosen.len(), 5);
        for (a, &i) in chosen.iter().enumerate() {
            for &j in &chosen[a + 1..] {
                assert!(grid.distance(i, j) >= 3);
            }
        }
    }

    #[test]
    fn test_crowded_candidates_fail_cleanly() {
        // A 5x2 block of ten tiles holds at most three tiles two apart
        let mut grid = Grid::new(8, 4);
        let cells: Vec<(usize, usize)> = (0..5).flat_map(|x| [(x + 1, 1), (x + 1, 2)]).collect();
        let candidates = set_land(&mut grid, &cells, TerrainType::Grassland);
        assert_eq!(candidates.len(), 10);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let result = choose_spread_out(&grid, 5, &candidates, 10, &mut rng);
        match result {
            Err(GenerationError::PlacementInfeasible { requested, placed }) => {
                assert_eq!(requested, 5);
                assert!(placed <= 3);
            }
            other => panic!("expected infeasible placement, got {:?}", other),
        }
    }

    #[test]
    fn test_more_than_candidates_fails() {
        let mut grid = Grid::new(2, 2);
        let candidates = set_land(&mut grid, &[(0, 0), (1, 0), (0, 1), (1, 1)], TerrainType::Plains);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(choose_spread_out(&grid, 5, &candidates, 1, &mut rng).is_err());
    }

    #[test]
    fn test_terrain_types_are_balanced() {
        // Plenty of plains and a single, isolated desert tile
        let mut grid = Grid::new(20, 20);
        let plains: Vec<(usize, usize)> = (0..10).flat_map(|y| (0..10).map(move |x| (x, y))).collect();
        let mut candidates = set_land(&mut grid, &plains, TerrainType::Plains);
        candidates.extend(set_land(&mut grid, &[(18, 18)], TerrainType::Desert));

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let chosen = choose_spread_out(&grid, 2, &candidates, 1, &mut rng).expect("placed");
        let terrains: Vec<TerrainType> = chosen.iter().map(|&i| grid.tile(i).terrain).collect();
        assert!(terrains.contains(&TerrainType::Desert));
        assert!(terrains.contains(&TerrainType::Plains));
    }

    #[test]
    fn test_ruins_and_resources() {
        let mut grid = Grid::new(40, 40);
        for tile in grid.tiles_mut() {
            if (5..35).contains(&tile.x) {
                tile.terrain = if tile.x < 20 { TerrainType::Plains } else { TerrainType::Conifer };
            } else {
                tile.ocean = true;
            }
        }
        let params = MapParameters::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let stats = place_features(&mut grid, &params, &mut rng).expect("placed");

        assert_eq!(stats.ruins, (1200.0 * params.ruin_density) as usize);
        assert!(stats.ruins > 0);
        assert_eq!(stats.resources, (1200.0 * params.resource_density) as usize);
        assert_eq!(grid.tiles().iter().filter(|t| t.lost_city).count(), stats.ruins);

        for tile in grid.tiles().iter().filter(|t| t.resource != BonusResource::None) {
            assert!(!tile.lost_city);
            assert_eq!(tile.resource, tile.terrain.bonus_resource());
            assert!(tile.is_land() || tile.x == 4 || tile.x == 35);
        }
    }
}
