//! River simulator
//!
//! Picks humid inland sources and traces each one downhill, tile by tile, until it
//! reaches water or joins an existing river. Flow directions are stored on the
//! tiles the river passes through.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::grid::{Direction, Grid};
use crate::params::MapParameters;
use crate::terrain::TerrainType;

/// Share of the river budget given to mountain sources
const MOUNTAIN_SHARE: f64 = 0.5;
/// Share of the river budget given to hill sources
const HILL_SHARE: f64 = 0.3;

/// River segment carried by one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct River {
    /// Towards the upstream tile; `None` at the source
    pub inbound: Option<Direction>,
    /// Towards the downstream tile
    pub outbound: Direction,
}

impl River {
    pub fn is_source(&self) -> bool {
        self.inbound.is_none()
    }
}

/// How a single trace ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Reached water; the last tile of the path is the mouth
    Mouth(Vec<usize>),
    /// Ran into an existing river; the last tile of the path is the junction
    Merge(Vec<usize>),
    /// No strictly lower neighbor
    Blocked,
}

impl FlowOutcome {
    /// Tiles from source to mouth or junction; empty when blocked.
    pub fn path(&self) -> &[usize] {
        match self {
            FlowOutcome::Mouth(path) | FlowOutcome::Merge(path) => path,
            FlowOutcome::Blocked => &[],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RiverStats {
    /// Rivers requested for this map
    pub target: usize,
    /// Sources that passed the humidity and inland filters
    pub candidates: usize,
    pub rivers: usize,
    pub merged: usize,
    pub blocked: usize,
    /// Tiles carrying a river segment
    pub river_tiles: usize,
}

/// Trace downhill from `source`. Each step goes to the lowest neighbor; water always
/// counts as lowest. The trace fails if that neighbor is land and not strictly lower.
pub fn trace_flow(grid: &Grid, source: usize) -> FlowOutcome {
    let start = grid.tile(source);
    if start.is_water() || start.river.is_some() {
        return FlowOutcome::Blocked;
    }

    let mut path = vec![source];
    let mut current = source;
    loop {
        let lowest = grid.neighbors(current).iter().copied().min_by(|&a, &b| {
            flow_height(grid, a).total_cmp(&flow_height(grid, b))
        });
        let Some(next) = lowest else {
            return FlowOutcome::Blocked;
        };

        let next_tile = grid.tile(next);
        if next_tile.is_land() && next_tile.elevation >= grid.tile(current).elevation {
            return FlowOutcome::Blocked;
        }

        path.push(next);
        if next_tile.is_water() {
            return FlowOutcome::Mouth(path);
        }
        if next_tile.river.is_some() {
            return FlowOutcome::Merge(path);
        }
        current = next;
    }
}

/// Elevation as seen by flowing water
fn flow_height(grid: &Grid, index: usize) -> f64 {
    let tile = grid.tile(index);
    if tile.is_water() {
        -1.0
    } else {
        tile.elevation
    }
}

/// Write river segments along a traced path. The last tile is left untouched.
/// Returns the number of tiles given a segment.
pub fn commit_river(grid: &mut Grid, path: &[usize]) -> usize {
    let mut written = 0;
    for i in 0..path.len().saturating_sub(1) {
        let inbound = if i == 0 {
            None
        } else {
            grid.direction_between(path[i], path[i - 1])
        };
        let Some(outbound) = grid.direction_between(path[i], path[i + 1]) else {
            continue;
        };
        grid.tile_mut(path[i]).river = Some(River { inbound, outbound });
        written += 1;
    }
    written
}

/// Place rivers across the map. Sources are split into mountain, hill and flat tiers;
/// whatever budget the rugged tiers fail to use rolls over to flat sources.
pub fn place_rivers(grid: &mut Grid, params: &MapParameters, rng: &mut ChaCha8Rng) -> RiverStats {
    let target = (grid.land_count() as f64 * params.base_river_amount).round() as usize;
    let mut stats = RiverStats {
        target,
        ..Default::default()
    };
    if target == 0 {
        return stats;
    }

    let mut mountains = Vec::new();
    let mut hills = Vec::new();
    let mut flat = Vec::new();
    for (i, tile) in grid.tiles().iter().enumerate() {
        if !tile.is_land() || tile.humidity <= params.min_river_humidity || grid.has_water_neighbor(i) {
            continue;
        }
        match tile.terrain {
            TerrainType::Mountains => mountains.push(i),
            TerrainType::Hills => hills.push(i),
            _ => flat.push(i),
        }
    }
    stats.candidates = mountains.len() + hills.len() + flat.len();

    mountains.shuffle(rng);
    hills.shuffle(rng);
    flat.shuffle(rng);

    let mountain_budget = (target as f64 * MOUNTAIN_SHARE).round() as usize;
    let hill_budget = (target as f64 * HILL_SHARE).round() as usize;

    // Rugged tiers get one attempt per budgeted river
    for (sources, budget) in [(&mountains, mountain_budget), (&hills, hill_budget)] {
        for &source in sources.iter().take(budget) {
            try_river(grid, source, &mut stats);
        }
    }

    // Flat sources make up the rest, including anything the rugged tiers missed
    for &source in &flat {
        if stats.rivers >= target {
            break;
        }
        try_river(grid, source, &mut stats);
    }

    if stats.rivers < target {
        tracing::warn!(target, placed = stats.rivers, "river budget not met");
    }

    tracing::debug!(
        target = stats.target,
        candidates = stats.candidates,
        rivers = stats.rivers,
        merged = stats.merged,
        blocked = stats.blocked,
        tiles = stats.river_tiles,
        "rivers.placed"
    );

    stats
}

fn try_river(grid: &mut Grid, source: usize, stats: &mut RiverStats) -> bool {
    let outcome = trace_flow(grid, source);
    if let FlowOutcome::Merge(_) = outcome {
        stats.merged += 1;
    }
    let path = outcome.path();
    if path.is_empty() {
        stats.blocked += 1;
        return false;
    }

    stats.river_tiles += commit_river(grid, path);
    stats.rivers += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continents::PLACEHOLDER_LAND;
    use rand::SeedableRng;

    /// All-land grid sloping down towards a water column on the east edge.
    fn east_slope(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height);
        for tile in grid.tiles_mut() {
            if tile.x + 1 == width {
                tile.terrain = TerrainType::Ocean;
                tile.elevation = 0.0;
            } else {
                tile.terrain = PLACEHOLDER_LAND;
                tile.elevation = 1.0 - tile.x as f64 / width as f64 + tile.y as f64 * 0.001;
                tile.humidity = 0.5;
            }
        }
        grid
    }

    fn assert_flows_downhill(grid: &Grid) {
        for (i, tile) in grid.tiles().iter().enumerate() {
            let Some(river) = tile.river else {
                continue;
            };
            let next = grid.step(i, river.outbound).expect("outbound stays on the map");
            let next_tile = grid.tile(next);
            assert!(next_tile.is_water() || next_tile.elevation < tile.elevation);
        }
    }

    #[test]
    fn test_pit_gives_empty_path() {
        let mut grid = Grid::new(5, 5);
        for tile in grid.tiles_mut() {
            tile.terrain = PLACEHOLDER_LAND;
            tile.elevation = 0.8;
        }
        let pit = grid.index(2, 2);
        grid.tile_mut(pit).elevation = 0.2;

        let outcome = trace_flow(&grid, pit);
        assert_eq!(outcome, FlowOutcome::Blocked);
        assert!(outcome.path().is_empty());
    }

    #[test]
    fn test_flat_plateau_is_blocked() {
        let mut grid = Grid::new(5, 5);
        for tile in grid.tiles_mut() {
            tile.terrain = PLACEHOLDER_LAND;
            tile.elevation = 0.5;
        }
        assert!(trace_flow(&grid, grid.index(2, 2)).path().is_empty());
    }

    #[test]
    fn test_trace_reaches_the_sea() {
        let mut grid = east_slope(10, 5);
        let source = grid.index(0, 2);
        let outcome = trace_flow(&grid, source);
        let FlowOutcome::Mouth(path) = outcome else {
            panic!("expected a mouth, got {:?}", outcome);
        };
        assert_eq!(path.len(), 10);
        assert_eq!(path[0], source);
        assert!(grid.tile(path[9]).is_water());

        let written = commit_river(&mut grid, &path);
        assert_eq!(written, 9);
        assert!(grid.tile(source).river.map_or(false, |r| r.is_source()));
        assert!(grid.tile(path[9]).river.is_none());
        for pair in path.windows(2) {
            let river = grid.tile(pair[0]).river.expect("segment");
            assert_eq!(grid.step(pair[0], river.outbound), Some(pair[1]));
        }
        for triple in path.windows(3) {
            let river = grid.tile(triple[1]).river.expect("segment");
            assert_eq!(river.inbound.and_then(|d| grid.step(triple[1], d)), Some(triple[0]));
        }
        assert_flows_downhill(&grid);
    }

    #[test]
    fn test_second_river_merges() {
        let mut grid = east_slope(10, 5);
        let first = trace_flow(&grid, grid.index(2, 2));
        commit_river(&mut grid, first.path());

        let second = trace_flow(&grid, grid.index(0, 2));
        let FlowOutcome::Merge(path) = second else {
            panic!("expected a merge, got {:?}", second);
        };
        assert!(grid.tile(*path.last().expect("non-empty")).river.is_some());
        assert_eq!(trace_flow(&grid, grid.index(2, 2)), FlowOutcome::Blocked);
    }

    #[test]
    fn test_place_rivers_flow_downhill() {
        let mut grid = east_slope(30, 20);
        let mut params = MapParameters::default();
        params.base_river_amount = 0.02;
        let mut rng = ChaCha8Rng::seed_from_u64(17);

        let stats = place_rivers(&mut grid, &params, &mut rng);
        assert_eq!(stats.target, (grid.land_count() as f64 * 0.02).round() as usize);
        assert!(stats.rivers > 0);
        assert!(stats.river_tiles > 0);
        assert_flows_downhill(&grid);
    }

    #[test]
    fn test_dry_land_has_no_rivers() {
        let mut grid = east_slope(20, 10);
        for tile in grid.tiles_mut() {
            tile.humidity = 0.1;
        }
        let params = MapParameters::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let stats = place_rivers(&mut grid, &params, &mut rng);
        assert_eq!(stats.candidates, 0);
        assert_eq!(stats.rivers, 0);
    }
}
