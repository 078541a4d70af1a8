//! World map container and generation pipeline
//!
//! Bundles the finished grid with the parameters and seeds that produced it.

use crate::biomes::{self, BiomeStats};
use crate::climate;
use crate::continents::{self, GrowthStats};
use crate::error::Result;
use crate::grid::{Grid, Tile};
use crate::hydrography::{self, HydrographyStats};
use crate::params::MapParameters;
use crate::placement::{self, PlacementStats};
use crate::rivers::{self, RiverStats};
use crate::seeds::{stage_rng, MapSeeds};
use crate::terrain::{BonusResource, TerrainType};

/// A generated map. Read-only once `generate_world` returns it.
#[derive(Clone, Debug)]
pub struct WorldMap {
    /// Seeds used for generation (allows recreation)
    pub seeds: MapSeeds,
    pub params: MapParameters,
    pub grid: Grid,
    pub report: GenerationReport,
}

/// Per-stage counters collected during generation
#[derive(Clone, Debug, Default)]
pub struct GenerationReport {
    pub growth: GrowthStats,
    pub hydrography: HydrographyStats,
    pub biomes: BiomeStats,
    pub rivers: RiverStats,
    pub placement: PlacementStats,
}

/// Tile counts over the finished map
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapStats {
    pub tiles: usize,
    pub land: usize,
    pub ocean: usize,
    pub lakes: usize,
    pub coast: usize,
    pub rivers: usize,
    pub ruins: usize,
    pub resources: usize,
    /// Distinct continent ids still present on land
    pub continents: usize,
}

impl WorldMap {
    /// Convenience accessor for master seed
    pub fn seed(&self) -> u64 {
        self.seeds.master
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Option<&Tile> {
        self.grid.tile_at(x, y)
    }

    pub fn tiles(&self) -> &[Tile] {
        self.grid.tiles()
    }

    /// Tile that longitude and latitude are measured from
    pub fn center(&self) -> &Tile {
        self.grid.center()
    }

    pub fn land_count(&self) -> usize {
        self.grid.land_count()
    }

    pub fn stats(&self) -> MapStats {
        let mut stats = MapStats {
            tiles: self.grid.len(),
            ..Default::default()
        };
        let mut continents: Vec<u32> = Vec::new();

        for tile in self.grid.tiles() {
            if tile.is_land() {
                stats.land += 1;
                if tile.continent != 0 {
                    continents.push(tile.continent);
                }
            } else if tile.is_lake() {
                stats.lakes += 1;
            } else {
                stats.ocean += 1;
            }
            stats.coast += tile.coast as usize;
            stats.rivers += tile.river.is_some() as usize;
            stats.ruins += tile.lost_city as usize;
            stats.resources += (tile.resource != BonusResource::None) as usize;
        }

        continents.sort_unstable();
        continents.dedup();
        stats.continents = continents.len();
        stats
    }

    /// Tile counts per terrain type, in catalog order, skipping absent types.
    pub fn terrain_histogram(&self) -> Vec<(TerrainType, usize)> {
        let mut counts = vec![0usize; TerrainType::ALL.len()];
        for tile in self.grid.tiles() {
            counts[tile.terrain as usize] += 1;
        }
        TerrainType::ALL
            .iter()
            .copied()
            .zip(counts)
            .filter(|&(_, n)| n > 0)
            .collect()
    }

    pub fn tile_info(&self, x: usize, y: usize) -> Option<TileInfo> {
        let tile = self.tile_at(x, y)?;
        Some(TileInfo {
            x,
            y,
            terrain: tile.terrain,
            elevation: tile.elevation,
            temperature: tile.temperature,
            humidity: tile.humidity,
            continent: tile.continent,
            coast: tile.coast,
            river: tile.river.map(|r| {
                let inbound = r.inbound.map_or("source", |d| d.short_name());
                format!("{} -> {}", inbound, r.outbound.short_name())
            }),
            lost_city: tile.lost_city,
            resource: tile.resource,
        })
    }
}

/// Information about a single tile
#[derive(Clone, Debug)]
pub struct TileInfo {
    pub x: usize,
    pub y: usize,
    pub terrain: TerrainType,
    pub elevation: f64,
    pub temperature: i32,
    pub humidity: f64,
    pub continent: u32,
    pub coast: bool,
    pub river: Option<String>,
    pub lost_city: bool,
    pub resource: BonusResource,
}

impl TileInfo {
    pub fn temperature_str(&self) -> String {
        format!("{}°", self.temperature)
    }

    /// Format humidity as string
    pub fn humidity_str(&self) -> String {
        let desc = if self.humidity < 0.2 {
            "arid"
        } else if self.humidity < 0.4 {
            "dry"
        } else if self.humidity < 0.6 {
            "moderate"
        } else if self.humidity < 0.8 {
            "wet"
        } else {
            "saturated"
        };
        format!("{:.2} ({})", self.humidity, desc)
    }
}

/// Generate a complete map for `params` from a master seed.
pub fn generate_world(params: &MapParameters, seed: u64) -> Result<WorldMap> {
    generate_world_with_seeds(params, MapSeeds::from_master(seed))
}

/// Generate a complete map with explicit per-stage seeds.
pub fn generate_world_with_seeds(params: &MapParameters, seeds: MapSeeds) -> Result<WorldMap> {
    params.validate()?;

    let mut grid = Grid::new(params.width, params.height);
    let mut report = GenerationReport::default();

    // Climate is fixed up front; later stages only read it
    climate::assign_climate(&mut grid, params, &mut stage_rng(seeds.climate));

    report.growth = continents::grow_continents(&mut grid, params, &mut stage_rng(seeds.continents));

    report.hydrography = hydrography::classify_waters(&mut grid, params, &mut stage_rng(seeds.hydrography));

    report.biomes = biomes::distribute_biomes(&mut grid, params, &mut stage_rng(seeds.biomes))?;

    report.rivers = rivers::place_rivers(&mut grid, params, &mut stage_rng(seeds.rivers));

    report.placement = placement::place_features(&mut grid, params, &mut stage_rng(seeds.placement))?;

    let world = WorldMap {
        seeds,
        params: params.clone(),
        grid,
        report,
    };

    let stats = world.stats();
    tracing::info!(
        seed = world.seed(),
        width = world.width(),
        height = world.height(),
        land = stats.land,
        lakes = stats.lakes,
        continents = stats.continents,
        rivers = world.report.rivers.rivers,
        ruins = stats.ruins,
        resources = stats.resources,
        "map generated"
    );

    Ok(world)
}
