//! ASCII rendering and export module for world maps
//!
//! Provides functions to render a generated map as ASCII text and export it to a file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::grid::Tile;
use crate::terrain::{BonusResource, TerrainType};
use crate::world::WorldMap;

/// Ruin marker, drawn over terrain
pub const RUIN_CHAR: char = '!';
/// River marker, drawn over terrain
pub const RIVER_CHAR: char = '=';

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Terrain characters with river and ruin overlays
    Terrain,
    /// Elevation gradient
    Elevation,
    /// Temperature gradient
    Temperature,
    /// Humidity gradient
    Humidity,
    /// Continent ids
    Continents,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Terrain => "Terrain",
            AsciiMode::Elevation => "Elevation",
            AsciiMode::Temperature => "Temperature",
            AsciiMode::Humidity => "Humidity",
            AsciiMode::Continents => "Continents",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[
            AsciiMode::Terrain,
            AsciiMode::Elevation,
            AsciiMode::Temperature,
            AsciiMode::Humidity,
            AsciiMode::Continents,
        ]
    }
}

impl std::str::FromStr for AsciiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AsciiMode::all()
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown ascii mode '{}'", s))
    }
}

/// Get ASCII character for a terrain type
pub fn terrain_char(terrain: TerrainType) -> char {
    match terrain {
        // Water
        TerrainType::Ocean => '.',
        TerrainType::SeaLane => '~',
        TerrainType::Lakes => 'o',

        // Open land, forest counterpart in the next line
        TerrainType::Tundra => ':',
        TerrainType::Boreal => 'B',
        TerrainType::Desert => 'd',
        TerrainType::Scrub => 's',
        TerrainType::Plains => '-',
        TerrainType::Mixed => 'x',
        TerrainType::Prairie => '\'',
        TerrainType::Broadleaf => 'b',
        TerrainType::Grassland => '"',
        TerrainType::Conifer => 'C',
        TerrainType::Savannah => ';',
        TerrainType::Tropical => 't',
        TerrainType::Marsh => 'm',
        TerrainType::Wetland => 'w',
        TerrainType::Swamp => 'S',
        TerrainType::Rain => 'r',

        TerrainType::Arctic => '#',
        TerrainType::Mountains => 'A',
        TerrainType::Hills => 'n',
    }
}

/// Get ASCII character for elevation
pub fn elevation_char(elevation: f64) -> char {
    const CHARS: &[char] = &['.', '-', '=', '+', '*', '#', '%', '^', 'A', 'M'];
    let idx = (elevation.clamp(0.0, 1.0) * (CHARS.len() - 1) as f64) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Get ASCII character for temperature
pub fn temperature_char(temperature: i32) -> char {
    // -20° to +40°
    const CHARS: &[char] = &['#', '=', '-', '.', ',', ';', ':', '+', '*', '@'];
    let normalized = ((temperature as f64 + 20.0) / 60.0).clamp(0.0, 1.0);
    let idx = (normalized * (CHARS.len() - 1) as f64) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Get ASCII character for humidity
pub fn humidity_char(humidity: f64) -> char {
    const CHARS: &[char] = &['_', '.', '-', ':', ';', '=', '+', '#', '%', '~'];
    let idx = (humidity.clamp(0.0, 1.0) * (CHARS.len() - 1) as f64) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Get ASCII character for a continent id: letters cycle, water is blank
pub fn continent_char(tile: &Tile) -> char {
    if tile.is_water() || tile.continent == 0 {
        ' '
    } else {
        (b'A' + ((tile.continent - 1) % 26) as u8) as char
    }
}

fn tile_char(tile: &Tile, mode: AsciiMode) -> char {
    match mode {
        AsciiMode::Terrain => {
            if tile.lost_city {
                RUIN_CHAR
            } else if tile.river.is_some() && !tile.terrain.is_rugged() {
                RIVER_CHAR
            } else {
                terrain_char(tile.terrain)
            }
        }
        AsciiMode::Elevation => elevation_char(tile.elevation),
        AsciiMode::Temperature => temperature_char(tile.temperature),
        AsciiMode::Humidity => humidity_char(tile.humidity),
        AsciiMode::Continents => continent_char(tile),
    }
}

/// Render a map to ASCII string
pub fn render_ascii_map(world: &WorldMap, mode: AsciiMode) -> String {
    let width = world.width();
    let height = world.height();
    let mut result = String::with_capacity((width + 1) * height);

    for row in world.tiles().chunks(width.max(1)) {
        for tile in row {
            result.push(tile_char(tile, mode));
        }
        result.push('\n');
    }

    result
}

/// Generate legend for terrain characters
pub fn terrain_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== TERRAIN LEGEND ===\n");
    for (i, terrain) in TerrainType::ALL.iter().enumerate() {
        legend.push_str(&format!("  {} {:<18}", terrain_char(*terrain), terrain.display_name()));
        if i % 3 == 2 {
            legend.push('\n');
        }
    }
    if TerrainType::ALL.len() % 3 != 0 {
        legend.push('\n');
    }
    legend.push_str(&format!("  {} River              {} Ancient ruins\n", RIVER_CHAR, RUIN_CHAR));
    legend
}

/// Export world data to ASCII file
pub fn export_world_file<P: AsRef<Path>>(world: &WorldMap, path: P, verbose: bool) -> io::Result<()> {
    let mut file = File::create(path)?;
    let stats = world.stats();
    let total = stats.tiles.max(1);

    // Header
    writeln!(file, "=== COLONIAL MAP FILE ===")?;
    writeln!(file, "Seed: {}", world.seed())?;
    writeln!(file, "Stage seeds: {}", world.seeds)?;
    writeln!(file, "Size: {}x{}", world.width(), world.height())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP (Terrain View) ===")?;
    write!(file, "{}", render_ascii_map(world, AsciiMode::Terrain))?;
    writeln!(file)?;
    write!(file, "{}", terrain_legend())?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "Total tiles: {}", stats.tiles)?;
    writeln!(file, "Land: {} ({:.1}%)", stats.land, 100.0 * stats.land as f64 / total as f64)?;
    writeln!(file, "Ocean: {} ({:.1}%)", stats.ocean, 100.0 * stats.ocean as f64 / total as f64)?;
    writeln!(file, "Lakes: {}", stats.lakes)?;
    writeln!(file, "Coast: {}", stats.coast)?;
    writeln!(file, "Continents: {}", stats.continents)?;
    writeln!(file, "River tiles: {}", stats.rivers)?;
    writeln!(file, "Ruins: {}", stats.ruins)?;
    writeln!(file, "Bonus resources: {}", stats.resources)?;
    writeln!(file)?;

    writeln!(file, "Terrain Distribution:")?;
    for (terrain, count) in world.terrain_histogram() {
        let pct = 100.0 * count as f64 / total as f64;
        writeln!(file, "  {:20} {} {:>6} ({:>5.1}%)", terrain.display_name(), terrain_char(terrain), count, pct)?;
    }
    writeln!(file)?;

    if verbose {
        writeln!(file, "=== TILE DATA ===")?;
        writeln!(file, "[x,y,terrain,elevation,temperature,humidity,continent,river,ruin,resource]")?;
        for tile in world.tiles() {
            let river = tile
                .river
                .map(|r| format!("{}>{}", r.inbound.map_or("*", |d| d.short_name()), r.outbound.short_name()))
                .unwrap_or_default();
            let resource = if tile.resource == BonusResource::None {
                String::new()
            } else {
                format!("{:?}", tile.resource)
            };
            writeln!(
                file,
                "{},{},{:?},{:.3},{},{:.3},{},{},{},{}",
                tile.x,
                tile.y,
                tile.terrain,
                tile.elevation,
                tile.temperature,
                tile.humidity,
                tile.continent,
                river,
                tile.lost_city as u8,
                resource
            )?;
        }
    }

    Ok(())
}
