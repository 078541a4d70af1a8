//! Colonial map generation library
//!
//! Builds a tile map with continents, oceans, lakes, biomes, rivers and points of
//! interest from one seed. `world::generate_world` runs the whole pipeline.

pub mod ascii;
pub mod biomes;
pub mod climate;
pub mod continents;
pub mod error;
pub mod grid;
pub mod hydrography;
pub mod params;
pub mod perlin;
pub mod placement;
pub mod rivers;
pub mod seeds;
pub mod terrain;
pub mod world;

pub use error::{GenerationError, Result};
pub use grid::{Direction, Grid, Tile};
pub use params::MapParameters;
pub use seeds::MapSeeds;
pub use terrain::{BonusResource, TerrainType};
pub use world::{generate_world, WorldMap};
