//! Terrain catalog
//!
//! Every terrain type is a plain tag. Its numeric attributes, valid climate window,
//! forest pairing and bonus-resource affinity live in static tables indexed by the tag.

use serde::{Deserialize, Serialize};

/// Concrete terrain of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    // Unforested
    Tundra,
    Desert,
    Plains,
    Prairie,
    Grassland,
    Savannah,
    Marsh,
    Swamp,

    // Forested
    Boreal,
    Scrub,
    Mixed,
    Broadleaf,
    Conifer,
    Tropical,
    Wetland,
    Rain,

    // Other
    Arctic,
    Ocean,
    Lakes,
    SeaLane,
    Mountains,
    Hills,
}

/// Per-tile production of each good.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Yields {
    pub grain: u8,
    pub sugar: u8,
    pub tobacco: u8,
    pub cotton: u8,
    pub furs: u8,
    pub lumber: u8,
    pub ore: u8,
    pub silver: u8,
    pub fish: u8,
}

/// Inclusive temperature (°) and humidity window a terrain can appear in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateRange {
    pub min_temperature: i32,
    pub max_temperature: i32,
    pub min_humidity: f64,
    pub max_humidity: f64,
}

impl ClimateRange {
    pub const fn new(min_temperature: i32, max_temperature: i32, min_humidity: f64, max_humidity: f64) -> Self {
        Self {
            min_temperature,
            max_temperature,
            min_humidity,
            max_humidity,
        }
    }

    pub fn contains(&self, temperature: i32, humidity: f64) -> bool {
        (self.min_temperature..=self.max_temperature).contains(&temperature)
            && humidity >= self.min_humidity
            && humidity <= self.max_humidity
    }
}

/// Static attributes of a terrain type.
#[derive(Clone, Copy, Debug)]
pub struct TerrainStats {
    pub movement_cost: u8,
    pub defense_bonus: u8,
    pub improvement_cost: u8,
    pub base_value: u8,
    pub yields: Yields,
    /// `None` for water, which never comes out of climate selection
    pub climate: Option<ClimateRange>,
    pub forested: bool,
    pub bonus_resource: BonusResource,
}

/// Special resource that can sit on a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BonusResource {
    #[default]
    None,
    DepletedMine,
    Oasis,
    Wheat,
    PrimeCotton,
    PrimeTobacco,
    PrimeSugar,
    Minerals,
    Fishery,
    Beaver,
    Game,
    PrimeTimber,
    SilverDeposit,
    OreDeposit,
}

impl BonusResource {
    pub fn value(&self) -> u8 {
        match self {
            BonusResource::None => 0,
            BonusResource::DepletedMine => 6,
            BonusResource::Oasis => 3,
            BonusResource::Wheat => 4,
            BonusResource::PrimeCotton => 6,
            BonusResource::PrimeTobacco => 6,
            BonusResource::PrimeSugar => 7,
            BonusResource::Minerals => 4,
            BonusResource::Fishery => 5,
            BonusResource::Beaver => 6,
            BonusResource::Game => 6,
            BonusResource::PrimeTimber => 6,
            BonusResource::SilverDeposit => 12,
            BonusResource::OreDeposit => 6,
        }
    }
}

#[allow(clippy::too_many_arguments)]
const fn yields(
    grain: u8,
    sugar: u8,
    tobacco: u8,
    cotton: u8,
    furs: u8,
    lumber: u8,
    ore: u8,
    silver: u8,
    fish: u8,
) -> Yields {
    Yields {
        grain,
        sugar,
        tobacco,
        cotton,
        furs,
        lumber,
        ore,
        silver,
        fish,
    }
}

const fn stats(
    movement_cost: u8,
    defense_bonus: u8,
    improvement_cost: u8,
    base_value: u8,
    yields: Yields,
    climate: Option<ClimateRange>,
    forested: bool,
    bonus_resource: BonusResource,
) -> TerrainStats {
    TerrainStats {
        movement_cost,
        defense_bonus,
        improvement_cost,
        base_value,
        yields,
        climate,
        forested,
        bonus_resource,
    }
}

// Climate windows shared by each unforested/forested pair. Together with Tundra they
// cover every temperature in [-20, 40] and humidity in [0, 1].
const TUNDRA_CLIMATE: ClimateRange = ClimateRange::new(-20, 5, 0.0, 1.0);
const DESERT_CLIMATE: ClimateRange = ClimateRange::new(15, 40, 0.0, 0.35);
const PLAINS_CLIMATE: ClimateRange = ClimateRange::new(0, 25, 0.25, 0.6);
const PRAIRIE_CLIMATE: ClimateRange = ClimateRange::new(5, 25, 0.0, 0.45);
const GRASSLAND_CLIMATE: ClimateRange = ClimateRange::new(5, 30, 0.4, 0.75);
const SAVANNAH_CLIMATE: ClimateRange = ClimateRange::new(20, 40, 0.3, 0.7);
const MARSH_CLIMATE: ClimateRange = ClimateRange::new(0, 25, 0.6, 1.0);
const SWAMP_CLIMATE: ClimateRange = ClimateRange::new(20, 40, 0.6, 1.0);
const ARCTIC_CLIMATE: ClimateRange = ClimateRange::new(-20, -8, 0.0, 0.5);
const ANY_CLIMATE: ClimateRange = ClimateRange::new(-20, 40, 0.0, 1.0);

use BonusResource as R;

/// Indexed by `TerrainType as usize`.
const TERRAIN_TABLE: [TerrainStats; 22] = [
    stats(1, 0, 4, 2, yields(2, 0, 0, 0, 0, 0, 2, 0, 0), Some(TUNDRA_CLIMATE), false, R::Minerals),
    stats(1, 0, 3, 2, yields(1, 0, 0, 1, 0, 0, 2, 0, 0), Some(DESERT_CLIMATE), false, R::Oasis),
    stats(1, 0, 3, 4, yields(4, 0, 0, 2, 0, 0, 1, 0, 0), Some(PLAINS_CLIMATE), false, R::Wheat),
    stats(1, 0, 3, 4, yields(2, 0, 0, 3, 0, 0, 0, 0, 0), Some(PRAIRIE_CLIMATE), false, R::PrimeCotton),
    stats(1, 0, 3, 4, yields(2, 0, 3, 0, 0, 0, 0, 0, 0), Some(GRASSLAND_CLIMATE), false, R::PrimeTobacco),
    stats(1, 0, 3, 4, yields(3, 3, 0, 0, 0, 0, 0, 0, 0), Some(SAVANNAH_CLIMATE), false, R::PrimeSugar),
    stats(2, 1, 5, 2, yields(2, 0, 2, 0, 0, 0, 2, 0, 0), Some(MARSH_CLIMATE), false, R::Minerals),
    stats(2, 1, 7, 2, yields(2, 2, 0, 0, 0, 0, 2, 0, 0), Some(SWAMP_CLIMATE), false, R::Minerals),
    stats(2, 2, 4, 3, yields(1, 0, 0, 0, 3, 2, 1, 0, 0), Some(TUNDRA_CLIMATE), true, R::Game),
    stats(1, 2, 4, 1, yields(1, 0, 0, 1, 2, 1, 1, 0, 0), Some(DESERT_CLIMATE), true, R::Game),
    stats(2, 2, 4, 3, yields(2, 0, 0, 1, 3, 3, 0, 0, 0), Some(PLAINS_CLIMATE), true, R::Beaver),
    stats(2, 2, 4, 3, yields(1, 0, 0, 1, 2, 2, 0, 0, 0), Some(PRAIRIE_CLIMATE), true, R::Game),
    stats(2, 2, 4, 3, yields(1, 0, 1, 0, 2, 3, 0, 0, 0), Some(GRASSLAND_CLIMATE), true, R::PrimeTimber),
    stats(2, 2, 6, 3, yields(2, 1, 0, 0, 2, 2, 0, 0, 0), Some(SAVANNAH_CLIMATE), true, R::PrimeTimber),
    stats(3, 2, 6, 1, yields(1, 0, 1, 0, 2, 2, 1, 0, 0), Some(MARSH_CLIMATE), true, R::Beaver),
    stats(3, 3, 7, 1, yields(1, 1, 0, 0, 1, 2, 1, 0, 0), Some(SWAMP_CLIMATE), true, R::PrimeTimber),
    stats(2, 0, 4, 0, yields(0, 0, 0, 0, 0, 0, 0, 0, 0), Some(ARCTIC_CLIMATE), false, R::None),
    stats(1, 0, 2, 3, yields(0, 0, 0, 0, 0, 0, 0, 0, 3), None, false, R::Fishery),
    stats(1, 0, 2, 3, yields(0, 0, 0, 0, 0, 0, 0, 0, 3), None, false, R::Fishery),
    stats(1, 0, 2, 0, yields(0, 0, 0, 0, 0, 0, 0, 0, 3), None, false, R::None),
    stats(3, 6, 7, 2, yields(0, 0, 0, 0, 0, 0, 4, 1, 0), Some(ANY_CLIMATE), false, R::SilverDeposit),
    stats(2, 4, 4, 2, yields(1, 0, 0, 0, 0, 0, 4, 0, 0), Some(ANY_CLIMATE), false, R::OreDeposit),
];

/// (unforested, forested) pairs, one per biome family.
const FOREST_PAIRS: [(TerrainType, TerrainType); 8] = [
    (TerrainType::Tundra, TerrainType::Boreal),
    (TerrainType::Desert, TerrainType::Scrub),
    (TerrainType::Plains, TerrainType::Mixed),
    (TerrainType::Prairie, TerrainType::Broadleaf),
    (TerrainType::Grassland, TerrainType::Conifer),
    (TerrainType::Savannah, TerrainType::Tropical),
    (TerrainType::Marsh, TerrainType::Wetland),
    (TerrainType::Swamp, TerrainType::Rain),
];

impl TerrainType {
    pub const ALL: [TerrainType; 22] = [
        TerrainType::Tundra,
        TerrainType::Desert,
        TerrainType::Plains,
        TerrainType::Prairie,
        TerrainType::Grassland,
        TerrainType::Savannah,
        TerrainType::Marsh,
        TerrainType::Swamp,
        TerrainType::Boreal,
        TerrainType::Scrub,
        TerrainType::Mixed,
        TerrainType::Broadleaf,
        TerrainType::Conifer,
        TerrainType::Tropical,
        TerrainType::Wetland,
        TerrainType::Rain,
        TerrainType::Arctic,
        TerrainType::Ocean,
        TerrainType::Lakes,
        TerrainType::SeaLane,
        TerrainType::Mountains,
        TerrainType::Hills,
    ];

    pub fn stats(&self) -> &'static TerrainStats {
        &TERRAIN_TABLE[*self as usize]
    }

    pub fn is_water(&self) -> bool {
        matches!(self, TerrainType::Ocean | TerrainType::SeaLane | TerrainType::Lakes)
    }

    pub fn is_land(&self) -> bool {
        !self.is_water()
    }

    pub fn is_forested(&self) -> bool {
        self.stats().forested
    }

    /// Mountains and Hills, which elevation rather than climate decides.
    pub fn is_rugged(&self) -> bool {
        matches!(self, TerrainType::Mountains | TerrainType::Hills)
    }

    pub fn climate(&self) -> Option<ClimateRange> {
        self.stats().climate
    }

    pub fn accepts_climate(&self, temperature: i32, humidity: f64) -> bool {
        self.climate()
            .map_or(false, |range| range.contains(temperature, humidity))
    }

    pub fn bonus_resource(&self) -> BonusResource {
        self.stats().bonus_resource
    }

    /// Forested counterpart, if this terrain belongs to a biome family.
    pub fn forested(&self) -> Option<TerrainType> {
        FOREST_PAIRS
            .iter()
            .find(|(bare, _)| bare == self)
            .map(|&(_, forest)| forest)
    }

    /// Unforested counterpart, if this terrain is a forest.
    pub fn deforested(&self) -> Option<TerrainType> {
        FOREST_PAIRS
            .iter()
            .find(|(_, forest)| forest == self)
            .map(|&(bare, _)| bare)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainType::Tundra => "Tundra",
            TerrainType::Desert => "Desert",
            TerrainType::Plains => "Plains",
            TerrainType::Prairie => "Prairie",
            TerrainType::Grassland => "Grassland",
            TerrainType::Savannah => "Savannah",
            TerrainType::Marsh => "Marsh",
            TerrainType::Swamp => "Swamp",
            TerrainType::Boreal => "Boreal Forest",
            TerrainType::Scrub => "Scrub Forest",
            TerrainType::Mixed => "Mixed Forest",
            TerrainType::Broadleaf => "Broadleaf Forest",
            TerrainType::Conifer => "Conifer Forest",
            TerrainType::Tropical => "Tropical Forest",
            TerrainType::Wetland => "Wetland Forest",
            TerrainType::Rain => "Rain Forest",
            TerrainType::Arctic => "Arctic",
            TerrainType::Ocean => "Ocean",
            TerrainType::Lakes => "Lakes",
            TerrainType::SeaLane => "Sea Lane",
            TerrainType::Mountains => "Mountains",
            TerrainType::Hills => "Hills",
        }
    }
}

impl std::fmt::Display for TerrainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_enum_order() {
        for (i, terrain) in TerrainType::ALL.iter().enumerate() {
            assert_eq!(*terrain as usize, i);
        }
    }

    #[test]
    fn test_forest_pairs_round_trip() {
        for &(bare, forest) in FOREST_PAIRS.iter() {
            assert_eq!(bare.forested(), Some(forest));
            assert_eq!(forest.deforested(), Some(bare));
            assert!(forest.is_forested());
            assert!(!bare.is_forested());
            assert_eq!(bare.climate(), forest.climate());
        }
        assert_eq!(TerrainType::Mountains.forested(), None);
        assert_eq!(TerrainType::Plains.deforested(), None);
    }

    #[test]
    fn test_water_predicate() {
        let water: Vec<_> = TerrainType::ALL.iter().filter(|t| t.is_water()).collect();
        assert_eq!(water, vec![&TerrainType::Ocean, &TerrainType::Lakes, &TerrainType::SeaLane]);
        for t in TerrainType::ALL.iter().filter(|t| t.is_water()) {
            assert!(t.climate().is_none());
        }
    }

    #[test]
    fn test_flat_land_covers_whole_climate_space() {
        for temperature in -20..=40 {
            for step in 0..=100 {
                let humidity = step as f64 / 100.0;
                let covered = TerrainType::ALL
                    .iter()
                    .filter(|t| t.is_land() && !t.is_rugged())
                    .any(|t| t.accepts_climate(temperature, humidity));
                assert!(covered, "no terrain for {}° / {:.2}", temperature, humidity);
            }
        }
    }

    #[test]
    fn test_resource_values() {
        assert_eq!(BonusResource::SilverDeposit.value(), 12);
        assert_eq!(TerrainType::Hills.bonus_resource(), BonusResource::OreDeposit);
        assert_eq!(TerrainType::SeaLane.bonus_resource(), BonusResource::None);
    }
}
