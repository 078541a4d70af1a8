//! Map generation parameters
//!
//! Named presets for size, landmass shape, climate and humidity, folded into one
//! immutable `MapParameters` value that is handed to the generator.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

// =============================================================================
// PRESETS
// =============================================================================

/// Map dimensions and number of landmasses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MapSize {
    #[default]
    VerySmall,
    Small,
    Medium,
    Large,
    VeryLarge,
}

impl MapSize {
    pub fn all() -> &'static [Self] {
        &[Self::VerySmall, Self::Small, Self::Medium, Self::Large, Self::VeryLarge]
    }

    /// (width, height, landmasses)
    pub fn dimensions(&self) -> (usize, usize, u32) {
        match self {
            Self::VerySmall => (40, 50, 1),
            Self::Small => (48, 60, 1),
            Self::Medium => (56, 70, 2),
            Self::Large => (64, 80, 3),
            Self::VeryLarge => (72, 90, 4),
        }
    }
}

/// Shape of the continent growth process
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Landmass {
    /// Many short-lived seeds, ~20% land
    Islands,
    /// Medium-lived seeds, ~35% land
    Archipelago,
    /// Long-lived seeds, ~65% land
    #[default]
    Continent,
}

impl Landmass {
    pub fn all() -> &'static [Self] {
        &[Self::Islands, Self::Archipelago, Self::Continent]
    }

    /// (seed multiplier, energy decay rate per step, max land fraction)
    pub fn profile(&self) -> (u32, f64, f64) {
        match self {
            Self::Islands => (20, 0.3, 0.2),
            Self::Archipelago => (20, 0.01, 0.35),
            Self::Continent => (20, 0.001, 0.65),
        }
    }
}

/// Pole and equator temperatures (°)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Climate {
    Cold,
    Cool,
    #[default]
    Temperate,
    Warm,
    Hot,
}

impl Climate {
    pub fn all() -> &'static [Self] {
        &[Self::Cold, Self::Cool, Self::Temperate, Self::Warm, Self::Hot]
    }

    /// (pole temperature, equator temperature)
    pub fn band(&self) -> (i32, i32) {
        match self {
            Self::Cold => (-20, 25),
            Self::Cool => (-20, 30),
            Self::Temperate => (-10, 35),
            Self::Warm => (-5, 40),
            Self::Hot => (0, 40),
        }
    }
}

/// Overall wetness of the map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Humidity {
    VeryDry,
    Arid,
    #[default]
    Normal,
    Wet,
    VeryWet,
}

impl Humidity {
    pub fn all() -> &'static [Self] {
        &[Self::VeryDry, Self::Arid, Self::Normal, Self::Wet, Self::VeryWet]
    }

    pub fn percentage(&self) -> f64 {
        match self {
            Self::VeryDry => 0.25,
            Self::Arid => 0.35,
            Self::Normal => 0.4,
            Self::Wet => 0.55,
            Self::VeryWet => 0.65,
        }
    }
}

macro_rules! preset_from_str {
    ($ty:ty, $($name:literal => $variant:expr),+ $(,)?) => {
        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
                    $($name => Ok($variant),)+
                    other => Err(format!("unknown {} preset '{}'", stringify!($ty), other)),
                }
            }
        }
    };
}

preset_from_str!(MapSize,
    "verysmall" => MapSize::VerySmall,
    "small" => MapSize::Small,
    "medium" => MapSize::Medium,
    "large" => MapSize::Large,
    "verylarge" => MapSize::VeryLarge,
);

preset_from_str!(Landmass,
    "islands" => Landmass::Islands,
    "archipelago" => Landmass::Archipelago,
    "continent" => Landmass::Continent,
);

preset_from_str!(Climate,
    "cold" => Climate::Cold,
    "cool" => Climate::Cool,
    "temperate" => Climate::Temperate,
    "warm" => Climate::Warm,
    "hot" => Climate::Hot,
);

preset_from_str!(Humidity,
    "verydry" => Humidity::VeryDry,
    "arid" => Humidity::Arid,
    "normal" => Humidity::Normal,
    "wet" => Humidity::Wet,
    "verywet" => Humidity::VeryWet,
);

// =============================================================================
// PARAMETERS
// =============================================================================

/// Everything the generator reads. Owns no per-tile state and is never mutated
/// during generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapParameters {
    pub width: usize,
    pub height: usize,
    /// Target number of landmasses
    pub landmasses: u32,

    /// Continent seeds per landmass
    pub landmass_multiplier: u32,
    /// Fraction of growth energy lost per step
    pub landmass_decay: f64,
    /// Land stops growing past this fraction of the map
    pub max_land: f64,
    /// Seed energy is drawn from [0, max_energy)
    pub max_energy: f64,

    pub pole_temperature: i32,
    pub equator_temperature: i32,
    /// Uniform temperature jitter, ± degrees
    pub temperature_deviation: i32,
    /// Humidity scale, also the peak humidity at mid-latitudes
    pub humidity: f64,
    /// Uniform humidity jitter, ±
    pub humidity_deviation: f64,
    /// Chance a tile with a forested option becomes forest
    pub forest_cover: f64,

    /// Fraction of the width kept free of continent seeds on each side
    pub min_edge: f64,
    /// Rows at each pole leveled to plains when land reaches them
    pub pole_margin: usize,

    pub min_mountains_elevation: f64,
    pub min_hills_elevation: f64,
    /// Exponent applied to |noise| when deriving elevation
    pub elevation_exponent: f64,

    /// Rivers per land tile
    pub base_river_amount: f64,
    /// Sources must be wetter than this
    pub min_river_humidity: f64,

    /// Ancient ruins per land tile
    pub ruin_density: f64,
    pub ruin_spacing: usize,
    /// Bonus resources per land tile
    pub resource_density: f64,
    pub resource_spacing: usize,
}

impl Default for MapParameters {
    fn default() -> Self {
        Self::from_presets(
            MapSize::default(),
            Landmass::default(),
            Climate::default(),
            Humidity::default(),
        )
    }
}

impl MapParameters {
    pub fn from_presets(size: MapSize, landmass: Landmass, climate: Climate, humidity: Humidity) -> Self {
        let (width, height, landmasses) = size.dimensions();
        let (landmass_multiplier, landmass_decay, max_land) = landmass.profile();
        let (pole_temperature, equator_temperature) = climate.band();
        let humidity = humidity.percentage();

        Self {
            width,
            height,
            landmasses,
            landmass_multiplier,
            landmass_decay,
            max_land,
            max_energy: 100.0,
            pole_temperature,
            equator_temperature,
            temperature_deviation: 7,
            humidity,
            humidity_deviation: 0.1,
            forest_cover: humidity * 0.5,
            min_edge: 0.15,
            pole_margin: 2,
            min_mountains_elevation: 0.75,
            min_hills_elevation: 0.65,
            elevation_exponent: 0.25,
            base_river_amount: 0.015,
            min_river_humidity: 0.2,
            ruin_density: 0.01,
            ruin_spacing: 10,
            resource_density: 0.04,
            resource_spacing: 3,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let params: MapParameters =
            serde_json::from_str(text).map_err(|e| GenerationError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GenerationError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn total_tiles(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Number of continent seeds planted by the growth engine
    pub fn seed_count(&self) -> usize {
        (self.landmasses as usize).saturating_mul(self.landmass_multiplier as usize)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(GenerationError::InvalidParameters(msg));

        if self.width < 3 || self.height < 3 {
            return invalid(format!("map must be at least 3x3, got {}x{}", self.width, self.height));
        }
        if self.landmasses == 0 || self.landmass_multiplier == 0 {
            return invalid("at least one continent seed is required".to_string());
        }
        if self.seed_count() > self.total_tiles() {
            return invalid(format!(
                "{} x {} continent seeds do not fit on {} tiles",
                self.landmasses,
                self.landmass_multiplier,
                self.total_tiles()
            ));
        }
        for (name, value) in [
            ("landmass_decay", self.landmass_decay),
            ("max_land", self.max_land),
            ("humidity", self.humidity),
            ("humidity_deviation", self.humidity_deviation),
            ("forest_cover", self.forest_cover),
            ("min_mountains_elevation", self.min_mountains_elevation),
            ("min_hills_elevation", self.min_hills_elevation),
            ("base_river_amount", self.base_river_amount),
            ("min_river_humidity", self.min_river_humidity),
            ("ruin_density", self.ruin_density),
            ("resource_density", self.resource_density),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{} must lie in [0, 1], got {}", name, value));
            }
        }
        if !(0.0..0.5).contains(&self.min_edge) {
            return invalid(format!("min_edge must lie in [0, 0.5), got {}", self.min_edge));
        }
        if self.max_energy <= 0.0 {
            return invalid(format!("max_energy must be positive, got {}", self.max_energy));
        }
        if self.elevation_exponent <= 0.0 {
            return invalid(format!(
                "elevation_exponent must be positive, got {}",
                self.elevation_exponent
            ));
        }
        if self.pole_temperature > self.equator_temperature {
            return invalid(format!(
                "pole temperature {} is above equator temperature {}",
                self.pole_temperature, self.equator_temperature
            ));
        }
        if self.temperature_deviation < 0 {
            return invalid("temperature_deviation must not be negative".to_string());
        }
        if self.min_hills_elevation > self.min_mountains_elevation {
            return invalid(format!(
                "hills threshold {} is above mountains threshold {}",
                self.min_hills_elevation, self.min_mountains_elevation
            ));
        }
        if self.pole_margin * 2 >= self.height {
            return invalid(format!(
                "pole margin {} leaves no room on a map {} rows high",
                self.pole_margin, self.height
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_very_small_continent() {
        let params = MapParameters::default();
        assert_eq!((params.width, params.height, params.landmasses), (40, 50, 1));
        assert_eq!(params.max_land, 0.65);
        assert_eq!(params.forest_cover, 0.2);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_all_presets_validate() {
        for &size in MapSize::all() {
            for &landmass in Landmass::all() {
                for &climate in Climate::all() {
                    for &humidity in Humidity::all() {
                        let params = MapParameters::from_presets(size, landmass, climate, humidity);
                        assert!(params.validate().is_ok(), "{:?}", params);
                    }
                }
            }
        }
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("very-small".parse::<MapSize>(), Ok(MapSize::VerySmall));
        assert_eq!("VeryWet".parse::<Humidity>(), Ok(Humidity::VeryWet));
        assert_eq!("archipelago".parse::<Landmass>(), Ok(Landmass::Archipelago));
        assert!("boiling".parse::<Climate>().is_err());
    }

    #[test]
    fn test_json_fills_missing_fields() {
        let params = MapParameters::from_json_str(r#"{ "width": 30, "height": 20 }"#)
            .expect("partial config should load");
        assert_eq!(params.width, 30);
        assert_eq!(params.height, 20);
        assert_eq!(params.min_edge, MapParameters::default().min_edge);
    }

    #[test]
    fn test_huge_seed_counts_are_rejected() {
        let text = r#"{ "landmasses": 4294967295, "landmass_multiplier": 4294967295 }"#;
        assert!(matches!(
            MapParameters::from_json_str(text),
            Err(GenerationError::InvalidParameters(_))
        ));

        let mut params = MapParameters::default();
        params.landmasses = u32::MAX;
        params.landmass_multiplier = u32::MAX;
        assert!(params.seed_count() >= u32::MAX as usize);
        assert!(crate::world::generate_world(&params, 1).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut params = MapParameters::default();
        params.min_hills_elevation = 0.9;
        assert!(matches!(params.validate(), Err(GenerationError::InvalidParameters(_))));

        let mut params = MapParameters::default();
        params.width = 0;
        assert!(params.validate().is_err());

        assert!(matches!(
            MapParameters::from_json_str("{ not json"),
            Err(GenerationError::Config(_))
        ));
    }
}
