//! Climate model: per-tile temperature and humidity
//! Based on latitude plus bounded uniform jitter

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::grid::Grid;
use crate::params::MapParameters;

// =============================================================================
// CLIMATE PARAMETERS
// =============================================================================

/// Coldest temperature any tile can have (°)
pub const MIN_TEMPERATURE: i32 = -20;

/// Hottest temperature any tile can have (°)
pub const MAX_TEMPERATURE: i32 = 40;

// =============================================================================
// LATITUDE CURVES
// =============================================================================

/// Temperature before jitter: pole temperature at |latitude| = 1, equator temperature at 0.
pub fn latitude_temperature(latitude: f64, pole: i32, equator: i32) -> f64 {
    let warmth = 1.0 - latitude.abs().min(1.0);
    pole as f64 + (equator - pole) as f64 * warmth
}

/// Humidity before jitter: a downward parabola in |latitude|, dry at the equator and
/// poles and wettest at mid-latitudes, where it peaks at `percentage`.
pub fn latitude_humidity(latitude: f64, percentage: f64) -> f64 {
    let l = latitude.abs().min(1.0);
    (4.0 * l - 4.0 * l * l) * percentage
}

// =============================================================================
// CLIMATE ASSIGNMENT
// =============================================================================

/// Fill in temperature and humidity for every tile.
///
/// Runs once, straight after the grid is allocated. Later stages only read these values.
pub fn assign_climate(grid: &mut Grid, params: &MapParameters, rng: &mut ChaCha8Rng) {
    let temperature_deviation = params.temperature_deviation as f64;
    let humidity_deviation = params.humidity_deviation;

    for tile in grid.tiles_mut() {
        let base_temperature =
            latitude_temperature(tile.latitude, params.pole_temperature, params.equator_temperature);
        let jitter = rng.gen_range(-temperature_deviation..=temperature_deviation);
        tile.temperature =
            ((base_temperature + jitter).round() as i32).clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);

        let base_humidity = latitude_humidity(tile.latitude, params.humidity);
        let jitter = rng.gen_range(-humidity_deviation..=humidity_deviation);
        tile.humidity = (base_humidity + jitter).clamp(0.0, 1.0);
    }

    tracing::debug!(
        tiles = grid.len(),
        pole = params.pole_temperature,
        equator = params.equator_temperature,
        humidity = params.humidity,
        "climate.assigned"
    );
}
