//! Errors that abort map generation.

/// Fatal generation failures. A failed generation leaves no usable map behind;
/// callers discard it and may retry with another seed.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Parameters rejected before generation started
    InvalidParameters(String),
    /// Parameter file could not be read or parsed
    Config(String),
    /// No catalog terrain accepts this tile's climate
    NoEligibleTerrain {
        x: usize,
        y: usize,
        temperature: i32,
        humidity: f64,
    },
    /// Spread-out placement could not reach the requested count even at distance 1
    PlacementInfeasible { requested: usize, placed: usize },
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::InvalidParameters(e) => write!(f, "Invalid map parameters: {}", e),
            GenerationError::Config(e) => write!(f, "Config error: {}", e),
            GenerationError::NoEligibleTerrain {
                x,
                y,
                temperature,
                humidity,
            } => write!(
                f,
                "No terrain type accepts tile ({}, {}) with temperature {}° and humidity {:.2}",
                x, y, temperature, humidity
            ),
            GenerationError::PlacementInfeasible { requested, placed } => write!(
                f,
                "Couldn't choose suitable tiles: requested {}, placed {} at minimum distance 1",
                requested, placed
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

pub type Result<T> = std::result::Result<T, GenerationError>;
