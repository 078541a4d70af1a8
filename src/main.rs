use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use colonial_map::ascii::{self, AsciiMode};
use colonial_map::params::{Climate, Humidity, Landmass, MapParameters, MapSize};
use colonial_map::world::generate_world;

#[derive(Parser, Debug)]
#[command(name = "colonial_map")]
#[command(about = "Generate colonial-era strategy maps with continents, lakes, biomes and rivers")]
struct Args {
    /// Map size preset (very-small, small, medium, large, very-large)
    #[arg(long, default_value = "very-small")]
    size: MapSize,

    /// Landmass preset (islands, archipelago, continent)
    #[arg(long, default_value = "continent")]
    landmass: Landmass,

    /// Climate preset (cold, cool, temperate, warm, hot)
    #[arg(long, default_value = "temperate")]
    climate: Climate,

    /// Humidity preset (very-dry, arid, normal, wet, very-wet)
    #[arg(long, default_value = "normal")]
    humidity: Humidity,

    /// Override the preset width in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Override the preset height in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Load all parameters from a JSON file instead of the presets
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the map in this mode (terrain, elevation, temperature, humidity, continents)
    #[arg(long)]
    ascii: Option<AsciiMode>,

    /// Export the map, statistics and legend to a text file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Include per-tile data in the export
    #[arg(long)]
    verbose: bool,

    /// Log filter, e.g. "debug" or "colonial_map=trace" (default: RUST_LOG, then info)
    #[arg(long)]
    log: Option<String>,
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log.as_deref());

    let mut params = match &args.config {
        Some(path) => match MapParameters::from_json_file(path) {
            Ok(params) => params,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => MapParameters::from_presets(args.size, args.landmass, args.climate, args.humidity),
    };
    if let Some(width) = args.width {
        params.width = width;
    }
    if let Some(height) = args.height {
        params.height = height;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("Generating map with seed: {}", seed);
    println!("Map size: {}x{}", params.width, params.height);

    let world = match generate_world(&params, seed) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("Map generation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stats = world.stats();
    let total = stats.tiles.max(1) as f64;
    println!(
        "Land: {} tiles ({:.1}%) on {} continents",
        stats.land,
        100.0 * stats.land as f64 / total,
        stats.continents
    );
    println!("Ocean: {} tiles, lakes: {} tiles, coast: {} tiles", stats.ocean, stats.lakes, stats.coast);
    println!(
        "Rivers: {} ({} tiles), ruins: {}, bonus resources: {}",
        world.report.rivers.rivers, stats.rivers, stats.ruins, stats.resources
    );

    if let Some(mode) = args.ascii {
        println!();
        print!("{}", ascii::render_ascii_map(&world, mode));
        if mode == AsciiMode::Terrain {
            println!();
            print!("{}", ascii::terrain_legend());
        }
    }

    if let Some(path) = &args.export {
        if let Err(e) = ascii::export_world_file(&world, path, args.verbose) {
            eprintln!("Failed to export {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        println!("Exported map to {}", path.display());
    }

    ExitCode::SUCCESS
}
