use std::error::Error;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tile_terrain::config::WorldConfig;
use tile_terrain::export;
use tile_terrain::terrain::{MountainNoise, TerrainType};
use tile_terrain::verify::{verify_seams, SeamStatus};
use tile_terrain::world::{RevealOrder, World};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Order {
    RowMajor,
    Shuffled,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mountains {
    Perlin,
    Ridged,
}

#[derive(Parser, Debug)]
#[command(name = "tile_terrain")]
#[command(about = "Generate a seamless tile terrain world and check its seams")]
struct Args {
    /// JSON config file; command line flags override its fields
    #[arg(short, long)]
    config: Option<String>,

    /// Width of the world in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the world in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the terrain layout seed
    #[arg(long)]
    terrain_seed: Option<u64>,

    /// Override the per-tile noise seed, keeping the layout
    #[arg(long)]
    tile_seed: Option<u64>,

    /// Override the shuffled reveal order seed
    #[arg(long)]
    reveal_seed: Option<u64>,

    /// Land resolution knob (1-10)
    #[arg(long)]
    map_quality: Option<u32>,

    /// Ocean resolution knob (1-10)
    #[arg(long)]
    water_quality: Option<u32>,

    /// Fractal used for mountain tiles
    #[arg(long, value_enum)]
    mountains: Option<Mountains>,

    /// Order in which tiles are revealed
    #[arg(long, value_enum, default_value = "row-major")]
    order: Order,

    /// Generate raw heightmaps for all tiles in parallel before revealing
    #[arg(long)]
    pregenerate: bool,

    /// Export the stitched world to a PNG
    #[arg(short, long)]
    output: Option<String>,

    /// Pixels per tile side in the exported PNG
    #[arg(long, default_value = "16")]
    pixels_per_tile: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if args.terrain_seed.is_some() {
        config.terrain_seed = args.terrain_seed;
    }
    if args.tile_seed.is_some() {
        config.tile_seed = args.tile_seed;
    }
    if args.reveal_seed.is_some() {
        config.reveal_seed = args.reveal_seed;
    }
    if let Some(q) = args.map_quality {
        config.quality.map_quality = q;
    }
    if let Some(q) = args.water_quality {
        config.quality.water_quality = q;
    }
    if let Some(m) = args.mountains {
        config.profile.mountain_noise = match m {
            Mountains::Perlin => MountainNoise::Perlin,
            Mountains::Ridged => MountainNoise::Ridged,
        };
    }
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);
    config.validate()?;

    println!("Generating tile world with seed: {}", seed);
    println!("{}", config.world_seeds(seed));
    println!("World size: {}x{} tiles", config.width, config.height);
    println!(
        "Quality: map {} / water {}",
        config.quality.map_quality, config.quality.water_quality
    );
    for terrain in TerrainType::ALL {
        println!("  {:<10} {} faces per side", terrain.name(), config.quality.face_count(terrain));
    }

    let mut world = World::new(&config)?;
    for terrain in TerrainType::ALL {
        let count = world.tiles().filter(|t| t.terrain == terrain).count();
        println!("  {:<10} {} tiles", terrain.name(), count);
    }

    if args.pregenerate {
        println!("Pre-generating raw heightmaps...");
        let start = Instant::now();
        let generated = world.pregenerate()?;
        println!("Generated {} heightmaps in {:.2?}", generated, start.elapsed());
    }

    println!("Revealing tiles...");
    let order = match args.order {
        Order::RowMajor => RevealOrder::RowMajor,
        Order::Shuffled => RevealOrder::Shuffled,
    };
    let start = Instant::now();
    let stitched = world.reveal_all(order)?;
    println!(
        "Stitched in {:.2?}: {} corners copied, {} edges merged, {} edges pre-smoothed",
        start.elapsed(),
        stitched.corners_copied,
        stitched.edges_merged,
        stitched.edges_presmoothed
    );

    let report = verify_seams(&world);
    print!("{}", report.format());

    if let Some(path) = &args.output {
        println!("Exporting world heightmap to {}...", path);
        export::export_world_heightmap(&world, args.pixels_per_tile, path)?;
    }

    if report.status == SeamStatus::Failed {
        println!("Seam verification found {} mismatches", report.issues.len());
    }

    println!("Done!");
    Ok(())
}
