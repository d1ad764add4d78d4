//! Render a noise generator through the plane map builder to a PNG.

use std::error::Error;

use clap::{Parser, ValueEnum};
use noise::NoiseFn;
use tracing_subscriber::EnvFilter;

use tile_terrain::export::export_noise_map;
use tile_terrain::noise::{NoiseQuality, Perlin, PlaneMapBuilder, RidgedMulti};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Generator {
    Perlin,
    Ridged,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Quality {
    Fast,
    Standard,
    Best,
}

#[derive(Parser, Debug)]
#[command(name = "noise_preview")]
#[command(about = "Preview coherent noise generators as images")]
struct Args {
    #[arg(long, value_enum, default_value = "perlin")]
    generator: Generator,

    /// Noise seed
    #[arg(short, long, default_value = "0")]
    seed: i32,

    #[arg(long, default_value = "6")]
    octaves: usize,

    #[arg(long, default_value = "1.0")]
    frequency: f64,

    #[arg(long, default_value = "2.0")]
    lacunarity: f64,

    /// Perlin only
    #[arg(long, default_value = "0.5")]
    persistence: f64,

    #[arg(long, value_enum, default_value = "standard")]
    quality: Quality,

    /// Image size in pixels
    #[arg(long, default_value = "256")]
    size: usize,

    /// Sample bounds: lower_x lower_y upper_x upper_y
    #[arg(long, num_args = 4, default_values_t = [0.0, 0.0, 4.0, 4.0])]
    bounds: Vec<f64>,

    /// Blend edges so the image tiles
    #[arg(long)]
    seamless: bool,

    #[arg(short, long, default_value = "noise.png")]
    output: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let quality = match args.quality {
        Quality::Fast => NoiseQuality::Fast,
        Quality::Standard => NoiseQuality::Standard,
        Quality::Best => NoiseQuality::Best,
    };

    let source: Box<dyn NoiseFn<f64, 3> + Sync> = match args.generator {
        Generator::Perlin => Box::new(
            Perlin::new(args.seed)
                .with_frequency(args.frequency)
                .with_lacunarity(args.lacunarity)
                .with_persistence(args.persistence)
                .with_quality(quality)
                .with_octaves(args.octaves)?,
        ),
        Generator::Ridged => Box::new(
            RidgedMulti::new(args.seed)
                .with_frequency(args.frequency)
                .with_lacunarity(args.lacunarity)
                .with_quality(quality)
                .with_octaves(args.octaves)?,
        ),
    };

    let [lower_x, lower_y, upper_x, upper_y] = args.bounds[..] else {
        return Err("bounds takes exactly four values".into());
    };

    println!("Building {}x{} {:?} noise map (seed {})...", args.size, args.size, args.generator, args.seed);
    let map = PlaneMapBuilder::new()
        .set_source(source.as_ref())
        .set_size(args.size, args.size)
        .set_bounds(lower_x, lower_y, upper_x, upper_y)
        .set_seamless(args.seamless)
        .build()?;

    let (lo, hi) = map.min_max();
    println!("Value range: {:.4} to {:.4}", lo, hi);

    export_noise_map(&map, &args.output)?;
    println!("Saved {}", args.output);
    Ok(())
}
