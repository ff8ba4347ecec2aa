/// Texture and scene manifest baker entry point
mod baker;
mod constants;
mod heightmap;
mod manifest;
mod png_writer;
mod tileable;

use baker::TextureBaker;
use crate::constants::{DEFAULT_RESOLUTION, MIN_RESOLUTION};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <output_dir> [resolution]", args[0]);
        std::process::exit(1);
    }

    let resolution = match args.get(2) {
        Some(value) => value.parse::<u32>()?,
        None => DEFAULT_RESOLUTION,
    };
    if resolution < MIN_RESOLUTION {
        eprintln!("Resolution must be at least {MIN_RESOLUTION}, got {resolution}");
        std::process::exit(1);
    }

    TextureBaker::new(&args[1], resolution).bake()?;

    Ok(())
}
