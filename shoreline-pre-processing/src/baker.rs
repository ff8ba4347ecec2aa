/// Bakes every input texture the render engine loads, then the manifest naming them.
use crate::constants::{
    FOAM_CELLS, FOAM_SEED, NOISE_LATTICE_CELLS, NOISE_OCTAVES, NOISE_SEED, SCENE_DIR, TEXTURE_DIR,
    WATER_PATTERN_CELLS, WATER_PATTERN_SEED,
};
use crate::heightmap::sine_terrain_rgba;
use crate::manifest::{SceneManifest, TerrainInfo, TerrainSource, WaterTextureFiles};
use crate::png_writer::{write_grey_png, write_rg_png, write_rgba8_png};
use crate::tileable::{fractal_noise, render_tile, worley};
use constants::world::{
    FOAM_TEXTURE_PATH, NOISE_TEXTURE_PATH, SCENE_MANIFEST_PATH, TERRAIN_TEXTURE_PATH,
    WATER_PATTERN_TEXTURE_PATH,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Width of the bright bands between water pattern cells, in cell units.
const WATER_PATTERN_EDGE_WIDTH: f32 = 0.12;

pub struct TextureBaker {
    output_dir: PathBuf,
    resolution: u32,
}

impl TextureBaker {
    pub fn new(output_dir: &str, resolution: u32) -> Self {
        Self {
            output_dir: PathBuf::from(output_dir),
            resolution,
        }
    }

    pub fn bake(&self) -> Result<(), Box<dyn std::error::Error>> {
        let start = Instant::now();
        fs::create_dir_all(self.output_dir.join(TEXTURE_DIR))?;
        fs::create_dir_all(self.output_dir.join(SCENE_DIR))?;

        println!(
            "Baking {}x{} textures into {}",
            self.resolution,
            self.resolution,
            self.output_dir.display()
        );

        let steps: [(&str, fn(&Self) -> Result<(), Box<dyn std::error::Error>>); 5] = [
            ("terrain", Self::bake_terrain),
            ("noise", Self::bake_noise),
            ("water pattern", Self::bake_water_pattern),
            ("foam", Self::bake_foam),
            ("manifest", Self::write_manifest),
        ];

        let pb = ProgressBar::new(steps.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} outputs ({percent}%) {msg}")?
                .progress_chars("▉▊▋▌▍▎▏ "),
        );
        for (name, step) in steps {
            pb.set_message(name);
            step(self)?;
            pb.inc(1);
        }
        pb.finish_with_message("done");

        println!("Bake complete in {:.2?}", start.elapsed());
        Ok(())
    }

    fn asset_path(&self, relative: &str) -> PathBuf {
        self.output_dir.join(relative)
    }

    fn bake_terrain(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.asset_path(TERRAIN_TEXTURE_PATH);
        write_rgba8_png(&path, self.resolution, &sine_terrain_rgba(self.resolution))?;
        report(&path, "RGBA8 elevation + terrain type");
        Ok(())
    }

    /// Two decorrelated fractal noise fields in red and green, used to push the pattern uvs.
    fn bake_noise(&self) -> Result<(), Box<dyn std::error::Error>> {
        let field = |seed: u32| {
            render_tile(self.resolution, |u, v| {
                fractal_noise(u, v, NOISE_LATTICE_CELLS, NOISE_OCTAVES, seed)
            })
        };
        let path = self.asset_path(NOISE_TEXTURE_PATH);
        write_rg_png(&path, self.resolution, &field(NOISE_SEED), &field(NOISE_SEED ^ 0xffff))?;
        report(&path, "RG8 tiling noise");
        Ok(())
    }

    /// Bright bands along Worley cell borders, read as highlight and shadow masks.
    fn bake_water_pattern(&self) -> Result<(), Box<dyn std::error::Error>> {
        let values = render_tile(self.resolution, |u, v| {
            let (nearest, second) = worley(u, v, WATER_PATTERN_CELLS, WATER_PATTERN_SEED);
            1.0 - ((second - nearest) / WATER_PATTERN_EDGE_WIDTH).clamp(0.0, 1.0)
        });
        let path = self.asset_path(WATER_PATTERN_TEXTURE_PATH);
        write_grey_png(&path, self.resolution, &values)?;
        report(&path, "R8 tiling water pattern");
        Ok(())
    }

    /// Distance to the nearest Worley feature: foam appears at cell centres
    /// first and spreads outward as the water shallows.
    fn bake_foam(&self) -> Result<(), Box<dyn std::error::Error>> {
        let values = render_tile(self.resolution, |u, v| {
            let (nearest, _) = worley(u, v, FOAM_CELLS, FOAM_SEED);
            (nearest / std::f32::consts::SQRT_2).clamp(0.0, 1.0)
        });
        let path = self.asset_path(FOAM_TEXTURE_PATH);
        write_grey_png(&path, self.resolution, &values)?;
        report(&path, "R8 tiling foam");
        Ok(())
    }

    fn write_manifest(&self) -> Result<(), Box<dyn std::error::Error>> {
        let manifest = SceneManifest {
            terrain: TerrainInfo {
                source: TerrainSource::Image {
                    path: TERRAIN_TEXTURE_PATH.to_string(),
                },
            },
            textures: WaterTextureFiles {
                noise: NOISE_TEXTURE_PATH.to_string(),
                water_pattern: WATER_PATTERN_TEXTURE_PATH.to_string(),
                foam: FOAM_TEXTURE_PATH.to_string(),
            },
        };
        let path = self.asset_path(SCENE_MANIFEST_PATH);
        manifest.write(&path)?;
        report(&path, "scene manifest");
        Ok(())
    }
}

fn report(path: &Path, description: &str) {
    println!("Saved {} ({})", path.display(), description);
}
