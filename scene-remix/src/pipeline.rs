use crate::{
    codec,
    manifest::{Action, Composition, ManifestEntry, Scene},
};
use anyhow::{Context, Result};
use image::{DynamicImage, Rgb};
use log::{info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Files touched by one scene run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SceneReport {
    /// Decoded and encoded again, with or without effects.
    pub written: Vec<PathBuf>,

    pub copied: Vec<PathBuf>,

    /// Inputs that were missing, or compositions with a missing layer.
    pub skipped: Vec<PathBuf>,
}

impl SceneReport {
    pub fn processed(&self) -> usize {
        self.written.len() + self.copied.len()
    }
}

/// Runs every composition then every manifest entry of `scene`.
///
/// Missing sources are logged and skipped. Decode, effect and encode
/// failures abort the scene.
pub fn run_scene(scene: &Scene) -> Result<SceneReport> {
    info!("remixing scene `{}`", scene.name);
    info!("  source: {}", scene.source_dir.display());
    info!("  output: {}", scene.output_dir.display());

    fs::create_dir_all(&scene.output_dir)
        .with_context(|| format!("create {} failed", scene.output_dir.display()))?;

    let mut report = SceneReport::default();

    for composition in &scene.compositions {
        run_composition(scene, composition, &mut report)?;
    }

    for entry in &scene.entries {
        run_entry(scene, entry, &mut report)?;
    }

    info!(
        "scene `{}` done: {} written, {} copied, {} skipped",
        scene.name,
        report.written.len(),
        report.copied.len(),
        report.skipped.len()
    );
    Ok(report)
}

fn run_composition(
    scene: &Scene,
    composition: &Composition,
    report: &mut SceneReport,
) -> Result<()> {
    let output = scene.output_dir.join(&composition.output);
    let layers: Vec<PathBuf> = composition
        .layers
        .iter()
        .map(|layer| scene.layer_dir().join(layer))
        .collect();

    if let Some(missing) = layers.iter().find(|path| !path.exists()) {
        warn!(
            "skip {}: layer {} not found",
            composition.output,
            missing.display()
        );
        report.skipped.push(output);
        return Ok(());
    }

    info!(
        "compositing {} from {} layers",
        composition.output,
        layers.len()
    );

    let size = composition.size.map(|[width, height]| (width, height));
    let merged = layer_compositor::combine_layers(&layers, size)
        .with_context(|| format!("composite {} failed", composition.output))?;

    let image = match composition.background {
        Some(background) => {
            DynamicImage::ImageRgb8(layer_compositor::flatten(&merged, Rgb(background)))
        }
        None => DynamicImage::ImageRgba8(merged),
    };

    save(&image, &output)?;
    report.written.push(output);
    Ok(())
}

fn run_entry(scene: &Scene, entry: &ManifestEntry, report: &mut SceneReport) -> Result<()> {
    let input = scene.source_dir.join(&entry.input);
    let output = scene.output_dir.join(entry.output_name());

    if !input.exists() {
        warn!("skip {}: not found", input.display());
        report.skipped.push(input);
        return Ok(());
    }

    match &entry.action {
        Action::Transform(recipe) => {
            info!("processing {}", entry.input);
            let mut image = codec::load_image(&input)?;
            if recipe.is_identity() {
                info!("    - no colour work, re-encoding only");
            }
            recipe
                .apply(&mut image)
                .with_context(|| format!("remix {} failed", input.display()))?;
            save(&image, &output)?;
            report.written.push(output);
        }
        Action::Reencode => {
            info!("re-encoding {}", entry.input);
            let image = codec::load_image(&input)?;
            save(&image, &output)?;
            report.written.push(output);
        }
        Action::Copy => {
            info!("copying {}", entry.input);
            fs::copy(&input, &output).with_context(|| {
                format!("copy {} to {} failed", input.display(), output.display())
            })?;
            report.copied.push(output);
        }
    }

    Ok(())
}

fn save(image: &DynamicImage, output: &Path) -> Result<()> {
    codec::save_image(image, output)?;
    info!("  saved {}", output.display());
    Ok(())
}
