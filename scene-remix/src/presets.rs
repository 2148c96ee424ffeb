//! Built-in scenes for the login screen backgrounds.
//!
//! Directories are relative and get anchored at the config root.

use crate::{
    manifest::{Composition, ManifestEntry, Scene},
    recipe::Recipe,
};
use std::path::PathBuf;

pub const DEFAULT_RUN: &[&str] = &[EMBER_HIGHLANDS, FROSTFIRE_LAYERED];

pub const EMBER_HIGHLANDS: &str = "magaari-ember-highlands";
pub const FROSTFIRE: &str = "frostfire";
pub const FROSTFIRE_LAYERED: &str = "frostfire-layered";
pub const FROSTFIRE_FOREST: &str = "frostfire-forest";

const BACKUP_DIR: &str = "backup_originals/scenes";
const DEPLOY_DIR: &str = "dist/src/resources/scenes";
const FOREST_PACK_DIR: &str = "assets/parallax-forest-blue";

const FOREST_SIZE: [u32; 2] = [1600, 900];
const FOREST_SIZE_2X: [u32; 2] = [3200, 1800];
const FOREST_SKY_FALLBACK: [u8; 3] = [200, 230, 240];

pub fn all() -> Vec<Scene> {
    vec![
        ember_highlands(),
        frostfire(),
        frostfire_layered(),
        frostfire_forest(),
    ]
}

fn scene(name: &str, dir: &str) -> Scene {
    Scene {
        name: name.to_string(),
        source_dir: PathBuf::from(BACKUP_DIR).join(dir),
        output_dir: PathBuf::from(DEPLOY_DIR).join(dir),
        layer_dir: None,
        compositions: Vec::new(),
        entries: Vec::new(),
    }
}

/// Base name plus its `@2x` variant with the same extension.
fn with_retina(file: &str) -> [String; 2] {
    match file.rsplit_once('.') {
        Some((stem, ext)) => [file.to_string(), format!("{stem}@2x.{ext}")],
        None => [file.to_string(), format!("{file}@2x")],
    }
}

/// One recipe for every layer, vignettes only follow the flip.
fn uniform_entries(files: &[&str], recipe: &Recipe) -> Vec<ManifestEntry> {
    files
        .iter()
        .map(|file| {
            if file.contains("vignette") {
                ManifestEntry::transform(*file, recipe.flip_only())
            } else {
                ManifestEntry::transform(*file, recipe.clone())
            }
        })
        .collect()
}

pub fn ember_highlands() -> Scene {
    let recipe = Recipe {
        hue_shift: 0.15,
        saturation: 1.1,
        flip: true,
        ..Recipe::default()
    };

    let files = [
        "magaari_ember_highlands_background.jpg",
        "magaari_ember_highlands_background@2x.jpg",
        "magaari_ember_highlands_middleground.png",
        "magaari_ember_highlands_middleground@2x.png",
        "magaari_ember_highlands_foreground.png",
        "magaari_ember_highlands_foreground@2x.png",
        "magaari_ember_highlands_trees_001.png",
        "magaari_ember_highlands_trees_001@2x.png",
        "magaari_ember_highlands_trees_002.png",
        "magaari_ember_highlands_trees_002@2x.png",
        "magaari_ember_highlands_light_ray.jpg",
        "magaari_ember_highlands_vignette.png",
    ];

    Scene {
        entries: uniform_entries(&files, &recipe),
        ..scene(EMBER_HIGHLANDS, "magaari_ember_highlands")
    }
}

pub fn frostfire() -> Scene {
    let recipe = Recipe {
        hue_shift: 0.12,
        saturation: 1.15,
        flip: true,
        ..Recipe::default()
    };

    let files = [
        "background.jpg",
        "background@2x.jpg",
        "pillars_far.png",
        "pillars_far@2x.png",
        "pillars_near.png",
        "pillars_near@2x.png",
        "foreground.png",
        "foreground@2x.png",
        "vignette.png",
    ];

    Scene {
        entries: uniform_entries(&files, &recipe),
        ..scene(FROSTFIRE, "frostfire")
    }
}

/// Per-layer recipes: some layers mirrored, some not, each with its own
/// colour treatment.
pub fn frostfire_layered() -> Scene {
    let layers = [
        (
            "background.jpg",
            Recipe {
                hue_shift: -0.08,
                temperature: -0.3,
                saturation: 1.15,
                flip: true,
                ..Recipe::default()
            },
        ),
        (
            "pillars_far.png",
            Recipe {
                hue_shift: 0.03,
                temperature: -0.15,
                ..Recipe::default()
            },
        ),
        (
            "pillars_near.png",
            Recipe {
                hue_shift: 0.02,
                temperature: 0.1,
                saturation: 1.1,
                flip: true,
                ..Recipe::default()
            },
        ),
        (
            "foreground.png",
            Recipe {
                hue_shift: 0.01,
                temperature: 0.2,
                contrast: 1.08,
                ..Recipe::default()
            },
        ),
    ];

    let mut entries: Vec<ManifestEntry> = layers
        .iter()
        .flat_map(|(file, recipe)| {
            with_retina(file).map(|name| ManifestEntry::transform(name, recipe.clone()))
        })
        .collect();

    entries.push(ManifestEntry::reencode("vignette.png"));

    let particles = [
        "lantern_large_1.png",
        "lantern_large_2.png",
        "lantern_large_3.png",
        "lantern_small.png",
        "lanterns_large_1.plist",
        "lanterns_large_2.plist",
        "lanterns_large_3.plist",
        "lanterns_small.plist",
        "stars.plist",
    ];
    entries.extend(particles.into_iter().map(ManifestEntry::copy));

    Scene {
        entries,
        ..scene(FROSTFIRE_LAYERED, "frostfire")
    }
}

/// Replaces the frostfire layers with a ten layer parallax forest merged
/// down to the four layers the scene expects.
pub fn frostfire_forest() -> Scene {
    let groups: [(&str, &[&str], Option<[u8; 3]>); 4] = [
        (
            "background.jpg",
            &["10_Sky.png", "09_Forest.png", "08_Forest.png", "07_Forest.png"],
            Some(FOREST_SKY_FALLBACK),
        ),
        ("pillars_far.png", &["06_Forest.png"], None),
        ("pillars_near.png", &["05_Particles.png", "04_Forest.png"], None),
        (
            "foreground.png",
            &["03_Particles.png", "02_Bushes.png", "01_Mist.png"],
            None,
        ),
    ];

    let mut compositions = Vec::new();
    for (output, layers, background) in groups {
        let [base, retina] = with_retina(output);
        for (name, size) in [(base, FOREST_SIZE), (retina, FOREST_SIZE_2X)] {
            compositions.push(Composition {
                output: name,
                layers: layers.iter().map(|layer| layer.to_string()).collect(),
                size: Some(size),
                background,
            });
        }
    }

    Scene {
        layer_dir: Some(PathBuf::from(FOREST_PACK_DIR)),
        compositions,
        entries: vec![ManifestEntry::copy("vignette.png")],
        ..scene(FROSTFIRE_FOREST, "frostfire")
    }
}
