use crate::recipe::Recipe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What to do with one manifest entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// Decode, apply the recipe, encode to the output format.
    Transform(Recipe),

    /// Decode and encode again without touching the pixels.
    Reencode,

    /// Byte-for-byte copy.
    Copy,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub input: String,

    /// Defaults to the input file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    #[serde(flatten)]
    pub action: Action,
}

impl ManifestEntry {
    pub fn transform(input: impl Into<String>, recipe: Recipe) -> Self {
        Self {
            input: input.into(),
            output: None,
            action: Action::Transform(recipe),
        }
    }

    pub fn reencode(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: None,
            action: Action::Reencode,
        }
    }

    pub fn copy(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: None,
            action: Action::Copy,
        }
    }

    pub fn output_name(&self) -> &str {
        self.output.as_deref().unwrap_or(&self.input)
    }
}

/// Several source layers merged into one output file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Composition {
    pub output: String,

    /// Back to front.
    pub layers: Vec<String>,

    /// `[width, height]` every layer is resampled to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[u32; 2]>,

    /// Solid colour the result is flattened onto before saving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<[u8; 3]>,
}

/// A named set of layered background assets that are remixed together.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,

    /// Pristine copies of the assets, never written to.
    pub source_dir: PathBuf,

    /// Deployed asset directory, overwritten in place.
    pub output_dir: PathBuf,

    /// Where composition layers live, `source_dir` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_dir: Option<PathBuf>,

    #[serde(default)]
    pub compositions: Vec<Composition>,

    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

impl Scene {
    pub fn layer_dir(&self) -> &Path {
        self.layer_dir.as_deref().unwrap_or(&self.source_dir)
    }

    /// Anchor relative directories at `root`.
    pub fn resolve_dirs(&mut self, root: &Path) {
        self.source_dir = root.join(&self.source_dir);
        self.output_dir = root.join(&self.output_dir);
        if let Some(dir) = self.layer_dir.as_mut() {
            *dir = root.join(&*dir);
        }
    }
}
