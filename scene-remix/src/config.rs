use crate::{manifest::Scene, presets};
use anyhow::{Context, Result, bail};
use derivative::Derivative;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct Config {
    /// Relative scene directories are resolved against this directory.
    #[serde(default = "root_default")]
    #[derivative(Default(value = "root_default()"))]
    pub root: PathBuf,

    /// Scenes run when none are named explicitly. Empty means every scene.
    #[serde(default)]
    pub run: Vec<String>,

    #[serde(default)]
    pub scenes: Vec<Scene>,
}

fn root_default() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Built-in scene presets anchored at `root`.
    pub fn builtin(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            run: presets::DEFAULT_RUN.iter().map(|name| name.to_string()).collect(),
            scenes: presets::all(),
        }
    }

    /// Loads a TOML config file. `root_override` replaces the file's `root`;
    /// a relative `root` from the file is taken relative to the directory
    /// holding the file.
    pub fn load(path: impl AsRef<Path>, root_override: Option<&Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {} failed", path.display()))?;

        let mut config = Self::from_toml(&text)
            .with_context(|| format!("parse config {} failed", path.display()))?;

        if let Some(root) = root_override {
            config.root = root.to_path_buf();
        } else if config.root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.root = base.join(&config.root);
        }

        debug!("{:?}", config);
        Ok(config)
    }

    /// Parses TOML without resolving any directory.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str::<Config>(text)?)
    }

    /// Scene directories are written as declared, never joined with `root`.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scene as declared, directories not yet anchored at `root`.
    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.name == name)
    }

    /// Copy of `scene` with its directories anchored at `root`.
    pub fn resolve(&self, scene: &Scene) -> Scene {
        let mut scene = scene.clone();
        scene.resolve_dirs(&self.root);
        scene
    }

    /// Resolved scenes to process: the explicitly requested ones, otherwise
    /// the `run` list, otherwise all of them.
    pub fn selected_scenes(&self, requested: &[String]) -> Result<Vec<Scene>> {
        let names = if requested.is_empty() {
            self.run.as_slice()
        } else {
            requested
        };

        if names.is_empty() {
            return Ok(self.scenes.iter().map(|scene| self.resolve(scene)).collect());
        }

        let mut scenes = Vec::with_capacity(names.len());
        for name in names {
            match self.scene(name) {
                Some(scene) => scenes.push(self.resolve(scene)),
                None => bail!(
                    "unknown scene `{name}`, available: {}",
                    self.scenes
                        .iter()
                        .map(|scene| scene.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }
        }
        Ok(scenes)
    }

    /// Whether `scene` runs when no scene is named explicitly.
    pub fn runs_by_default(&self, scene: &str) -> bool {
        self.run.is_empty() || self.run.iter().any(|name| name == scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Action;

    const SAMPLE: &str = r#"
root = "assets"
run = ["dusk"]

[[scenes]]
name = "dusk"
source_dir = "backup/dusk"
output_dir = "dist/dusk"

[[scenes.compositions]]
output = "background.jpg"
layers = ["sky.png", "hills.png"]
size = [160, 90]
background = [200, 230, 240]

[[scenes.entries]]
input = "background.jpg"
action = "transform"
hue_shift = -0.08
temperature = -0.3
saturation = 1.15
flip = true

[[scenes.entries]]
input = "vignette.png"
output = "vignette_remixed.png"
action = "reencode"

[[scenes.entries]]
input = "stars.plist"
action = "copy"

[[scenes]]
name = "dawn"
source_dir = "/abs/backup"
output_dir = "dist/dawn"
"#;

    #[test]
    fn test_parse_sample() -> Result<()> {
        let config = Config::from_toml(SAMPLE)?;

        assert_eq!(config.root, PathBuf::from("assets"));
        assert_eq!(config.run, ["dusk"]);
        assert_eq!(config.scenes.len(), 2);

        let dusk = &config.scenes[0];
        assert_eq!(dusk.compositions[0].size, Some([160, 90]));
        assert_eq!(dusk.compositions[0].background, Some([200, 230, 240]));
        assert_eq!(dusk.entries.len(), 3);

        match &dusk.entries[0].action {
            Action::Transform(recipe) => {
                assert_eq!(recipe.hue_shift, -0.08);
                assert_eq!(recipe.temperature, -0.3);
                assert_eq!(recipe.saturation, 1.15);
                assert_eq!(recipe.brightness, 1.0);
                assert_eq!(recipe.contrast, 1.0);
                assert!(recipe.flip);
            }
            other => panic!("unexpected action {other:?}"),
        }
        assert_eq!(dusk.entries[1].action, Action::Reencode);
        assert_eq!(dusk.entries[1].output_name(), "vignette_remixed.png");
        assert_eq!(dusk.entries[2].action, Action::Copy);
        assert_eq!(dusk.entries[2].output_name(), "stars.plist");

        assert!(config.scenes[1].entries.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_resolves_relative_dirs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("remix.toml");
        fs::write(&path, SAMPLE)?;

        let config = Config::load(&path, None)?;
        let root = dir.path().join("assets");
        let scenes = config.selected_scenes(&["dusk".to_string(), "dawn".to_string()])?;

        assert_eq!(config.root, root);
        assert_eq!(config.scenes[0].source_dir, PathBuf::from("backup/dusk"));
        assert_eq!(scenes[0].source_dir, root.join("backup/dusk"));
        assert_eq!(scenes[0].layer_dir(), root.join("backup/dusk"));
        assert_eq!(scenes[1].source_dir, PathBuf::from("/abs/backup"));

        let overridden = Config::load(&path, Some(Path::new("/srv/game")))?;
        let dusk = overridden.selected_scenes(&[])?;
        assert_eq!(dusk[0].output_dir, PathBuf::from("/srv/game/dist/dusk"));
        Ok(())
    }

    #[test]
    fn test_selected_scenes() -> Result<()> {
        let config = Config::from_toml(SAMPLE)?;

        fn names(scenes: Vec<Scene>) -> Vec<String> {
            scenes.into_iter().map(|scene| scene.name).collect()
        }

        assert_eq!(names(config.selected_scenes(&[])?), ["dusk"]);
        assert_eq!(names(config.selected_scenes(&["dawn".to_string()])?), ["dawn"]);
        assert!(config.selected_scenes(&["noon".to_string()]).is_err());
        assert!(config.runs_by_default("dusk"));
        assert!(!config.runs_by_default("dawn"));

        let everything = Config {
            run: Vec::new(),
            ..config
        };
        assert_eq!(names(everything.selected_scenes(&[])?), ["dusk", "dawn"]);
        assert!(everything.runs_by_default("dawn"));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(Config::load("/definitely/not/here/remix.toml", None).is_err());
    }

    #[test]
    fn test_builtin_scenes_are_anchored() -> Result<()> {
        let config = Config::builtin("/srv/game");

        let scenes = config.selected_scenes(&[])?;
        assert_eq!(scenes.len(), config.run.len());
        for scene in config.scenes.iter().map(|scene| config.resolve(scene)) {
            assert!(scene.source_dir.starts_with("/srv/game"));
            assert!(scene.output_dir.starts_with("/srv/game"));
        }
        for name in &config.run {
            assert!(config.scene(name).is_some(), "{name} is not a builtin scene");
        }
        Ok(())
    }

    #[test]
    fn test_dumped_config_loads_back_to_same_dirs() -> Result<()> {
        fn dirs(config: &Config) -> Result<Vec<(PathBuf, PathBuf, PathBuf)>> {
            Ok(config
                .selected_scenes(&[])?
                .iter()
                .map(|scene| {
                    (
                        scene.source_dir.clone(),
                        scene.output_dir.clone(),
                        scene.layer_dir().to_path_buf(),
                    )
                })
                .collect())
        }

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("remix.toml");

        let relative = Config::builtin("game");
        fs::write(&path, relative.to_toml()?)?;
        let reloaded = Config::load(&path, Some(Path::new("game")))?;
        assert_eq!(reloaded.scenes, relative.scenes);
        assert_eq!(dirs(&reloaded)?, dirs(&relative)?);

        // Without an override a relative root is anchored at the file's directory.
        let reloaded = Config::load(&path, None)?;
        let anchored = Config::builtin(dir.path().join("game"));
        assert_eq!(dirs(&reloaded)?, dirs(&anchored)?);

        let absolute = Config::builtin(dir.path().join("srv"));
        fs::write(&path, absolute.to_toml()?)?;
        let reloaded = Config::load(&path, None)?;
        assert_eq!(reloaded.root, absolute.root);
        assert_eq!(dirs(&reloaded)?, dirs(&absolute)?);
        Ok(())
    }
}
