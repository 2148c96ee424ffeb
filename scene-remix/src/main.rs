use anyhow::{Context, Result};
use clap::Parser;
use scene_remix::{Config, init_logger, run_scene};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Remix layered login-screen backgrounds", long_about = None)]
struct Args {
    /// TOML scene config. The built-in scenes are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory relative scene paths are resolved against.
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Scene to run, repeatable. Defaults to the config's `run` list.
    #[arg(short, long = "scene")]
    scenes: Vec<String>,

    /// Print the available scenes and exit.
    #[arg(long)]
    list: bool,

    /// Print the effective config as TOML and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path, args.root.as_deref())?,
        None => Config::builtin(args.root.clone().unwrap_or_else(|| PathBuf::from("."))),
    };

    if args.list {
        for scene in &config.scenes {
            let marker = if config.runs_by_default(&scene.name) { "*" } else { " " };
            println!(
                "{marker} {:<28} {} entries, {} compositions",
                scene.name,
                scene.entries.len(),
                scene.compositions.len()
            );
        }
        return Ok(());
    }

    if args.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let scenes = config.selected_scenes(&args.scenes)?;
    if scenes.is_empty() {
        log::warn!("no scenes configured");
        return Ok(());
    }

    let (mut processed, mut skipped) = (0, 0);
    for scene in &scenes {
        let report =
            run_scene(scene).with_context(|| format!("scene `{}` failed", scene.name))?;
        processed += report.processed();
        skipped += report.skipped.len();
    }

    log::info!("all done: {processed} files processed, {skipped} skipped");
    Ok(())
}
