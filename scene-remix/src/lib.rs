//! Batch remixing of layered login-screen backgrounds.
//!
//! A [`Scene`](manifest::Scene) names a directory of pristine assets, a
//! deployed directory to overwrite, and a manifest saying what happens to
//! each file: colour work through a [`Recipe`](recipe::Recipe), a plain
//! re-encode, a byte copy, or a merge of several layers into one.

pub mod codec;
pub mod config;
pub mod manifest;
pub mod pipeline;
pub mod presets;
pub mod recipe;

pub use config::Config;
pub use pipeline::{SceneReport, run_scene};

/// Sets up a logger printing timestamp, level, file name and line number.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logger() {
    use std::io::Write;

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
