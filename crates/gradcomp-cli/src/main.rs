//! gradcomp CLI - builds the graduation computer model
//!
//! Reads the assets, writes `rendering.png` and `computer.zip`, and prints
//! the model size.

use anyhow::{Context, Result};
use clap::Parser;
use gradcomp::Settings;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gradcomp")]
#[command(about = "Generate the graduation computer model", long_about = None)]
struct Cli {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the STL assets and text.png
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Directory to write the rendering and archive to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dual contouring grid spacing
    #[arg(short, long)]
    resolution: Option<f64>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(assets) = &self.assets {
            settings.assets_dir = assets.clone();
        }
        if let Some(output) = &self.output {
            settings.output_dir = output.clone();
        }
        if let Some(resolution) = self.resolution {
            settings.resolution = resolution;
        }
        Ok(settings)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;

    let model = gradcomp::run(&settings).context("Failed to generate model")?;
    info!(
        "Wrote {} and {}",
        settings.rendering_path().display(),
        settings.archive_path().display()
    );

    println!("{}", model.size_line());
    Ok(())
}
