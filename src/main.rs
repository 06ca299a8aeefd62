use anyhow::Context;
use clap::Parser;
use relm4::prelude::*;
use slider::config;
use slider::gui::app::{AppInit, AppModel};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Full-screen image carousel")]
struct Cli {
    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Shorten every transition to a near-instant cut
    #[arg(long)]
    reduced_motion: bool,

    /// Milliseconds between automatic advances
    #[arg(long, value_name = "MS")]
    autoplay_ms: Option<u64>,

    /// Write the default config file, print its path and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.write_config {
        let path = config::write_default_config().context("Failed to write default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };
    log::info!("Loading config from {}", path.display());

    let (mut config, deck) = config::load_config(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    if cli.reduced_motion {
        config.reduced_motion = Some(true);
    }
    if let Some(ms) = cli.autoplay_ms {
        config.autoplay_delay_ms = ms;
    }

    let app = RelmApp::new("org.slider.slider").with_args(Vec::new());
    app.run::<AppModel>(AppInit { deck, config });

    Ok(())
}
