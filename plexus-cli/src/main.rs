use anyhow::{Context, Result};
use clap::Parser;
use plexus_cli::{parse_point, run, PreviewOptions};
use plexus_core::Vector2D;
use plexus_shared::ParticleSettings;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render the particle background headlessly", long_about = None)]
struct Args {
    /// Surface width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 120)]
    frames: u32,

    /// Seed for particle placement
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// JSON file with particle settings (camelCase keys, all optional)
    #[arg(short = 'c', long)]
    settings: Option<PathBuf>,

    /// Pointer position held for the whole run, e.g. 640,360
    #[arg(short, long, value_parser = parse_pointer)]
    pointer: Option<Vector2D>,

    /// Where to write the last frame as SVG
    #[arg(short, long, default_value = "plexus.svg")]
    output: PathBuf,

    /// Where to write every frame summary as a JSON array
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn parse_pointer(value: &str) -> Result<Vector2D, String> {
    parse_point(value).map_err(|err| format!("{:#}", err))
}

fn load_settings(path: Option<&PathBuf>) -> Result<ParticleSettings> {
    let Some(path) = path else {
        return Ok(ParticleSettings::default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    ParticleSettings::from_json(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Plexus preview starting...");

    let options = PreviewOptions {
        width: args.width,
        height: args.height,
        frames: args.frames,
        seed: args.seed,
        settings: load_settings(args.settings.as_ref())?,
        pointer: args.pointer,
    };

    let preview = run(&options).context("Preview failed")?;

    fs::write(&args.output, &preview.svg)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Wrote last frame to {}", args.output.display());

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&preview.summaries)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote {} frame summaries to {}", preview.summaries.len(), path.display());
    }

    if let Some(last) = preview.last_summary() {
        println!("{}", serde_json::to_string(last)?);
    }

    Ok(())
}
