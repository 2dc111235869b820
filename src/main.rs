use borough_sampler::config::AppConfig;
use borough_sampler::sampling::RngSource;
use borough_sampler::{export, render, report, Category, Session};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one sample and write GeoJSON, reports and map tiles
    Generate {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Print sample statistics
    Stats {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        /// Summarise a previously exported sample instead of a fresh one
        #[arg(short, long, value_name = "GEOJSON")]
        input: Option<PathBuf>,
    },
    /// Render map tiles
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        /// Render a previously exported sample instead of a fresh one
        #[arg(short, long, value_name = "GEOJSON")]
        input: Option<PathBuf>,
        /// Toggle a category layer (repeatable)
        #[arg(long = "toggle", value_name = "CATEGORY")]
        toggle: Vec<Category>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate { config } => {
            info!("Generating sample with config: {:?}", config);
            let app_config = AppConfig::load_or_default(config)?;
            let session = open_session(&app_config, None)?;
            let samples = session.samples();

            // 1. Sample for the map
            export::write_geojson(&app_config.output.geojson, &samples)?;

            // 2. Analysis outputs
            report::write_comparison_csv_file(&app_config.output.comparison_csv, session.statistics())?;
            report::write_charts_json(&app_config.output.charts_json, session.statistics())?;

            // 3. Tiles
            render::generate_tiles(
                &app_config.output.tile_dir,
                app_config.output.min_zoom,
                app_config.output.max_zoom,
                &samples,
                session.layers(),
            )?;

            println!("{}", report::sample_summary(session.statistics()));
            info!("Generation complete!");
        }
        Commands::Stats { config, input } => {
            let app_config = AppConfig::load_or_default(config)?;
            let session = open_session(&app_config, input.as_deref())?;
            print!("{}", report::render_text(session.statistics()));
        }
        Commands::Render { config, input, toggle } => {
            let app_config = AppConfig::load_or_default(config)?;
            let mut session = open_session(&app_config, input.as_deref())?;
            for category in toggle {
                let visible = session.layers_mut().toggle(*category);
                info!("Layer {} is now {}", category, if visible { "visible" } else { "hidden" });
            }
            render::generate_tiles(
                &app_config.output.tile_dir,
                app_config.output.min_zoom,
                app_config.output.max_zoom,
                &session.samples(),
                session.layers(),
            )?;
        }
    }

    Ok(())
}

// One sample per invocation; every output of the run reads the same session.
fn open_session(config: &AppConfig, input: Option<&Path>) -> anyhow::Result<Session> {
    let session = match (input, config.sampling.seed) {
        (Some(path), _) => Session::from_collection(export::read_geojson(path)?),
        (None, Some(seed)) => {
            info!("Using fixed seed {}", seed);
            Session::with_source(&mut RngSource::seeded(seed))
        }
        (None, None) => Session::new(),
    };
    Ok(session.with_layers(config.map.layer_visibility()))
}
