#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for district amenity clustering.
//!
//! Uses `indicatif-log-bridge` (via [`amenity_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.
//!
//! Without a subcommand the interactive menu is shown.

mod commands;
mod interactive;

use std::path::PathBuf;

use amenity_map_cluster::ClusterCountPolicy;
use clap::{Args, Parser, Subcommand};

use crate::commands::{Outputs, Overrides};

#[derive(Parser)]
#[command(name = "amenity_map", about = "Cluster city districts by nearby amenities")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// District source shared by `fetch` and `analyze`.
#[derive(Args)]
struct CityArgs {
    /// Registered city id (e.g., "ljubljana"), or the `city` column value
    /// to keep when reading a seed file
    #[arg(long)]
    city: Option<String>,
    /// CSV seed list (`district,post_code,latitude,longitude[,city]`)
    #[arg(long)]
    seed_file: Option<PathBuf>,
    /// Pipeline configuration TOML (overrides the built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered cities
    Cities,
    /// Fetch venues for every district and write them to a cache file
    Fetch {
        #[command(flatten)]
        city: CityArgs,
        /// Cache file to write
        #[arg(long)]
        output: PathBuf,
    },
    /// Profile, filter and cluster a city's districts
    Analyze {
        #[command(flatten)]
        city: CityArgs,
        /// Read venues from a cache file instead of the live service
        #[arg(long)]
        venues: Option<PathBuf>,
        /// Number of clusters
        #[arg(long)]
        clusters: Option<usize>,
        /// Clustering seed (a fresh one is drawn and logged when omitted)
        #[arg(long)]
        random_seed: Option<u64>,
        /// What to do when k exceeds the district count (`strict` or `reduce`)
        #[arg(long)]
        policy: Option<ClusterCountPolicy>,
        /// Write the full analysis as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the cluster map layer as `GeoJSON`
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// Guided prompts for city, k and venue source
    Interactive,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = amenity_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi).await;
    };

    match command {
        Commands::Cities => commands::list_cities(),
        Commands::Fetch { city, output } => {
            let selection = commands::select_city(city.city.as_deref(), city.seed_file.as_deref())?;
            let config = commands::load_config(city.config.as_deref())?;
            config.validate()?;
            commands::fetch(&multi, &selection, &config, &output).await?;
        }
        Commands::Analyze {
            city,
            venues,
            clusters,
            random_seed,
            policy,
            json,
            geojson,
        } => {
            let selection = commands::select_city(city.city.as_deref(), city.seed_file.as_deref())?;
            let mut config = commands::load_config(city.config.as_deref())?;
            Overrides {
                clusters,
                seed: random_seed,
                policy,
            }
            .apply(&mut config);

            commands::analyze(
                &multi,
                &selection,
                &config,
                venues.as_deref(),
                &Outputs { json, geojson },
            )
            .await?;
        }
        Commands::Interactive => interactive::run(&multi).await?,
    }

    Ok(())
}
