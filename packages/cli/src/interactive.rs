//! Menu-driven front end using `dialoguer`.
//!
//! Runs the same analysis as `analyze` for one or more registered cities
//! without memorizing CLI flags.

use std::path::PathBuf;

use amenity_map_cli_utils::MultiProgress;
use amenity_map_district::registry;
use dialoguer::{Input, MultiSelect, Select};

use crate::commands::{self, CitySelection, Outputs, Overrides};

/// Where venues are read from.
enum VenueSource {
    Live,
    CacheDir,
}

impl VenueSource {
    const ALL: &[Self] = &[Self::CacheDir, Self::Live];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Live => "Foursquare (live, needs credentials)",
            Self::CacheDir => "Cache directory (<city id>.json per city)",
        }
    }
}

/// Prompts for cities, k, seed and venue source, then analyzes each
/// selected city in turn.
///
/// # Errors
///
/// Returns an error if a prompt fails or any city run fails.
#[allow(clippy::future_not_send)]
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("District Amenity Map");
    println!();

    let cities = registry::all_cities();
    let city_labels: Vec<String> = cities
        .iter()
        .map(|c| format!("{} \u{2014} {}, {}", c.id, c.name, c.country))
        .collect();
    let defaults = vec![true; cities.len()];

    let selected = MultiSelect::new()
        .with_prompt("Cities to analyze (space=toggle, a=all, enter=confirm)")
        .items(&city_labels)
        .defaults(&defaults)
        .interact()?;

    if selected.is_empty() {
        println!("No cities selected.");
        return Ok(());
    }

    let mut config = commands::load_config(None)?;
    let clusters: usize = Input::new()
        .with_prompt("Number of clusters (k)")
        .default(config.clusters)
        .interact_text()?;
    let seed = prompt_optional_u64("Random seed (empty for a fresh one)")?;
    Overrides {
        clusters: Some(clusters),
        seed,
        policy: None,
    }
    .apply(&mut config);

    let source_labels: Vec<&str> = VenueSource::ALL.iter().map(VenueSource::label).collect();
    let source_idx = Select::new()
        .with_prompt("Venue source")
        .items(&source_labels)
        .default(0)
        .interact()?;
    let cache_dir = match VenueSource::ALL[source_idx] {
        VenueSource::Live => None,
        VenueSource::CacheDir => Some(prompt_path("Cache directory", "venues")?),
    };

    let output_dir: String = Input::new()
        .with_prompt("Output directory for JSON/GeoJSON (empty to skip)")
        .allow_empty(true)
        .interact_text()?;
    let output_dir = Some(output_dir.trim())
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from);
    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)?;
    }

    for &idx in &selected {
        let city = &cities[idx];
        let selection = CitySelection {
            name: city.name.clone(),
            districts: city.districts(),
        };
        let venues = cache_dir.as_ref().map(|dir| dir.join(format!("{}.json", city.id)));
        let outputs = output_dir.as_ref().map_or_else(Outputs::default, |dir| Outputs {
            json: Some(dir.join(format!("{}.analysis.json", city.id))),
            geojson: Some(dir.join(format!("{}.geojson", city.id))),
        });

        commands::analyze(multi, &selection, &config, venues.as_deref(), &outputs).await?;
    }

    Ok(())
}

fn prompt_optional_u64(prompt: &str) -> Result<Option<u64>, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    if input.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.trim().parse()?))
    }
}

fn prompt_path(prompt: &str, default: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(PathBuf::from(input.trim()))
}
