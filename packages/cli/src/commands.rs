//! Shared command implementations for flag-driven and interactive use.

use std::path::{Path, PathBuf};
use std::time::Instant;

use amenity_map_cli_utils::{IndicatifProgress, MultiProgress};
use amenity_map_cluster::ClusterCountPolicy;
use amenity_map_district::{registry, seed};
use amenity_map_district_models::District;
use amenity_map_pipeline::{CityAnalysis, PipelineConfig, fetch_city_venues, run_city};
use amenity_map_report::{clusters, ranked, write_analysis_json, write_geojson};
use amenity_map_venues::{VenueFetcher, cache::CachedVenues, foursquare::FoursquareFetcher};

/// Where a run's districts come from.
pub struct CitySelection {
    /// Display name used in logs and reports.
    pub name: String,
    /// Districts in seed order.
    pub districts: Vec<District>,
}

/// Resolves the districts to analyze.
///
/// With a seed file, `city` filters its `city` column; otherwise `city`
/// must name a registered city.
///
/// # Errors
///
/// Returns an error if the seed file cannot be read, the city is unknown,
/// or neither argument was given.
pub fn select_city(
    city: Option<&str>,
    seed_file: Option<&Path>,
) -> Result<CitySelection, Box<dyn std::error::Error>> {
    if let Some(path) = seed_file {
        let districts = seed::load_seed_file(path, city)?;
        let name = city.map_or_else(
            || {
                path.file_stem()
                    .map_or_else(|| "seed".to_string(), |s| s.to_string_lossy().into_owned())
            },
            str::to_string,
        );
        return Ok(CitySelection { name, districts });
    }

    let Some(id) = city else {
        return Err("either --city or --seed-file is required".into());
    };
    let definition = registry::find_city(id)?;
    Ok(CitySelection {
        districts: definition.districts(),
        name: definition.name,
    })
}

/// Loads the pipeline configuration, falling back to the embedded
/// defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    })
}

/// Command-line overrides applied on top of the configuration file.
#[derive(Default)]
pub struct Overrides {
    pub clusters: Option<usize>,
    pub seed: Option<u64>,
    pub policy: Option<ClusterCountPolicy>,
}

impl Overrides {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(clusters) = self.clusters {
            config.clusters = clusters;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(policy) = self.policy {
            config.cluster_count_policy = policy;
        }
    }
}

/// Prints the registered cities.
pub fn list_cities() {
    let cities = registry::all_cities();
    println!("{:<12} {:<12} {:<8} DISTRICTS", "ID", "NAME", "COUNTRY");
    println!("{}", "-".repeat(44));
    for city in &cities {
        println!(
            "{:<12} {:<12} {:<8} {}",
            city.id,
            city.name,
            city.country,
            city.districts.len()
        );
    }
}

/// Fetches a city's venues from the live service and writes a cache file.
///
/// # Errors
///
/// Returns an error if credentials are missing, any lookup fails, or the
/// cache cannot be written.
pub async fn fetch(
    multi: &MultiProgress,
    selection: &CitySelection,
    config: &PipelineConfig,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let fetcher = FoursquareFetcher::from_env()?;
    let progress = IndicatifProgress::districts_bar(multi, &selection.name);

    let venue_lists =
        fetch_city_venues(&selection.districts, &fetcher, config, progress.as_ref()).await?;

    let mut cache = CachedVenues::new(config.radius_meters, config.venue_limit);
    for (district, venues) in selection.districts.iter().zip(venue_lists) {
        cache.insert(district.name.clone(), venues);
    }
    cache.save(output)?;

    log::info!(
        "Fetched {} venues for {} in {:.1}s",
        cache.venue_count(),
        selection.name,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Output files requested for an analysis.
#[derive(Default)]
pub struct Outputs {
    pub json: Option<PathBuf>,
    pub geojson: Option<PathBuf>,
}

/// Runs the pipeline for one city, prints the tables and writes any
/// requested output files.
///
/// Venues come from `venues` when given, otherwise from the live
/// service.
///
/// # Errors
///
/// Returns an error if the venue source cannot be set up, the pipeline
/// fails, or an output cannot be written.
pub async fn analyze(
    multi: &MultiProgress,
    selection: &CitySelection,
    config: &PipelineConfig,
    venues: Option<&Path>,
    outputs: &Outputs,
) -> Result<CityAnalysis, Box<dyn std::error::Error>> {
    let fetcher: Box<dyn VenueFetcher> = match venues {
        Some(path) => Box::new(CachedVenues::load(path)?),
        None => Box::new(FoursquareFetcher::from_env()?),
    };
    let progress = IndicatifProgress::districts_bar(multi, &selection.name);

    let analysis = run_city(
        &selection.name,
        &selection.districts,
        fetcher.as_ref(),
        config,
        progress.as_ref(),
    )
    .await?;

    print_analysis(&analysis);

    if let Some(path) = &outputs.json {
        write_analysis_json(&analysis, path)?;
    }
    if let Some(path) = &outputs.geojson {
        write_geojson(&analysis, path)?;
    }
    Ok(analysis)
}

fn print_analysis(analysis: &CityAnalysis) {
    let clustering = &analysis.clustering;
    println!();
    println!("{}", analysis.city);
    println!("{}", "=".repeat(analysis.city.chars().count()));
    if clustering.was_reduced() {
        println!(
            "k reduced from {} to {} (only {} districts)",
            clustering.requested_clusters,
            clustering.clusters,
            analysis.districts.len()
        );
    }
    println!(
        "k = {}, seed = {}, inertia = {:.6}",
        clustering.clusters, clustering.seed, clustering.inertia
    );
    println!();
    print!("{}", ranked::render_ranked_table(analysis));
    println!();
    print!("{}", clusters::render_cluster_tables(analysis));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_city_is_resolved_by_id() {
        let selection = select_city(Some("GRAZ"), None).unwrap();
        assert_eq!(selection.name, "Graz");
        assert_eq!(selection.districts.len(), 10);
    }

    #[test]
    fn unknown_city_is_an_error() {
        let err = select_city(Some("atlantis"), None).err().unwrap();
        assert!(err.to_string().contains("atlantis"));
    }

    #[test]
    fn city_or_seed_file_is_required() {
        let err = select_city(None, None).err().unwrap();
        assert_eq!(err.to_string(), "either --city or --seed-file is required");
    }

    #[test]
    fn seed_file_is_filtered_by_city_column() {
        let path = std::env::temp_dir().join("amenity_map_cli_seed_test.csv");
        std::fs::write(
            &path,
            "district,post_code,latitude,longitude,city\n\
             Center,1000,46.05,14.50,Ljubljana\n\
             Lend,8020,47.07,15.43,Graz\n\
             Siska,1000,46.07,14.48,Ljubljana\n",
        )
        .unwrap();

        let selection = select_city(Some("ljubljana"), Some(&path)).unwrap();
        assert_eq!(selection.name, "ljubljana");
        let names: Vec<&str> = selection.districts.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Center", "Siska"]);

        let all = select_city(None, Some(&path)).unwrap();
        assert_eq!(all.name, "amenity_map_cli_seed_test");
        assert_eq!(all.districts.len(), 3);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn config_file_values_are_loaded() {
        let path = std::env::temp_dir().join("amenity_map_cli_config_test.toml");
        std::fs::write(&path, "clusters = 3\nradius_meters = 500\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.clusters, 3);
        assert_eq!(config.radius_meters, 500);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn flags_override_config_values() {
        let mut config = PipelineConfig::from_toml_str("clusters = 3\nseed = 1\n").unwrap();
        Overrides {
            clusters: Some(4),
            seed: Some(42),
            policy: Some(ClusterCountPolicy::Reduce),
        }
        .apply(&mut config);

        assert_eq!(config.clusters, 4);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.cluster_count_policy, ClusterCountPolicy::Reduce);
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let mut config = PipelineConfig::from_toml_str("clusters = 3\nseed = 1\n").unwrap();
        Overrides::default().apply(&mut config);

        assert_eq!(config.clusters, 3);
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.cluster_count_policy, ClusterCountPolicy::Strict);
    }
}
