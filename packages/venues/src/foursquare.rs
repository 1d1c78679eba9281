//! Foursquare `venues/explore` client.
//!
//! Each district is one request: `ll=<lat>,<lng>`, `radius`, `limit`.
//! The first listed category of a venue is taken as its label; venues
//! without any category are skipped.
//!
//! See <https://developer.foursquare.com/docs/api-reference/venues/explore/>

use std::time::Duration;

use amenity_map_district_models::Venue;
use async_trait::async_trait;

use crate::service::{Credentials, VenueService};
use crate::{NearbyQuery, VenueError, VenueFetcher, retry};

/// Live venue fetcher backed by the Foursquare explore endpoint.
pub struct FoursquareFetcher {
    client: reqwest::Client,
    service: VenueService,
    credentials: Credentials,
}

impl FoursquareFetcher {
    /// Creates a fetcher for `service` with explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns [`VenueError::Http`] if the HTTP client cannot be built.
    pub fn new(service: VenueService, credentials: Credentials) -> Result<Self, VenueError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(service.timeout_secs))
            .build()?;
        log::info!("Using {} at {}", service.name, service.base_url);
        Ok(Self {
            client,
            service,
            credentials,
        })
    }

    /// Creates a fetcher for the embedded Foursquare service, reading
    /// credentials from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`VenueError`] if credentials are missing or the HTTP
    /// client cannot be built.
    pub fn from_env() -> Result<Self, VenueError> {
        let service = crate::service::foursquare();
        let credentials = service.credentials_from_env()?;
        Self::new(service, credentials)
    }
}

#[async_trait]
impl VenueFetcher for FoursquareFetcher {
    fn id(&self) -> &str {
        &self.service.id
    }

    async fn fetch_nearby(&self, query: &NearbyQuery) -> Result<Vec<Venue>, VenueError> {
        let ll = format!("{},{}", query.latitude, query.longitude);
        let radius = query.radius_meters.to_string();
        let limit = query.limit.to_string();

        log::debug!(
            "{}: requesting up to {limit} venues within {radius}m of {ll}",
            query.district
        );

        let body = retry::send_json(|| {
            self.client.get(&self.service.base_url).query(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("v", self.service.api_version.as_str()),
                ("ll", ll.as_str()),
                ("radius", radius.as_str()),
                ("limit", limit.as_str()),
            ])
        })
        .await?;

        let mut venues = parse_response(&body)?;
        venues.truncate(usize::try_from(query.limit).unwrap_or(usize::MAX));
        log::debug!("{}: {} venues", query.district, venues.len());
        Ok(venues)
    }
}

/// Parses an explore response into venues.
///
/// Checks `meta.code` first so that quota and credential errors surface
/// with Foursquare's own explanation.
fn parse_response(body: &serde_json::Value) -> Result<Vec<Venue>, VenueError> {
    let code = body["meta"]["code"].as_u64().unwrap_or(200);
    if code != 200 {
        let detail = body["meta"]["errorDetail"]
            .as_str()
            .unwrap_or("no error detail");
        return Err(VenueError::Response {
            message: format!("Foursquare returned code {code}: {detail}"),
        });
    }

    let groups = body["response"]["groups"]
        .as_array()
        .ok_or_else(|| VenueError::Response {
            message: "No groups array in explore response".to_string(),
        })?;

    let mut venues = Vec::new();
    for item in groups
        .iter()
        .filter_map(|group| group["items"].as_array())
        .flatten()
    {
        if let Some(venue) = parse_venue(&item["venue"]) {
            venues.push(venue);
        }
    }

    Ok(venues)
}

fn parse_venue(venue: &serde_json::Value) -> Option<Venue> {
    let name = venue["name"].as_str()?;
    let latitude = venue["location"]["lat"].as_f64()?;
    let longitude = venue["location"]["lng"].as_f64()?;
    let Some(category) = venue["categories"]
        .as_array()
        .and_then(|categories| categories.first())
        .and_then(|category| category["name"].as_str())
    else {
        log::debug!("Skipping uncategorized venue '{name}'");
        return None;
    };

    Some(Venue::new(name, latitude, longitude, category))
}
