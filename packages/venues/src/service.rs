//! Embedded places-service configuration.
//!
//! The endpoint, API version, timeout and credential variable names live
//! in `services/foursquare.toml`, compiled in with `include_str!`.
//! Credentials themselves are only ever read from the environment.

use serde::Deserialize;

use crate::VenueError;

/// A places-service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueService {
    /// Unique identifier (e.g., `"foursquare"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Endpoint URL.
    pub base_url: String,
    /// API version date string sent as the `v` parameter.
    pub api_version: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the client ID.
    pub client_id_env: String,
    /// Environment variable holding the client secret.
    pub client_secret_env: String,
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Client credentials for the places service.
#[derive(Clone)]
pub struct Credentials {
    /// Client ID.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl VenueService {
    /// Reads the client credentials named by this service from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`VenueError::MissingCredentials`] if either variable is
    /// unset or empty.
    pub fn credentials_from_env(&self) -> Result<Credentials, VenueError> {
        Ok(Credentials {
            client_id: read_env(&self.client_id_env)?,
            client_secret: read_env(&self.client_secret_env)?,
        })
    }
}

fn read_env(var: &str) -> Result<String, VenueError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| VenueError::MissingCredentials {
            var: var.to_string(),
        })
}

const FOURSQUARE_TOML: &str = include_str!("../services/foursquare.toml");

/// Returns the Foursquare service definition.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (caught by tests).
#[must_use]
pub fn foursquare() -> VenueService {
    toml::de::from_str(FOURSQUARE_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse venue service 'foursquare': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_foursquare_service() {
        let service = foursquare();
        assert_eq!(service.id, "foursquare");
        assert!(service.base_url.starts_with("https://"));
        assert_eq!(service.api_version.len(), 8);
        assert!(service.timeout_secs > 0);
    }

    #[test]
    fn missing_credentials_name_the_variable() {
        let mut service = foursquare();
        service.client_id_env = "AMENITY_MAP_TEST_UNSET_CLIENT_ID".to_string();
        let err = service.credentials_from_env().unwrap_err();
        assert!(
            matches!(err, VenueError::MissingCredentials { ref var } if var == "AMENITY_MAP_TEST_UNSET_CLIENT_ID")
        );
    }

    #[test]
    fn debug_output_redacts_secret() {
        let creds = Credentials {
            client_id: "id".to_string(),
            client_secret: "hunter2".to_string(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
