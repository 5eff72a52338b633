//! Cached approximate geolocation, used as a hint for the web search
//! tool ("weather" should mean the weather *here*).
//!
//! The location comes from a free IP geolocation lookup and is cached
//! in `~/.got/location.json` for 24 hours. Everything here is best
//! effort: a missing or stale cache plus a failed lookup simply means
//! no location hint.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm::UserLocation;

const GEO_URL: &str =
    "http://ip-api.com/json/?fields=city,regionName,country,countryCode,lat,lon,timezone";

/// Cache time-to-live in milliseconds (24 hours).
const LOCATION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

const CACHE_FILE: &str = "location.json";

const FETCH_TIMEOUT_SECS: u64 = 3;

/// Approximate location as returned by the geolocation lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, rename = "regionName")]
    pub region_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, rename = "countryCode")]
    pub country_code: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Location {
    /// Builds the web search user_location hint. Requires at least a
    /// city; without one the hint is useless.
    pub fn user_location_hint(&self) -> Option<UserLocation> {
        let city = self.city.clone().filter(|c| !c.is_empty())?;
        Some(UserLocation {
            location_type: "approximate".to_string(),
            city,
            region: self.region_name.clone().unwrap_or_default(),
            country: self.country_code.clone().unwrap_or_default(),
            timezone: self.timezone.clone().unwrap_or_default(),
        })
    }
}

/// On-disk cache entry: fetch timestamp (unix millis) + payload.
#[derive(Serialize, Deserialize)]
struct CacheEntry {
    timestamp: i64,
    data: Location,
}

fn cache_path(dir: &Path) -> PathBuf {
    dir.join(CACHE_FILE)
}

/// Reads the cached location if present and fresh.
pub fn cached(dir: &Path) -> Option<Location> {
    let content = std::fs::read_to_string(cache_path(dir)).ok()?;
    let entry: CacheEntry = serde_json::from_str(&content).ok()?;
    if Utc::now().timestamp_millis() - entry.timestamp < LOCATION_TTL_MS {
        Some(entry.data)
    } else {
        debug!("Location cache expired");
        None
    }
}

/// Fetches the location from the geolocation service and writes the
/// cache.
async fn fetch(dir: &Path) -> Result<Location> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;
    let location: Location = client.get(GEO_URL).send().await?.json().await?;

    std::fs::create_dir_all(dir)?;
    let entry = CacheEntry {
        timestamp: Utc::now().timestamp_millis(),
        data: location.clone(),
    };
    std::fs::write(cache_path(dir), serde_json::to_string(&entry)?)?;

    debug!("Location cached: {:?}", location.city);
    Ok(location)
}

/// Cached location, refreshed via the network when missing or stale.
/// Never fails — a lookup error just means no hint this run.
pub async fn fetch_or_cached(dir: &Path) -> Option<Location> {
    if let Some(location) = cached(dir) {
        return Some(location);
    }
    match fetch(dir).await {
        Ok(location) => Some(location),
        Err(e) => {
            warn!("Location lookup failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_location() -> Location {
        Location {
            city: Some("Paris".to_string()),
            region_name: Some("Île-de-France".to_string()),
            country: Some("France".to_string()),
            country_code: Some("FR".to_string()),
            lat: Some(48.85),
            lon: Some(2.35),
            timezone: Some("Europe/Paris".to_string()),
        }
    }

    fn write_cache(dir: &Path, timestamp: i64) {
        let entry = CacheEntry {
            timestamp,
            data: sample_location(),
        };
        std::fs::write(cache_path(dir), serde_json::to_string(&entry).unwrap()).unwrap();
    }

    #[test]
    fn test_cached_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(cached(dir.path()).is_none());
    }

    #[test]
    fn test_cached_fresh_entry() {
        let dir = tempfile::tempdir().unwrap();
        write_cache(dir.path(), Utc::now().timestamp_millis());
        let location = cached(dir.path()).unwrap();
        assert_eq!(location.city.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_cached_stale_entry() {
        let dir = tempfile::tempdir().unwrap();
        // 25 hours old — past the 24h TTL
        write_cache(
            dir.path(),
            Utc::now().timestamp_millis() - 25 * 60 * 60 * 1000,
        );
        assert!(cached(dir.path()).is_none());
    }

    #[test]
    fn test_cached_corrupt_entry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(cache_path(dir.path()), "not json").unwrap();
        assert!(cached(dir.path()).is_none());
    }

    #[test]
    fn test_api_field_names_parse() {
        // Field casing as ip-api.com returns it.
        let json = r#"{"city":"Lyon","regionName":"Auvergne-Rhône-Alpes",
                       "country":"France","countryCode":"FR",
                       "lat":45.76,"lon":4.83,"timezone":"Europe/Paris"}"#;
        let location: Location = serde_json::from_str(json).unwrap();
        assert_eq!(location.region_name.as_deref(), Some("Auvergne-Rhône-Alpes"));
        assert_eq!(location.country_code.as_deref(), Some("FR"));
    }

    #[test]
    fn test_user_location_hint() {
        let hint = sample_location().user_location_hint().unwrap();
        assert_eq!(hint.location_type, "approximate");
        assert_eq!(hint.city, "Paris");
        assert_eq!(hint.country, "FR");
        assert_eq!(hint.timezone, "Europe/Paris");
    }

    #[test]
    fn test_user_location_hint_requires_city() {
        let mut location = sample_location();
        location.city = None;
        assert!(location.user_location_hint().is_none());
        location.city = Some(String::new());
        assert!(location.user_location_hint().is_none());
    }
}
