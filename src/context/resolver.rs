// src/context/resolver.rs — Session context resolution
//
// Runs once, before the welcome message. Never fails: every sub-lookup
// (geolocation, reverse geocoding) is caught locally and degrades the
// affected fields to None.

use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{normalize_country_name, ClientContext, UserLocation};
use crate::infra::config::GeocoderConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Source of the device position. The binary wires a real source when one
/// is available; tests substitute canned or failing implementations.
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    async fn current_position(&self) -> anyhow::Result<GeoPosition>;
}

pub struct ContextResolver {
    geolocation: Option<Box<dyn GeolocationSource>>,
    geocoder_base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl ContextResolver {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            geolocation: None,
            geocoder_base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_geolocation(mut self, source: Box<dyn GeolocationSource>) -> Self {
        self.geolocation = Some(source);
        self
    }

    /// Resolve the frozen per-session context. Infallible by contract.
    pub async fn resolve(&self) -> ClientContext {
        let resolved_at_utc = Utc::now();
        let timezone = timezone_from_env(std::env::var("TZ").ok().as_deref());
        let locale = locale_from_env(
            std::env::var("LC_ALL")
                .or_else(|_| std::env::var("LANG"))
                .ok()
                .as_deref(),
        );

        let location = match &self.geolocation {
            Some(source) => self.resolve_location(source.as_ref(), &locale).await,
            None => None,
        };

        ClientContext {
            resolved_at_utc,
            timezone,
            locale,
            location,
        }
    }

    async fn resolve_location(
        &self,
        source: &dyn GeolocationSource,
        locale: &str,
    ) -> Option<UserLocation> {
        let position = match tokio::time::timeout(self.timeout, source.current_position()).await {
            Ok(Ok(position)) => position,
            Ok(Err(e)) => {
                debug!("geolocation lookup failed: {e}");
                return None;
            }
            Err(_) => {
                debug!("geolocation lookup timed out after {:?}", self.timeout);
                return None;
            }
        };

        let mut location = UserLocation {
            latitude: Some(position.latitude),
            longitude: Some(position.longitude),
            ..Default::default()
        };

        match self.reverse_geocode(position, locale).await {
            Ok(fields) => {
                location.city = fields.city;
                location.region = fields.region;
                location.country = fields.country;
            }
            Err(e) => warn!("reverse geocoding failed: {e}"),
        }

        Some(location)
    }

    async fn reverse_geocode(
        &self,
        position: GeoPosition,
        locale: &str,
    ) -> anyhow::Result<GeocodedFields> {
        let url = format!(
            "{}?latitude={}&longitude={}&localityLanguage={}",
            self.geocoder_base_url, position.latitude, position.longitude, locale
        );
        let response = self.client.get(&url).timeout(self.timeout).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("geocoder returned HTTP {}", response.status());
        }
        let body: serde_json::Value = response.json().await?;
        Ok(GeocodedFields::from_response(&body))
    }
}

/// Position supplied through `MILES_LATITUDE` / `MILES_LONGITUDE`. A
/// terminal has no device positioning API, so coordinates come from the
/// environment when the user opts in; absent variables degrade like a
/// denied permission.
pub struct EnvGeolocation;

#[async_trait]
impl GeolocationSource for EnvGeolocation {
    async fn current_position(&self) -> anyhow::Result<GeoPosition> {
        Ok(GeoPosition {
            latitude: env_coordinate("MILES_LATITUDE")?,
            longitude: env_coordinate("MILES_LONGITUDE")?,
        })
    }
}

fn env_coordinate(name: &str) -> anyhow::Result<f64> {
    let raw = std::env::var(name).map_err(|_| anyhow::anyhow!("{name} not set"))?;
    raw.trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{name} is not a number: {raw}"))
}

pub fn system_geolocation() -> Box<dyn GeolocationSource> {
    Box::new(EnvGeolocation)
}

struct GeocodedFields {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
}

impl GeocodedFields {
    fn from_response(body: &serde_json::Value) -> Self {
        let city = non_empty_str(&body["city"])
            .or_else(|| non_empty_str(&body["locality"]))
            .map(str::to_string);
        let region = non_empty_str(&body["principalSubdivision"]).map(str::to_string);
        let country = non_empty_str(&body["countryName"]).map(normalize_country_name);
        Self {
            city,
            region,
            country,
        }
    }
}

fn non_empty_str(value: &serde_json::Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

fn timezone_from_env(tz: Option<&str>) -> String {
    tz.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "UTC".into())
}

/// Map a POSIX locale value like "en_US.UTF-8" to the BCP 47 form the
/// geocoder and backend expect ("en-US").
fn locale_from_env(lang: Option<&str>) -> String {
    let raw = match lang.map(str::trim).filter(|s| !s.is_empty()) {
        Some(v) => v,
        None => return "en-US".into(),
    };
    let base = raw.split('.').next().unwrap_or(raw);
    if base.is_empty() || base.eq_ignore_ascii_case("c") || base.eq_ignore_ascii_case("posix") {
        return "en-US".into();
    }
    base.replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FixedPosition(GeoPosition);

    #[async_trait]
    impl GeolocationSource for FixedPosition {
        async fn current_position(&self) -> anyhow::Result<GeoPosition> {
            Ok(self.0)
        }
    }

    struct Denied;

    #[async_trait]
    impl GeolocationSource for Denied {
        async fn current_position(&self) -> anyhow::Result<GeoPosition> {
            anyhow::bail!("permission denied")
        }
    }

    struct Hangs;

    #[async_trait]
    impl GeolocationSource for Hangs {
        async fn current_position(&self) -> anyhow::Result<GeoPosition> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            unreachable!("resolver must time out first")
        }
    }

    fn test_config(timeout_seconds: u64) -> GeocoderConfig {
        GeocoderConfig {
            enabled: true,
            // Unroutable per RFC 5737; reverse geocoding must fail fast
            // and degrade, not abort resolution.
            base_url: "http://192.0.2.1".into(),
            timeout_seconds,
        }
    }

    #[tokio::test]
    async fn test_resolve_without_geolocation_source() {
        let resolver = ContextResolver::new(&test_config(1));
        let context = resolver.resolve().await;
        assert!(context.location.is_none());
        assert!(!context.timezone.is_empty());
        assert!(!context.locale.is_empty());
    }

    #[tokio::test]
    async fn test_denied_geolocation_degrades_to_none() {
        let resolver = ContextResolver::new(&test_config(1)).with_geolocation(Box::new(Denied));
        let context = resolver.resolve().await;
        assert!(context.location.is_none());
    }

    #[tokio::test]
    async fn test_geolocation_timeout_degrades_to_none() {
        let mut config = test_config(1);
        config.timeout_seconds = 0;
        let resolver = ContextResolver::new(&config).with_geolocation(Box::new(Hangs));
        let context = resolver.resolve().await;
        assert!(context.location.is_none());
    }

    #[tokio::test]
    async fn test_geocode_failure_keeps_coordinates() {
        let position = GeoPosition {
            latitude: 48.8566,
            longitude: 2.3522,
        };
        let resolver =
            ContextResolver::new(&test_config(1)).with_geolocation(Box::new(FixedPosition(position)));
        let context = resolver.resolve().await;
        let location = context.location.expect("coordinates survive geocode failure");
        assert_eq!(location.latitude, Some(48.8566));
        assert_eq!(location.longitude, Some(2.3522));
        assert!(location.city.is_none());
        assert!(location.country.is_none());
    }

    // ─── Env parsing ────────────────────────────────────────────

    #[test]
    fn test_locale_from_env() {
        assert_eq!(locale_from_env(Some("en_US.UTF-8")), "en-US");
        assert_eq!(locale_from_env(Some("fr_FR")), "fr-FR");
        assert_eq!(locale_from_env(Some("C")), "en-US");
        assert_eq!(locale_from_env(Some("POSIX")), "en-US");
        assert_eq!(locale_from_env(None), "en-US");
        assert_eq!(locale_from_env(Some("")), "en-US");
    }

    #[test]
    fn test_timezone_from_env() {
        assert_eq!(timezone_from_env(Some("Europe/Paris")), "Europe/Paris");
        assert_eq!(timezone_from_env(None), "UTC");
        assert_eq!(timezone_from_env(Some("  ")), "UTC");
    }

    // ─── Geocoder response parsing ──────────────────────────────

    #[test]
    fn test_geocoded_fields_prefers_city_over_locality() {
        let body = serde_json::json!({
            "city": "Paris",
            "locality": "Paris 4e",
            "principalSubdivision": "Île-de-France",
            "countryName": "France"
        });
        let fields = GeocodedFields::from_response(&body);
        assert_eq!(fields.city.as_deref(), Some("Paris"));
        assert_eq!(fields.region.as_deref(), Some("Île-de-France"));
        assert_eq!(fields.country.as_deref(), Some("France"));
    }

    #[test]
    fn test_geocoded_fields_falls_back_to_locality() {
        let body = serde_json::json!({
            "city": "",
            "locality": "Brooklyn",
            "countryName": "United States of America (the)"
        });
        let fields = GeocodedFields::from_response(&body);
        assert_eq!(fields.city.as_deref(), Some("Brooklyn"));
        assert!(fields.region.is_none());
        assert_eq!(fields.country.as_deref(), Some("United States"));
    }

    #[test]
    fn test_geocoded_fields_all_absent() {
        let fields = GeocodedFields::from_response(&serde_json::json!({}));
        assert!(fields.city.is_none());
        assert!(fields.region.is_none());
        assert!(fields.country.is_none());
    }
}
