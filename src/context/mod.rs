// src/context/mod.rs — Ambient client context, resolved once per session

pub mod resolver;

pub use resolver::{system_geolocation, ContextResolver, GeoPosition, GeolocationSource};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Snapshot of ambient client state, resolved once at session start and
/// frozen. Sent with every chat request. Field names match the wire format
/// the backend expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientContext {
    #[serde(rename = "now_iso")]
    pub resolved_at_utc: DateTime<Utc>,

    #[serde(rename = "user_tz")]
    pub timezone: String,

    #[serde(rename = "user_locale")]
    pub locale: String,

    /// Absent entirely (not null) when location lookup was skipped or failed
    /// outright; the transport layer treats null fields as protocol noise.
    #[serde(
        rename = "user_location",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub location: Option<UserLocation>,
}

/// Each field independently optional; absent fields are omitted from the
/// serialized form, never sent as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub region: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub country: Option<String>,

    #[serde(rename = "lat", skip_serializing_if = "Option::is_none", default)]
    pub latitude: Option<f64>,

    #[serde(rename = "lon", skip_serializing_if = "Option::is_none", default)]
    pub longitude: Option<f64>,
}

impl UserLocation {
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.region.is_none()
            && self.country.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }
}

/// Clean up geocoder country names: strip a trailing "(the)" parenthetical
/// and canonicalize the common United States / United Kingdom variants.
pub fn normalize_country_name(raw: &str) -> String {
    static TRAILING_THE: OnceLock<regex::Regex> = OnceLock::new();
    let trailing_the = TRAILING_THE
        .get_or_init(|| regex::Regex::new(r"(?i)\s*\(the\)\s*$").expect("static pattern"));

    let stripped = trailing_the.replace(raw.trim(), "");
    let lower = stripped.to_lowercase();
    if lower.contains("united states") {
        return "United States".into();
    }
    if lower.contains("united kingdom") {
        return "United Kingdom".into();
    }
    stripped.trim().to_string()
}
