// src/dashboard.rs — Flight dashboard data
//
// Created or replaced wholesale each time the trigger fires; cleared when
// the user dismisses the panel; never merged incrementally. Either carries
// live data passed through from the backend's travel-data integration or
// locally synthesized placeholder values.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::trigger::RouteHint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub origin_name: String,
    pub destination_name: String,
    pub origin_code: String,
    pub destination_code: String,
    pub display_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub price: f64,
    /// The "optimal" fare line the chart compares against.
    pub reference_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOption {
    pub id: String,
    pub carrier_name: String,
    pub flight_number: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: f64,
    pub is_recommended: bool,
    pub stop_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub route: RouteSummary,
    pub price_series: Vec<PricePoint>,
    pub flights: Vec<FlightOption>,
    /// Populated when the backend splits results into outbound/return legs.
    pub return_flights: Vec<FlightOption>,
    pub is_live_data: bool,
}

/// Placeholder price shape: a dip around the reference fare, mirroring a
/// typical week of fares.
const PLACEHOLDER_PRICES: [f64; 7] = [450.0, 420.0, 390.0, 380.0, 410.0, 480.0, 520.0];
const PLACEHOLDER_REFERENCE: f64 = 380.0;

impl DashboardData {
    /// Synthesize deterministic placeholder data for a route. Dates roll
    /// forward from today so the panel always shows an upcoming week.
    pub fn placeholder(route: &RouteHint) -> Self {
        let today = Utc::now().date_naive();
        let price_series = PLACEHOLDER_PRICES
            .iter()
            .enumerate()
            .map(|(i, price)| PricePoint {
                date: (today + Duration::days(i as i64)).format("%b %d").to_string(),
                price: *price,
                reference_price: PLACEHOLDER_REFERENCE,
            })
            .collect();

        let display_date = (today + Duration::days(3)).format("%b %d, %Y").to_string();

        Self {
            route: RouteSummary {
                origin_name: route.origin.clone(),
                destination_name: route.destination.clone(),
                origin_code: airport_code(&route.origin),
                destination_code: airport_code(&route.destination),
                display_date,
            },
            price_series,
            flights: placeholder_flights(),
            return_flights: Vec::new(),
            is_live_data: false,
        }
    }

    /// Build dashboard data from the backend's optional travel-data payload.
    /// Lenient by contract: any missing or malformed piece degrades to the
    /// placeholder equivalent instead of erroring.
    pub fn from_backend(value: &serde_json::Value, fallback_route: &RouteHint) -> Self {
        let fallback = Self::placeholder(fallback_route);

        let route = value
            .get("route")
            .map(|r| RouteSummary {
                origin_name: str_or(r, "departure", &fallback.route.origin_name),
                destination_name: str_or(r, "destination", &fallback.route.destination_name),
                origin_code: str_or(r, "departureCode", &fallback.route.origin_code),
                destination_code: str_or(r, "destinationCode", &fallback.route.destination_code),
                display_date: str_or(r, "date", &fallback.route.display_date),
            })
            .unwrap_or_else(|| fallback.route.clone());

        let price_series: Vec<PricePoint> = value
            .get("priceData")
            .and_then(|v| v.as_array())
            .map(|points| points.iter().filter_map(parse_price_point).collect())
            .unwrap_or_default();

        let flights: Vec<FlightOption> = value
            .get("flights")
            .and_then(|v| v.as_array())
            .map(|options| options.iter().filter_map(parse_flight).collect())
            .unwrap_or_default();

        let return_flights: Vec<FlightOption> = value
            .get("returnFlights")
            .and_then(|v| v.as_array())
            .map(|options| options.iter().filter_map(parse_flight).collect())
            .unwrap_or_default();

        Self {
            route,
            price_series: if price_series.is_empty() {
                fallback.price_series
            } else {
                price_series
            },
            flights: if flights.is_empty() {
                fallback.flights
            } else {
                flights
            },
            return_flights,
            is_live_data: true,
        }
    }
}

fn parse_price_point(value: &serde_json::Value) -> Option<PricePoint> {
    Some(PricePoint {
        date: value.get("date")?.as_str()?.to_string(),
        price: number(value.get("price")?)?,
        reference_price: value
            .get("optimal")
            .and_then(number)
            .unwrap_or(PLACEHOLDER_REFERENCE),
    })
}

fn parse_flight(value: &serde_json::Value) -> Option<FlightOption> {
    Some(FlightOption {
        id: str_or(value, "id", ""),
        carrier_name: value.get("airline")?.as_str()?.to_string(),
        flight_number: str_or(value, "flightNumber", ""),
        departure_time: str_or(value, "departure", ""),
        arrival_time: str_or(value, "arrival", ""),
        duration: str_or(value, "duration", ""),
        price: value.get("price").and_then(number).unwrap_or(0.0),
        is_recommended: value
            .get("isOptimal")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        stop_count: value.get("stops").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
    })
}

fn number(value: &serde_json::Value) -> Option<f64> {
    value.as_f64()
}

fn str_or(value: &serde_json::Value, key: &str, fallback: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn placeholder_flights() -> Vec<FlightOption> {
    let raw: [(&str, &str, &str, &str, &str, &str, f64, bool, u32); 6] = [
        ("1", "Delta Airlines", "DL 1234", "08:00 AM", "11:30 AM", "3h 30m", 380.0, true, 0),
        ("2", "United Airlines", "UA 5678", "10:15 AM", "02:00 PM", "3h 45m", 395.0, true, 0),
        ("3", "American Airlines", "AA 9012", "01:30 PM", "05:15 PM", "3h 45m", 420.0, false, 0),
        ("4", "Southwest Airlines", "WN 3456", "06:00 AM", "11:45 AM", "5h 45m", 310.0, true, 1),
        ("5", "JetBlue Airways", "B6 7890", "03:00 PM", "06:45 PM", "3h 45m", 450.0, false, 0),
        ("6", "Spirit Airlines", "NK 2345", "07:30 AM", "01:30 PM", "6h 00m", 290.0, false, 1),
    ];
    raw.iter()
        .map(
            |(id, carrier, number, dep, arr, duration, price, recommended, stops)| FlightOption {
                id: (*id).into(),
                carrier_name: (*carrier).into(),
                flight_number: (*number).into(),
                departure_time: (*dep).into(),
                arrival_time: (*arr).into(),
                duration: (*duration).into(),
                price: *price,
                is_recommended: *recommended,
                stop_count: *stops,
            },
        )
        .collect()
}

/// Best-effort city-to-airport mapping for placeholder routes. Unknown
/// cities fall back to the first three letters uppercased.
pub fn airport_code(city: &str) -> String {
    let known: &[(&str, &str)] = &[
        ("new york", "JFK"),
        ("los angeles", "LAX"),
        ("san francisco", "SFO"),
        ("chicago", "ORD"),
        ("miami", "MIA"),
        ("boston", "BOS"),
        ("seattle", "SEA"),
        ("london", "LHR"),
        ("paris", "CDG"),
        ("rome", "FCO"),
        ("madrid", "MAD"),
        ("berlin", "BER"),
        ("amsterdam", "AMS"),
        ("tokyo", "NRT"),
        ("seoul", "ICN"),
        ("singapore", "SIN"),
        ("hong kong", "HKG"),
        ("sydney", "SYD"),
        ("dubai", "DXB"),
        ("toronto", "YYZ"),
    ];
    let lower = city.trim().to_lowercase();
    if let Some((_, code)) = known.iter().find(|(name, _)| *name == lower) {
        return (*code).to_string();
    }
    lower
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}
