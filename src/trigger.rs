// src/trigger.rs — Dashboard trigger heuristic
//
// A pure keyword heuristic decides whether a user message should raise the
// flight dashboard, and a best-effort regex pass extracts an origin and
// destination to seed placeholder data. Deliberately coarse: recall is
// favored over precision, and the broad vocabulary accepts false positives
// from common prepositions.

use regex::Regex;
use std::sync::OnceLock;

/// Price- and flight-specific terms. The default vocabulary.
const PRICE_TERMS: &[&str] = &[
    "flight",
    "flights",
    "fly",
    "flying",
    "airfare",
    "airline",
    "airlines",
    "plane ticket",
    "price",
    "prices",
    "cheap",
    "cheapest",
    "cost",
    "fare",
    "fares",
    "ticket",
    "tickets",
    "book a",
    "booking",
];

/// Additional terms for the broad vocabulary. Includes bare prepositions,
/// which trigger far more often.
const BROAD_EXTRA_TERMS: &[&str] = &[
    "travel",
    "trip",
    "airport",
    "depart",
    "departure",
    "arrive",
    "return",
    "deal",
    "deals",
    " to ",
    " from ",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerVocabulary {
    /// Price/flight-specific list.
    #[default]
    PriceTerms,
    /// Superset including generic travel words and prepositions.
    Broad,
}

impl TriggerVocabulary {
    /// Config-facing names: "price" (default) and "broad".
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "broad" => TriggerVocabulary::Broad,
            _ => TriggerVocabulary::PriceTerms,
        }
    }
}

/// Case-insensitive substring match against the selected vocabulary.
/// Pure: identical input always yields identical output.
pub fn should_trigger(text: &str, vocabulary: TriggerVocabulary) -> bool {
    let lower = text.to_lowercase();
    let price_hit = PRICE_TERMS.iter().any(|term| lower.contains(term));
    match vocabulary {
        TriggerVocabulary::PriceTerms => price_hit,
        TriggerVocabulary::Broad => {
            price_hit || BROAD_EXTRA_TERMS.iter().any(|term| lower.contains(term))
        }
    }
}

/// Advisory origin/destination pair extracted from a message. Feeds
/// placeholder dashboard data only, never a booking action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHint {
    pub origin: String,
    pub destination: String,
}

pub const DEFAULT_ORIGIN: &str = "New York";
pub const DEFAULT_DESTINATION: &str = "Los Angeles";

impl Default for RouteHint {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.into(),
            destination: DEFAULT_DESTINATION.into(),
        }
    }
}

struct RoutePatterns {
    pair: Vec<Regex>,
    destination_only: Regex,
}

fn route_patterns() -> &'static RoutePatterns {
    static PATTERNS: OnceLock<RoutePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| RoutePatterns {
        pair: vec![
            Regex::new(r"(?i)\bfrom\s+([a-z][a-z .'-]*?)\s+to\s+([a-z][a-z .'-]*?)(?:\s+(?:on|in|next|this|for|at|by)\b|[.,!?;]|$)")
                .expect("static pattern"),
            Regex::new(r"(?i)\bbetween\s+([a-z][a-z .'-]*?)\s+and\s+([a-z][a-z .'-]*?)(?:\s+(?:on|in|next|this|for|at|by)\b|[.,!?;]|$)")
                .expect("static pattern"),
        ],
        destination_only: Regex::new(
            r"(?i)\b(?:to|for)\s+([a-z][a-z .'-]*?)(?:\s+(?:on|in|next|this|from|for|at|by)\b|[.,!?;]|$)",
        )
        .expect("static pattern"),
    })
}

/// Ordered patterns, first match wins; no match falls back to the fixed
/// placeholder pair.
pub fn extract_route(text: &str) -> RouteHint {
    let patterns = route_patterns();

    for pattern in &patterns.pair {
        if let Some(caps) = pattern.captures(text) {
            let origin = clean_place(&caps[1]);
            let destination = clean_place(&caps[2]);
            if !origin.is_empty() && !destination.is_empty() {
                return RouteHint {
                    origin,
                    destination,
                };
            }
        }
    }

    if let Some(caps) = patterns.destination_only.captures(text) {
        let destination = clean_place(&caps[1]);
        if !destination.is_empty() {
            return RouteHint {
                origin: DEFAULT_ORIGIN.into(),
                destination,
            };
        }
    }

    RouteHint::default()
}

/// Trim a captured place name and title-case each word.
fn clean_place(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
