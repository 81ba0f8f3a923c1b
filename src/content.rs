// src/content.rs — Structured assistant content
//
// An assistant reply may embed one fenced code block labeled `itinerary` or
// `location` carrying a JSON payload. Parsing is best-effort at the
// rendering boundary: a malformed block falls back to the raw text as plain
// formatted content and never fails the message.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum AssistantContent {
    Plain(String),
    Itinerary(Itinerary),
    Locations(Vec<LocationCard>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub days: Vec<ItineraryDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCard {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price: Option<String>,
}

/// Parse an assistant reply into structured content. Recognizes the first
/// fenced block labeled `itinerary` or `location`; anything else (including
/// a labeled block with invalid JSON) renders as plain text.
pub fn parse_assistant_content(content: &str) -> AssistantContent {
    match find_labeled_block(content) {
        Some((label, payload)) => match label.as_str() {
            "itinerary" => serde_json::from_str::<Itinerary>(&payload)
                .map(AssistantContent::Itinerary)
                .unwrap_or_else(|_| AssistantContent::Plain(content.to_string())),
            "location" => parse_locations(&payload)
                .map(AssistantContent::Locations)
                .unwrap_or_else(|| AssistantContent::Plain(content.to_string())),
            _ => AssistantContent::Plain(content.to_string()),
        },
        None => AssistantContent::Plain(content.to_string()),
    }
}

/// The location payload may be a single object or an array of objects.
fn parse_locations(payload: &str) -> Option<Vec<LocationCard>> {
    if let Ok(cards) = serde_json::from_str::<Vec<LocationCard>>(payload) {
        return Some(cards);
    }
    serde_json::from_str::<LocationCard>(payload)
        .ok()
        .map(|card| vec![card])
}

/// Scan markdown for the first fenced code block whose info string is
/// `itinerary` or `location`, returning the label and the block body.
fn find_labeled_block(content: &str) -> Option<(String, String)> {
    let mut label: Option<String> = None;
    let mut body = String::new();
    let mut inside = false;

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let info = info.trim().to_lowercase();
                if info == "itinerary" || info == "location" {
                    label = Some(info);
                    inside = true;
                    body.clear();
                }
            }
            Event::Text(text) if inside => {
                body.push_str(&text);
            }
            Event::End(TagEnd::CodeBlock) if inside => {
                return label.map(|l| (l, body.clone()));
            }
            _ => {}
        }
    }
    None
}
