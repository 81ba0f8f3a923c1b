// src/cli/render.rs — Terminal rendering for assistant replies

use crate::content::{AssistantContent, Itinerary, LocationCard};
use crate::dashboard::{DashboardData, FlightOption};

/// Render an assistant reply, picking the structured form when present.
pub fn render_assistant(content: &str) -> String {
    match crate::content::parse_assistant_content(content) {
        AssistantContent::Plain(text) => render_markdown(&text),
        AssistantContent::Itinerary(itinerary) => render_itinerary(&itinerary),
        AssistantContent::Locations(cards) => render_locations(&cards),
    }
}

/// Light markdown-to-terminal pass: headings, bullets, numbered lists and
/// pipe tables get consistent indentation; everything else passes through.
pub fn render_markdown(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(heading) = trimmed
            .strip_prefix("### ")
            .or_else(|| trimmed.strip_prefix("## "))
            .or_else(|| trimmed.strip_prefix("# "))
        {
            out.push_str(&format!("\n{}\n", heading.to_uppercase()));
        } else if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* "))
        {
            out.push_str(&format!("  • {}\n", strip_emphasis(item)));
        } else if is_numbered_item(trimmed) {
            out.push_str(&format!("  {}\n", strip_emphasis(trimmed)));
        } else if trimmed.starts_with('|') {
            // Pipe tables: drop the separator row, align the cells.
            if !is_table_separator(trimmed) {
                let cells: Vec<&str> = trimmed
                    .trim_matches('|')
                    .split('|')
                    .map(str::trim)
                    .collect();
                out.push_str(&format!("  {}\n", cells.join("  ")));
            }
        } else {
            out.push_str(&strip_emphasis(line));
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}

fn is_numbered_item(line: &str) -> bool {
    let mut saw_digit = false;
    for c in line.chars() {
        if c.is_ascii_digit() {
            saw_digit = true;
        } else {
            return saw_digit && (c == '.' || c == ')');
        }
    }
    false
}

fn is_table_separator(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("__", "")
}

pub fn render_itinerary(itinerary: &Itinerary) -> String {
    let mut out = String::new();
    for day in &itinerary.days {
        out.push_str(&format!("┌─ Day {}", day.day));
        if let Some(title) = &day.title {
            out.push_str(&format!(" — {title}"));
        }
        out.push('\n');
        if let Some(weather) = &day.weather {
            out.push_str(&format!("│  {weather}\n"));
        }
        for activity in &day.activities {
            match &activity.time {
                Some(time) => out.push_str(&format!("│  {time}  {}\n", activity.title)),
                None => out.push_str(&format!("│  {}\n", activity.title)),
            }
            if let Some(description) = &activity.description {
                out.push_str(&format!("│      {description}\n"));
            }
        }
        out.push_str("└─\n");
    }
    out.trim_end().to_string()
}

pub fn render_locations(cards: &[LocationCard]) -> String {
    let mut out = String::new();
    for card in cards {
        out.push_str(&format!("◈ {}", card.name));
        let mut extras = Vec::new();
        if let Some(rating) = card.rating {
            extras.push(format!("★ {rating:.1}"));
        }
        if let Some(price) = &card.price {
            extras.push(price.clone());
        }
        if !extras.is_empty() {
            out.push_str(&format!("  ({})", extras.join(", ")));
        }
        out.push('\n');
        if let Some(description) = &card.description {
            out.push_str(&format!("  {description}\n"));
        }
    }
    out.trim_end().to_string()
}

/// Plain-text dashboard for `--no-tui` terminals: route header, the weekly
/// fare list against the reference price, then the flight table.
pub fn render_dashboard_plain(data: &DashboardData) -> String {
    let mut out = String::new();
    let route = &data.route;
    out.push_str(&format!(
        "Flights: {} ({}) → {} ({})  ·  {}{}\n\n",
        route.origin_name,
        route.origin_code,
        route.destination_name,
        route.destination_code,
        route.display_date,
        if data.is_live_data { "" } else { "  [sample data]" },
    ));

    out.push_str("Price trend:\n");
    for point in &data.price_series {
        let marker = if point.price <= point.reference_price {
            " ← best"
        } else {
            ""
        };
        out.push_str(&format!("  {}  ${:>6.0}{}\n", point.date, point.price, marker));
    }

    out.push('\n');
    out.push_str(&flight_table("Flights", &data.flights));
    if !data.return_flights.is_empty() {
        out.push('\n');
        out.push_str(&flight_table("Return flights", &data.return_flights));
    }
    out.trim_end().to_string()
}

fn flight_table(title: &str, flights: &[FlightOption]) -> String {
    let mut out = format!("{title}:\n");
    for flight in flights {
        out.push_str(&format!(
            "  {:<20} {:<9} {} → {}  {:<7} {:>8}  {}{}\n",
            flight.carrier_name,
            flight.flight_number,
            flight.departure_time,
            flight.arrival_time,
            flight.duration,
            format!("${:.0}", flight.price),
            match flight.stop_count {
                0 => "nonstop".to_string(),
                1 => "1 stop".to_string(),
                n => format!("{n} stops"),
            },
            if flight.is_recommended { "  ✓" } else { "" },
        ));
    }
    out
}
