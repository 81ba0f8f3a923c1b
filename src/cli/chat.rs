// src/cli/chat.rs — Interactive chat REPL

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::chat::{ConversationController, HttpChatBackend};
use crate::cli::render;
use crate::context::{ClientContext, ContextResolver};
use crate::infra::config::Config;
use crate::session::SessionId;
use crate::transcript::ChatTurn;
use crate::trigger::TriggerVocabulary;

/// Run the interactive chat session.
pub async fn run_chat(config: &Config, no_tui: bool, no_location: bool) -> anyhow::Result<()> {
    // Context is resolved once, before the first prompt, then frozen.
    let mut resolver = ContextResolver::new(&config.geocoder);
    if config.geocoder.enabled && !no_location {
        resolver = resolver.with_geolocation(crate::context::system_geolocation());
    }
    let context = resolver.resolve().await;
    debug!(timezone = %context.timezone, locale = %context.locale, "session context resolved");

    let session_id = SessionId::generate();
    let backend = Arc::new(HttpChatBackend::new(
        config.backend.resolved_base_url(),
        Duration::from_secs(config.backend.timeout_seconds),
    ));
    let mut controller = ConversationController::new(
        backend,
        Some(context.clone()),
        session_id,
        TriggerVocabulary::from_name(&config.trigger.vocabulary),
    );

    let welcome = welcome_message(&context);
    controller.seed(ChatTurn::assistant(welcome.clone()));
    println!("{welcome}\n");

    if !config.ui.quick_replies.is_empty() {
        println!("Try: {}\n", config.ui.quick_replies.join("  ·  "));
    }

    let plain_dashboard = no_tui || config.ui.plain;

    while let Some(input) = read_input() {
        let trimmed = input.trim();
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        eprintln!("…");
        match controller.submit(trimmed).await {
            Some(outcome) => {
                if outcome.failed {
                    if let Some(banner) = controller.last_error() {
                        eprintln!("[!] {banner}");
                    }
                    println!(
                        "miles {} ─ {}\n",
                        outcome.reply.display_timestamp, outcome.reply.content
                    );
                    continue;
                }

                println!(
                    "miles {} ─ {}\n",
                    outcome.reply.display_timestamp,
                    render::render_assistant(&outcome.reply.content)
                );

                if outcome.dashboard_raised {
                    if let Some(data) = controller.dashboard() {
                        if plain_dashboard {
                            println!("{}\n", render::render_dashboard_plain(data));
                        } else {
                            crate::tui::show_dashboard(data)?;
                        }
                    }
                    controller.dismiss_dashboard();
                }
            }
            None => {
                // Rejected submission: a turn is still in flight or the
                // input reduced to nothing. Nothing was appended.
                continue;
            }
        }
    }

    Ok(())
}

/// Greeting for the seeded first assistant turn, personalized from whatever
/// the context resolution produced.
pub fn welcome_message(context: &ClientContext) -> String {
    let place = context.location.as_ref().and_then(|location| {
        match (location.city.as_deref(), location.country.as_deref()) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (None, Some(country)) => Some(country.to_string()),
            (Some(city), None) => Some(city.to_string()),
            (None, None) => None,
        }
    });

    match place {
        Some(place) => format!(
            "Hi! I'm Miles, your AI travel assistant. I see you're in {place} — \
             where would you like to go? I can help you plan trips, find flights, \
             and build day-by-day itineraries."
        ),
        None => "Hi! I'm Miles, your AI travel assistant. Where would you like to go? \
                 I can help you plan trips, find flights, and build day-by-day itineraries."
            .to_string(),
    }
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::UserLocation;
    use chrono::Utc;

    fn context_with(location: Option<UserLocation>) -> ClientContext {
        ClientContext {
            resolved_at_utc: Utc::now(),
            timezone: "UTC".into(),
            locale: "en-US".into(),
            location,
        }
    }

    #[test]
    fn test_welcome_with_city_and_country() {
        let message = welcome_message(&context_with(Some(UserLocation {
            city: Some("Paris".into()),
            country: Some("France".into()),
            ..Default::default()
        })));
        assert!(message.contains("I see you're in Paris, France"));
    }

    #[test]
    fn test_welcome_country_only() {
        let message = welcome_message(&context_with(Some(UserLocation {
            country: Some("Japan".into()),
            ..Default::default()
        })));
        assert!(message.contains("I see you're in Japan"));
    }

    #[test]
    fn test_welcome_without_location() {
        let message = welcome_message(&context_with(None));
        assert!(!message.contains("I see you're in"));
        assert!(message.contains("Miles"));
    }
}
