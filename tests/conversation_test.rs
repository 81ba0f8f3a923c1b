// tests/conversation_test.rs — Integration tests for the conversation flow

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use miles::chat::{
    ChatBackend, ChatPayload, ChatReply, ConversationController, ERROR_BANNER, FALLBACK_REPLY,
};
use miles::infra::errors::MilesError;
use miles::session::SessionId;
use miles::transcript::{ChatTurn, Role};
use miles::trigger::TriggerVocabulary;

// ---------- Mock backends ----------

/// Records every payload it receives and replies from a canned script.
struct ScriptedBackend {
    replies: Vec<Result<ChatReply, String>>,
    calls: AtomicUsize,
    payloads: std::sync::Mutex<Vec<ChatPayload>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<Result<ChatReply, String>>) -> Self {
        Self {
            replies,
            calls: AtomicUsize::new(0),
            payloads: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn reply(text: &str) -> Result<ChatReply, String> {
        Ok(ChatReply {
            reply: text.to_string(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send(&self, payload: ChatPayload) -> Result<ChatReply, MilesError> {
        self.payloads.lock().unwrap().push(payload);
        let i = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(i) {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(message)) => Err(MilesError::Transport(message.clone())),
            None => Err(MilesError::Transport("script exhausted".into())),
        }
    }
}

fn controller(backend: Arc<ScriptedBackend>) -> ConversationController {
    ConversationController::new(
        backend,
        None,
        SessionId::generate(),
        TriggerVocabulary::PriceTerms,
    )
}

// ---------- Multi-turn conversation ----------

#[tokio::test]
async fn test_multi_turn_sends_growing_transcript() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        ScriptedBackend::reply("Paris is lovely in spring."),
        ScriptedBackend::reply("Three days is plenty for the highlights."),
    ]));
    let mut c = controller(backend.clone());
    c.seed(ChatTurn::assistant("Hi! Where would you like to go?"));

    c.submit("Tell me about Paris").await.unwrap();
    c.submit("How many days do I need?").await.unwrap();

    // Seeded welcome + 2 user + 2 assistant turns.
    assert_eq!(c.transcript().len(), 5);

    let payloads = backend.payloads.lock().unwrap();
    assert_eq!(payloads.len(), 2);
    // First request: welcome + first user turn.
    assert_eq!(payloads[0].messages.len(), 2);
    assert_eq!(payloads[0].messages[0].role, Role::Assistant);
    // Second request carries the whole history including the first reply.
    assert_eq!(payloads[1].messages.len(), 4);
    assert_eq!(
        payloads[1].messages[2].content,
        "Paris is lovely in spring."
    );
}

#[tokio::test]
async fn test_session_id_stable_across_turns() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        ScriptedBackend::reply("one"),
        ScriptedBackend::reply("two"),
    ]));
    let mut c = controller(backend.clone());

    c.submit("first").await.unwrap();
    c.submit("second").await.unwrap();

    let payloads = backend.payloads.lock().unwrap();
    let first = payloads[0].session_id.clone().unwrap();
    let second = payloads[1].session_id.clone().unwrap();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn test_failed_turn_stays_in_transcript_and_next_turn_recovers() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Err("connection refused".into()),
        ScriptedBackend::reply("Back online."),
    ]));
    let mut c = controller(backend.clone());

    let failed = c.submit("hello?").await.unwrap();
    assert!(failed.failed);
    assert_eq!(failed.reply.content, FALLBACK_REPLY);
    assert_eq!(c.last_error(), Some(ERROR_BANNER));

    let recovered = c.submit("are you there?").await.unwrap();
    assert!(!recovered.failed);
    assert!(c.last_error().is_none());

    // The fallback turn is part of history and was sent on the retry.
    let payloads = backend.payloads.lock().unwrap();
    assert!(payloads[1]
        .messages
        .iter()
        .any(|m| m.content == FALLBACK_REPLY));
    assert_eq!(c.transcript().len(), 4);
}

// ---------- Dashboard trigger end to end ----------

#[tokio::test]
async fn test_price_question_raises_dashboard_with_extracted_route() {
    let backend = Arc::new(ScriptedBackend::new(vec![ScriptedBackend::reply(
        "Fares to Tokyo dip mid-week.",
    )]));
    let mut c = controller(backend);

    let outcome = c
        .submit("Find me a cheap flight from New York to Tokyo.")
        .await
        .unwrap();
    assert!(outcome.dashboard_raised);

    let dashboard = c.dashboard().expect("dashboard raised");
    assert_eq!(dashboard.route.origin_name, "New York");
    assert_eq!(dashboard.route.destination_name, "Tokyo");
    assert_eq!(dashboard.route.origin_code, "JFK");
    assert_eq!(dashboard.route.destination_code, "NRT");
    assert!(!dashboard.is_live_data);
}

#[tokio::test]
async fn test_plain_trip_question_does_not_raise_dashboard() {
    let backend = Arc::new(ScriptedBackend::new(vec![ScriptedBackend::reply(
        "Great choice! Here's an outline.",
    )]));
    let mut c = controller(backend);

    let outcome = c.submit("Plan a trip to Paris").await.unwrap();
    assert!(!outcome.dashboard_raised);
    assert!(c.dashboard().is_none());
}

#[tokio::test]
async fn test_new_trigger_replaces_previous_dashboard() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        ScriptedBackend::reply("Checking fares."),
        ScriptedBackend::reply("Checking more fares."),
    ]));
    let mut c = controller(backend);

    c.submit("cheapest flight to Rome").await.unwrap();
    assert_eq!(c.dashboard().unwrap().route.destination_name, "Rome");

    c.submit("what about airfare to Madrid").await.unwrap();
    assert_eq!(c.dashboard().unwrap().route.destination_name, "Madrid");
}

#[tokio::test]
async fn test_live_backend_data_flows_into_dashboard() {
    let backend = Arc::new(ScriptedBackend::new(vec![Ok(ChatReply {
        reply: "Live fares found.".into(),
        data_fetched: true,
        amadeus_data: Some(serde_json::json!({
            "route": {
                "departure": "Boston",
                "destination": "London",
                "departureCode": "BOS",
                "destinationCode": "LHR",
                "date": "Oct 02, 2026"
            },
            "flights": [
                {"airline": "British Airways", "flightNumber": "BA 214",
                 "departure": "07:40 PM", "arrival": "06:55 AM",
                 "duration": "6h 15m", "price": 540.0, "isOptimal": true, "stops": 0}
            ]
        })),
    })]));
    let mut c = controller(backend);

    let outcome = c
        .submit("cheapest flight from Boston to London")
        .await
        .unwrap();
    assert!(outcome.dashboard_raised);

    let dashboard = c.dashboard().unwrap();
    assert!(dashboard.is_live_data);
    assert_eq!(dashboard.route.destination_code, "LHR");
    assert_eq!(dashboard.flights.len(), 1);
    assert_eq!(dashboard.flights[0].carrier_name, "British Airways");
}
