// src/transcript.rs — Append-only conversation transcript

use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript. Immutable once appended; the display
/// timestamp is assigned at creation and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub display_timestamp: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::now(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::now(Role::Assistant, content)
    }

    /// Turn with an explicit display timestamp (tests, replayed transcripts).
    pub fn at(role: Role, content: impl Into<String>, display_timestamp: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            display_timestamp: display_timestamp.into(),
        }
    }

    fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            display_timestamp: Local::now().format("%H:%M").to_string(),
        }
    }
}

/// The single source of truth for what is rendered. Append-only: no
/// deletion, no in-place edit; display order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_preserves_order() {
        let mut t = Transcript::new();
        t.push(ChatTurn::at(Role::Assistant, "welcome", "09:00"));
        t.push(ChatTurn::at(Role::User, "hi", "09:01"));
        t.push(ChatTurn::at(Role::Assistant, "hello", "09:01"));
        let contents: Vec<&str> = t.turns().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["welcome", "hi", "hello"]);
    }

    #[test]
    fn test_timestamp_fixed_at_creation() {
        let turn = ChatTurn::at(Role::User, "hi", "08:30");
        assert_eq!(turn.display_timestamp, "08:30");
        let copy = turn.clone();
        assert_eq!(copy.display_timestamp, "08:30");
    }

    #[test]
    fn test_constructors_set_role() {
        assert_eq!(ChatTurn::user("a").role, Role::User);
        assert_eq!(ChatTurn::assistant("b").role, Role::Assistant);
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_empty_and_len() {
        let mut t = Transcript::new();
        assert!(t.is_empty());
        t.push(ChatTurn::user("x"));
        assert_eq!(t.len(), 1);
        assert_eq!(t.last().unwrap().content, "x");
    }
}
