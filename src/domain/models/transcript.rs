//! Conversation transcript model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::strategy::AgentPersona;

/// One utterance in a simulated conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: AgentPersona,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(speaker: AgentPersona, content: impl Into<String>) -> Self {
        Self {
            speaker,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered turns produced by one orchestration run.
///
/// Only the orchestrator appends; everything downstream reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationTranscript {
    turns: Vec<Turn>,
}

impl ConversationTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, speaker: AgentPersona, content: impl Into<String>) {
        self.turns.push(Turn::new(speaker, content));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// All turn contents joined with single spaces.
    pub fn full_text(&self) -> String {
        self.turns
            .iter()
            .map(|t| t.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Contents of turns spoken by `persona`, joined with single spaces.
    pub fn text_by(&self, persona: AgentPersona) -> String {
        self.turns_by(persona)
            .map(|t| t.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn turns_by(&self, persona: AgentPersona) -> impl DoubleEndedIterator<Item = &Turn> {
        self.turns.iter().filter(move |t| t.speaker == persona)
    }

    /// Most recent turn spoken by any rep persona.
    pub fn last_rep(&self) -> Option<AgentPersona> {
        self.turns
            .iter()
            .rev()
            .map(|t| t.speaker)
            .find(AgentPersona::is_rep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConversationTranscript {
        let mut transcript = ConversationTranscript::new();
        transcript.push(AgentPersona::SmbRep, "Hi there");
        transcript.push(AgentPersona::Prospect, "Hello");
        transcript.push(AgentPersona::TechnicalRep, "Let me explain the API");
        transcript.push(AgentPersona::Prospect, "Sounds good");
        transcript
    }

    #[test]
    fn test_full_text_and_filters() {
        let transcript = sample();

        assert_eq!(transcript.len(), 4);
        assert_eq!(
            transcript.full_text(),
            "Hi there Hello Let me explain the API Sounds good"
        );
        assert_eq!(transcript.text_by(AgentPersona::Prospect), "Hello Sounds good");
        assert_eq!(transcript.turns_by(AgentPersona::Manager).count(), 0);
    }

    #[test]
    fn test_last_rep() {
        let transcript = sample();
        assert_eq!(transcript.last_rep(), Some(AgentPersona::TechnicalRep));
        assert_eq!(ConversationTranscript::new().last_rep(), None);
    }

    #[test]
    fn test_empty() {
        let transcript = ConversationTranscript::new();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
        assert_eq!(transcript.full_text(), "");
    }
}
