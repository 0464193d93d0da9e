//! Text generation request models.
//!
//! A generation request is one persona asking the backend for its next
//! utterance. The backend sees the persona's system prompt plus the
//! conversation so far, rewritten from that persona's point of view.

use serde::{Deserialize, Serialize};

use super::config::PersonaSettings;
use super::strategy::AgentPersona;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request for a single persona utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Persona the text is generated for
    pub persona: AgentPersona,
    /// Role instructions for the persona
    pub system_prompt: String,
    /// Conversation so far, oldest first
    pub messages: Vec<ChatMessage>,
    /// Model override; the backend default is used when absent
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the backend for a JSON object response
    pub json_output: bool,
    pub seed: Option<u64>,
}

impl GenerationRequest {
    pub fn new(persona: AgentPersona, system_prompt: impl Into<String>) -> Self {
        Self {
            persona,
            system_prompt: system_prompt.into(),
            messages: vec![],
            model: None,
            temperature: 0.7,
            max_tokens: 2000,
            json_output: false,
            seed: None,
        }
    }

    /// Apply a persona's sampling settings.
    pub fn with_settings(mut self, settings: &PersonaSettings) -> Self {
        self.temperature = settings.temperature;
        self.max_tokens = settings.max_tokens;
        self.json_output = settings.json_output;
        self
    }

    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}
