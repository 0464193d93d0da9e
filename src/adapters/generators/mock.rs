//! Mock text generator for testing and offline runs.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentPersona, GenerationRequest};
use crate::domain::ports::TextGenerator;

/// Scripted reply for a single generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Return this text
    Success(String),
    /// Fail with `GenerationFailed`
    Failure(String),
    /// Fail with `GenerationTimeout`
    Timeout(u64),
}

impl MockResponse {
    pub fn success(output: impl Into<String>) -> Self {
        Self::Success(output.into())
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(error.into())
    }
}

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<MockResponse>,
    requests: Vec<GenerationRequest>,
}

/// Mock generator.
///
/// Replies come from the scripted queue first, then from per-persona
/// overrides, then from built-in sales-call lines. Clones share the queue
/// and the call counter, so a test can keep a handle after passing the
/// generator to a service.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    state: Arc<Mutex<MockState>>,
    calls: Arc<AtomicU32>,
    persona_responses: HashMap<AgentPersona, String>,
    persistent_failure: Option<String>,
    delay: Option<Duration>,
    available: bool,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            calls: Arc::new(AtomicU32::new(0)),
            persona_responses: HashMap::new(),
            persistent_failure: None,
            delay: None,
            available: true,
        }
    }

    /// Queue scripted responses, consumed in order.
    pub fn with_script(self, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        self.push_responses(responses);
        self
    }

    /// Always answer `persona` with `text` once the script is exhausted.
    pub fn with_persona_response(mut self, persona: AgentPersona, text: impl Into<String>) -> Self {
        self.persona_responses.insert(persona, text.into());
        self
    }

    /// Fail every call that has no scripted response.
    pub fn with_failure(mut self, error: impl Into<String>) -> Self {
        self.persistent_failure = Some(error.into());
        self
    }

    /// Sleep before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Report the backend as unconfigured.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn push_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        if let Ok(mut state) = self.state.lock() {
            state.script.extend(responses);
        }
    }

    /// Number of `generate` calls so far, including failed ones.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.state
            .lock()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    fn next_scripted(&self, request: &GenerationRequest) -> Option<MockResponse> {
        let mut state = self.state.lock().ok()?;
        state.requests.push(request.clone());
        state.script.pop_front()
    }

    fn default_reply(&self, request: &GenerationRequest) -> MockResponse {
        if let Some(error) = &self.persistent_failure {
            return MockResponse::Failure(error.clone());
        }
        if let Some(text) = self.persona_responses.get(&request.persona) {
            return MockResponse::Success(text.clone());
        }
        MockResponse::Success(canned_line(request))
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn canned_line(request: &GenerationRequest) -> String {
    match request.persona {
        AgentPersona::Prospect => "That sounds interesting. Integration with our API gateway \
            and security reviews are our main concerns. Could you walk me through a demo?"
            .to_string(),
        AgentPersona::Manager => r#"{"conversion_probability": 0.6, "recommended_approach": "Schedule technical demo", "insights": ["Prospect engaged on integration topics"], "objections": [], "success_factors": ["Clear interest in a demo"], "risk_factors": ["Security review pending"], "conversation_summary": "Productive discovery call with technical interest"}"#
            .to_string(),
        AgentPersona::Coordinator => {
            let prospect_spoke_last = request
                .messages
                .iter()
                .rev()
                .nth(1)
                .is_some_and(|m| m.content.starts_with("Prospect:"));
            if prospect_spoke_last {
                "The rep should follow up on that.".to_string()
            } else {
                "NEXT: prospect\nINSTRUCTION: Respond to the latest question.".to_string()
            }
        }
        rep => {
            let line = format!(
                "Thanks for your time. As the {} I'd like to understand your current workflow \
                 and where it slows your team down.",
                rep.title()
            );
            if request.json_output {
                serde_json::json!({ "message": line, "handoff": null }).to_string()
            } else {
                line
            }
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_available(&self) -> DomainResult<bool> {
        Ok(self.available)
    }

    async fn generate(&self, request: GenerationRequest) -> DomainResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self
            .next_scripted(&request)
            .unwrap_or_else(|| self.default_reply(&request));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match response {
            MockResponse::Success(text) => Ok(text),
            MockResponse::Failure(error) => Err(DomainError::GenerationFailed(error)),
            MockResponse::Timeout(seconds) => Err(DomainError::GenerationTimeout { seconds }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ChatMessage;

    #[tokio::test]
    async fn test_script_then_defaults() {
        let generator = MockGenerator::new().with_script([
            MockResponse::success("first"),
            MockResponse::failure("second fails"),
        ]);
        let request = GenerationRequest::new(AgentPersona::Prospect, "system");

        assert_eq!(generator.generate(request.clone()).await.unwrap(), "first");
        assert!(generator.generate(request.clone()).await.is_err());
        assert!(generator.generate(request).await.unwrap().contains("demo"));
        assert_eq!(generator.call_count(), 3);
        assert_eq!(generator.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let generator = MockGenerator::new();
        let handle = generator.clone();

        generator
            .generate(GenerationRequest::new(AgentPersona::SmbRep, "system"))
            .await
            .unwrap();

        assert_eq!(handle.call_count(), 1);
    }

    #[tokio::test]
    async fn test_json_rep_reply() {
        let generator = MockGenerator::new();
        let mut request = GenerationRequest::new(AgentPersona::EnterpriseRep, "system");
        request.json_output = true;

        let reply = generator.generate(request).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();

        assert!(value["message"].as_str().unwrap().contains("Enterprise Rep"));
    }

    #[tokio::test]
    async fn test_persona_override_and_failure() {
        let generator =
            MockGenerator::new().with_persona_response(AgentPersona::Prospect, "not interested");
        let reply = generator
            .generate(GenerationRequest::new(AgentPersona::Prospect, "s"))
            .await
            .unwrap();
        assert_eq!(reply, "not interested");

        let failing = MockGenerator::new().with_failure("down");
        let err = failing
            .generate(GenerationRequest::new(AgentPersona::Prospect, "s"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::GenerationFailed(_)));
    }

    #[tokio::test]
    async fn test_coordinator_defaults() {
        let generator = MockGenerator::new();
        let after_prospect = GenerationRequest::new(AgentPersona::Coordinator, "s").with_messages(vec![
            ChatMessage::user("Prospect: tell me more"),
            ChatMessage::user("Who should speak next?"),
        ]);
        let after_rep = GenerationRequest::new(AgentPersona::Coordinator, "s").with_messages(vec![
            ChatMessage::user("SMB Rep: hello"),
            ChatMessage::user("Who should speak next?"),
        ]);

        assert!(!generator.generate(after_prospect).await.unwrap().contains("NEXT:"));
        assert!(generator.generate(after_rep).await.unwrap().starts_with("NEXT: prospect"));
    }

    #[tokio::test]
    async fn test_unavailable() {
        assert!(!MockGenerator::new().unavailable().is_available().await.unwrap());
    }
}
