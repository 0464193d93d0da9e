//! Multi-persona conversation engine.
//!
//! Drives one simulated sales call against a [`TextGenerator`], one turn at
//! a time. The whole run sits under a wall-clock timeout and every backend
//! call is raced against the caller's cancellation token. Failures never
//! leak a partial transcript.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentPersona, ChatMessage, ConversationTranscript, GenerationRequest, LeadRecord,
    OrchestrationPattern, RoleSettings, SimulationStrategy, TechnicalDepth,
};
use crate::domain::ports::TextGenerator;
use crate::services::{prompts, routing};

/// Runtime knobs for one orchestrator instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    /// Wall-clock limit for the whole conversation
    pub timeout: Duration,
    /// Model override passed to every generation call
    pub model: Option<String>,
    pub seed: Option<u64>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            model: None,
            seed: None,
        }
    }
}

impl OrchestratorSettings {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

pub struct ConversationOrchestrator {
    generator: Arc<dyn TextGenerator>,
    roles: RoleSettings,
    settings: OrchestratorSettings,
}

impl ConversationOrchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        roles: RoleSettings,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            generator,
            roles,
            settings,
        }
    }

    /// Participants of a conversation for the given strategy.
    pub fn roster(strategy: &SimulationStrategy) -> Vec<AgentPersona> {
        let mut roster = vec![strategy.primary_persona];
        if strategy.technical_depth != TechnicalDepth::Standard
            && strategy.primary_persona != AgentPersona::TechnicalRep
        {
            roster.push(AgentPersona::TechnicalRep);
        }
        roster.push(AgentPersona::Prospect);
        roster.push(AgentPersona::Manager);
        roster
    }

    /// Run one conversation to completion.
    ///
    /// Returns [`DomainError::GenerationTimeout`] when the wall-clock limit
    /// is exceeded and [`DomainError::Cancelled`] when `cancel` fires.
    #[instrument(skip_all, fields(company = %lead.company_name, pattern = pattern.as_str()))]
    pub async fn run(
        &self,
        lead: &LeadRecord,
        strategy: &SimulationStrategy,
        pattern: OrchestrationPattern,
        cancel: &CancellationToken,
    ) -> DomainResult<ConversationTranscript> {
        let started = Instant::now();
        let conversation = self.converse(lead, strategy, pattern, cancel);

        let transcript = tokio::time::timeout(self.settings.timeout, conversation)
            .await
            .map_err(|_| DomainError::GenerationTimeout {
                seconds: self.settings.timeout.as_secs(),
            })??;

        info!(
            turns = transcript.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "conversation completed"
        );
        Ok(transcript)
    }

    async fn converse(
        &self,
        lead: &LeadRecord,
        strategy: &SimulationStrategy,
        pattern: OrchestrationPattern,
        cancel: &CancellationToken,
    ) -> DomainResult<ConversationTranscript> {
        let roster = Self::roster(strategy);
        let task = prompts::opening_task(lead, strategy, pattern);
        let max_turns = strategy.max_turns as usize;
        let mut transcript = ConversationTranscript::new();

        while transcript.len() < max_turns {
            let (speaker, instruction) = match pattern {
                OrchestrationPattern::RoundRobin => {
                    let cycle = [
                        strategy.primary_persona,
                        AgentPersona::Prospect,
                        AgentPersona::Manager,
                    ];
                    (cycle[transcript.len() % cycle.len()], None)
                }
                OrchestrationPattern::Handoff => {
                    match routing::next_speaker(&transcript, &roster, strategy) {
                        Some(speaker) => (speaker, None),
                        None => break,
                    }
                }
                OrchestrationPattern::Coordinated => {
                    match self
                        .coordinate(lead, strategy, &roster, &task, &mut transcript, cancel)
                        .await?
                    {
                        Some(next) => next,
                        None => break,
                    }
                }
            };

            let content = self
                .speak(
                    speaker,
                    lead,
                    strategy,
                    pattern,
                    &roster,
                    &task,
                    &transcript,
                    instruction.as_deref(),
                    cancel,
                )
                .await?;
            debug!(speaker = speaker.as_str(), turn = transcript.len() + 1, "turn generated");
            transcript.push(speaker, content);
        }

        Ok(transcript)
    }

    /// Ask the coordinator for the next speaker.
    ///
    /// The coordinator's reply is recorded as a turn. When it names no valid
    /// participant, routing picks instead. The coordinator never takes one
    /// of the last two slots: the second to last goes to routing and the
    /// last one always to the manager.
    async fn coordinate(
        &self,
        lead: &LeadRecord,
        strategy: &SimulationStrategy,
        roster: &[AgentPersona],
        task: &str,
        transcript: &mut ConversationTranscript,
        cancel: &CancellationToken,
    ) -> DomainResult<Option<(AgentPersona, Option<String>)>> {
        let max_turns = strategy.max_turns as usize;
        if transcript
            .last()
            .is_some_and(|t| t.speaker == AgentPersona::Manager)
        {
            return Ok(None);
        }
        if transcript.len() + 1 >= max_turns {
            return Ok(Some((AgentPersona::Manager, None)));
        }
        if transcript.len() + 2 >= max_turns {
            return Ok(routing::next_speaker(transcript, roster, strategy).map(|p| (p, None)));
        }

        let reply = self
            .speak(
                AgentPersona::Coordinator,
                lead,
                strategy,
                OrchestrationPattern::Coordinated,
                roster,
                task,
                transcript,
                None,
                cancel,
            )
            .await?;
        let directive = routing::parse_coordinator(&reply, roster);
        transcript.push(AgentPersona::Coordinator, reply);

        Ok(match directive {
            Some(directive) => Some((directive.next, directive.instruction)),
            None => {
                debug!("coordinator reply unusable, falling back to routing");
                routing::next_speaker(transcript, roster, strategy).map(|p| (p, None))
            }
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn speak(
        &self,
        speaker: AgentPersona,
        lead: &LeadRecord,
        strategy: &SimulationStrategy,
        pattern: OrchestrationPattern,
        roster: &[AgentPersona],
        task: &str,
        transcript: &ConversationTranscript,
        instruction: Option<&str>,
        cancel: &CancellationToken,
    ) -> DomainResult<String> {
        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        let settings = self.roles.get(speaker);
        let system_prompt =
            prompts::system_prompt(speaker, lead, strategy, pattern, roster, settings.json_output);
        let mut request = GenerationRequest::new(speaker, system_prompt)
            .with_settings(settings)
            .with_messages(conversation_messages(speaker, task, transcript, instruction))
            .with_seed(self.settings.seed);
        if let Some(model) = &self.settings.model {
            request = request.with_model(model.clone());
        }

        let raw = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(DomainError::Cancelled),
            result = self.generator.generate(request) => result?,
        };

        let content = if speaker.is_rep() && settings.json_output {
            utterance_from_json(&raw).unwrap_or(raw)
        } else {
            raw
        };
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(DomainError::GenerationFailed(format!(
                "{} backend returned an empty reply for {}",
                self.generator.name(),
                speaker
            )));
        }
        Ok(content)
    }
}

/// The conversation as seen by `speaker`: its own turns as assistant
/// messages, everyone else's as labelled user messages.
fn conversation_messages(
    speaker: AgentPersona,
    task: &str,
    transcript: &ConversationTranscript,
    instruction: Option<&str>,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::user(task)];

    for turn in transcript.turns() {
        if turn.speaker == AgentPersona::Coordinator && speaker != AgentPersona::Coordinator {
            continue;
        }
        if turn.speaker == speaker {
            messages.push(ChatMessage::assistant(turn.content.clone()));
        } else {
            messages.push(ChatMessage::user(format!(
                "{}: {}",
                turn.speaker.title(),
                turn.content
            )));
        }
    }

    if speaker == AgentPersona::Coordinator {
        messages.push(ChatMessage::user("Who should speak next?"));
    } else if let Some(instruction) = instruction {
        messages.push(ChatMessage::user(format!("Coordinator instruction: {instruction}")));
    }

    messages
}

/// Pull the spoken message (and any hand-off) out of a JSON rep reply.
fn utterance_from_json(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw.trim()).ok()?;
    let message = value.get("message")?.as_str()?.to_string();
    match value.get("handoff").and_then(|h| h.as_str()) {
        Some(target) if !target.trim().is_empty() => Some(format!(
            "{message}\n{} {}",
            routing::HANDOFF_PREFIX,
            target.trim()
        )),
        _ => Some(message),
    }
}
