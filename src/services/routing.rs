//! Speaker routing for hand-off and coordinated conversations.
//!
//! The routing table and [`next_speaker`] are plain data and pure functions
//! so the conversation flow can be tested without a backend.

use crate::domain::models::{AgentPersona, ConversationTranscript, SimulationStrategy};

/// Directive a rep uses to pass the conversation on.
pub const HANDOFF_PREFIX: &str = "HANDOFF:";
/// Coordinator line naming the next speaker.
pub const NEXT_PREFIX: &str = "NEXT:";
/// Coordinator line carrying the instruction for the next speaker.
pub const INSTRUCTION_PREFIX: &str = "INSTRUCTION:";

const REP_HANDOFFS: [AgentPersona; 2] = [AgentPersona::TechnicalRep, AgentPersona::Manager];
const TECHNICAL_HANDOFFS: [AgentPersona; 3] = [
    AgentPersona::EnterpriseRep,
    AgentPersona::SmbRep,
    AgentPersona::Manager,
];

/// Personas `from` may explicitly hand the conversation to.
///
/// Reps and the prospect alternate implicitly and need no entry here.
pub fn handoff_targets(from: AgentPersona) -> &'static [AgentPersona] {
    match from {
        AgentPersona::EnterpriseRep | AgentPersona::SmbRep => &REP_HANDOFFS,
        AgentPersona::TechnicalRep => &TECHNICAL_HANDOFFS,
        AgentPersona::Prospect | AgentPersona::Manager | AgentPersona::Coordinator => &[],
    }
}

pub fn can_hand_off(from: AgentPersona, to: AgentPersona) -> bool {
    handoff_targets(from).contains(&to)
}

fn directive_value<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.lines().rev().find_map(|line| {
        let line = line.trim().trim_start_matches(['*', '-', '`', ' ']);
        let head = line.get(..prefix.len())?;
        head.eq_ignore_ascii_case(prefix)
            .then(|| line[prefix.len()..].trim())
    })
}

fn persona_from_directive(value: &str) -> Option<AgentPersona> {
    let cleaned = value.trim_matches(|c: char| !c.is_alphanumeric() && c != '_');
    AgentPersona::from_str(cleaned)
}

/// Read a `HANDOFF: <name>` directive from generated text.
pub fn parse_handoff(text: &str) -> Option<AgentPersona> {
    directive_value(text, HANDOFF_PREFIX).and_then(persona_from_directive)
}

/// Parsed coordinator reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorDirective {
    pub next: AgentPersona,
    pub instruction: Option<String>,
}

/// Parse a coordinator reply of the form `NEXT: <persona>` / `INSTRUCTION: ...`.
///
/// Returns `None` when no valid participant is named.
pub fn parse_coordinator(text: &str, roster: &[AgentPersona]) -> Option<CoordinatorDirective> {
    let next = directive_value(text, NEXT_PREFIX).and_then(persona_from_directive)?;
    if !roster.contains(&next) || next == AgentPersona::Coordinator {
        return None;
    }
    let instruction = directive_value(text, INSTRUCTION_PREFIX)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);
    Some(CoordinatorDirective { next, instruction })
}

/// Pick the next speaker for a hand-off conversation.
///
/// Returns `None` once the manager has spoken or the turn limit is reached.
/// Coordinator turns count toward the limit but are otherwise invisible to
/// routing.
pub fn next_speaker(
    transcript: &ConversationTranscript,
    roster: &[AgentPersona],
    strategy: &SimulationStrategy,
) -> Option<AgentPersona> {
    let max_turns = strategy.max_turns as usize;
    if transcript.len() >= max_turns {
        return None;
    }

    let Some(last) = transcript
        .turns()
        .iter()
        .rev()
        .find(|t| t.speaker != AgentPersona::Coordinator)
    else {
        return Some(strategy.primary_persona);
    };

    if last.speaker == AgentPersona::Manager {
        return None;
    }

    if let Some(target) = parse_handoff(&last.content) {
        if can_hand_off(last.speaker, target) && roster.contains(&target) {
            return Some(target);
        }
    }

    if transcript.len() + 1 >= max_turns && roster.contains(&AgentPersona::Manager) {
        return Some(AgentPersona::Manager);
    }

    if last.speaker == AgentPersona::Prospect {
        if last.content.to_lowercase().contains("technical")
            && roster.contains(&AgentPersona::TechnicalRep)
        {
            return Some(AgentPersona::TechnicalRep);
        }
        return Some(transcript.last_rep().unwrap_or(strategy.primary_persona));
    }

    Some(AgentPersona::Prospect)
}
