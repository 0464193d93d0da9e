//! System prompts and task messages for conversation personas.
//!
//! Everything here is plain string building from the lead and strategy;
//! no I/O and no randomness.

use std::fmt::Write;

use crate::domain::models::{
    AgentPersona, ConversationStyle, LeadRecord, OrchestrationPattern, SimulationStrategy,
};
use crate::services::routing;

/// Engagement assumed by prompts when the lead reports none.
const NEUTRAL_ENGAGEMENT: f64 = 0.5;

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

fn size_label(lead: &LeadRecord) -> String {
    lead.company_size
        .map_or_else(|| "an unknown number of".to_string(), |s| s.to_string())
}

fn prompt_engagement(lead: &LeadRecord) -> f64 {
    if lead.engagement_level > 0.0 {
        lead.engagement_level
    } else {
        NEUTRAL_ENGAGEMENT
    }
}

/// Job title the prospect persona plays, derived from company size.
pub fn prospect_role(lead: &LeadRecord) -> &'static str {
    match lead.company_size {
        None => "Technology decision maker",
        Some(size) if size >= 1000 => "VP of Technology / IT Director",
        Some(size) if size >= 500 => "Engineering Manager / IT Manager",
        Some(_) => "CTO / Technical Lead",
    }
}

/// How responsive the prospect should be.
pub fn communication_style(lead: &LeadRecord) -> &'static str {
    let engagement = prompt_engagement(lead);
    if engagement > 0.7 {
        "Highly engaged, asks detailed questions, shows strong interest"
    } else if engagement > 0.4 {
        "Moderately engaged, somewhat skeptical but open to discussion"
    } else {
        "Low engagement, busy and distracted, needs compelling reasons to continue"
    }
}

pub fn budget_process(lead: &LeadRecord) -> &'static str {
    let size = lead.effective_size();
    if size >= 1000 {
        "Complex approval process, multiple stakeholders, formal procurement"
    } else if size >= 500 {
        "Moderate approval process, needs manager approval for significant spend"
    } else {
        "Direct decision-making authority, flexible budget discussions"
    }
}

pub fn timeline_pressure(lead: &LeadRecord) -> &'static str {
    if lead.engagement_level > 0.7 {
        "Looking to implement soon, has urgency"
    } else if lead.pain_points.len() > 2 {
        "Some urgency due to current challenges"
    } else {
        "No immediate timeline pressure, evaluating options"
    }
}

fn rep_profile(persona: AgentPersona) -> (&'static str, &'static str, &'static str) {
    match persona {
        AgentPersona::EnterpriseRep => (
            "an experienced enterprise sales representative specializing in large B2B accounts",
            "Professional and consultative. Focus on business outcomes and strategic value. \
             Ask about governance, compliance, and security requirements, and map the \
             multi-stakeholder decision process.",
            "Uncover enterprise-level requirements and build confidence that the solution \
             serves large organizations.",
        ),
        AgentPersona::TechnicalRep => (
            "a technical sales specialist with deep product knowledge and an engineering background",
            "Technically accurate and detailed. Probe the current tech stack, discuss \
             integration patterns and data flows, and address security, performance, and \
             reliability concerns with concrete proof points.",
            "Thoroughly explore technical requirements and demonstrate deep product expertise.",
        ),
        _ => (
            "an energetic SMB sales representative who excels at building relationships with growing companies",
            "Friendly and responsive. Focus on immediate value and quick wins, ask about \
             growth plans and scaling challenges, and stay flexible on pricing and terms.",
            "Resonate with a growing company's need for efficient, scalable solutions.",
        ),
    }
}

/// System prompt for a rep persona.
///
/// `handoff_targets` lists the personas this rep may pass the conversation
/// to; an empty slice omits the hand-off section entirely.
pub fn rep_prompt(
    persona: AgentPersona,
    lead: &LeadRecord,
    strategy: &SimulationStrategy,
    handoff_targets: &[AgentPersona],
    json_output: bool,
) -> String {
    let (identity, approach, goal) = rep_profile(persona);
    let mut prompt = format!(
        "You are {identity}.\n\n\
         Your approach: {approach}\n\n\
         Company context: {company} ({size} employees) in {industry}\n\
         Contact: {contact}\n\
         Known challenges: {pains}\n\
         Current tech stack: {stack}\n\
         Previous outreach attempts: {attempts}\n\
         Engagement approach: {engagement}\n\
         Technical depth required: {depth}\n\n\
         Conduct a discovery call. {goal}\n\
         Speak only as yourself and keep each reply to a few sentences.",
        company = lead.company_name,
        size = size_label(lead),
        industry = lead.effective_industry(),
        contact = lead.contact_or_default(),
        pains = join_or(&lead.pain_points, "standard challenges"),
        stack = join_or(&lead.tech_stack, "not known"),
        attempts = lead.outreach_attempts,
        engagement = strategy.engagement_approach.as_str(),
        depth = strategy.technical_depth.as_str(),
    );

    if !handoff_targets.is_empty() {
        let targets = handoff_targets
            .iter()
            .map(|p| format!("- '{}'", p.as_str()))
            .collect::<Vec<_>>()
            .join("\n");
        let _ = write!(
            prompt,
            "\n\nHand-off instructions:\n\
             You can hand the conversation to a colleague when their expertise is needed:\n\
             {targets}\n\
             To hand off, end your reply with a line of the form `{prefix} <name>`.",
            prefix = routing::HANDOFF_PREFIX,
        );
    }

    if json_output {
        prompt.push_str(
            "\n\nRespond with a JSON object: {\"message\": \"<what you say>\", \
             \"handoff\": \"<colleague name or null>\"}.",
        );
    }

    prompt
}

/// System prompt for the simulated prospect.
pub fn prospect_prompt(lead: &LeadRecord) -> String {
    let mut situation = if lead.pain_points.is_empty() {
        "- Generally satisfied but open to improvements\n".to_string()
    } else {
        format!("- Key challenges: {}\n", lead.pain_points.join(", "))
    };
    if !lead.tech_stack.is_empty() {
        let _ = writeln!(situation, "- Current tech stack: {}", lead.tech_stack.join(", "));
    }

    format!(
        "You are {contact} at {company}.\n\n\
         Company profile:\n\
         - Company: {company}\n\
         - Industry: {industry}\n\
         - Size: {size} employees\n\
         - Your role: {role}\n\n\
         Current situation:\n{situation}\n\
         Communication style: {style}\n\n\
         Decision-making factors:\n\
         - ROI and business impact are critical\n\
         - Implementation complexity is a concern\n\
         - Budget approval process: {budget}\n\
         - Timeline considerations: {timeline}\n\n\
         Ask specific questions about capabilities, share challenges when the solution \
         seems promising, and raise realistic objections. Respond naturally as this person \
         would in a real sales conversation. Be realistic, neither too easy nor too \
         difficult to convince.",
        contact = lead.contact_or_default(),
        company = lead.company_name,
        industry = lead.effective_industry(),
        size = lead.effective_size(),
        role = prospect_role(lead),
        style = communication_style(lead),
        budget = budget_process(lead),
        timeline = timeline_pressure(lead),
    )
}

/// System prompt for the sales manager, who closes the call with a JSON assessment.
pub fn manager_prompt(strategy: &SimulationStrategy) -> String {
    let mut prompt = String::from(
        "You are an experienced sales manager analyzing this sales conversation for strategic insights.\n\n\
         Assess conversion probability, buying signals, pain points, technical requirements, \
         the decision process and timeline, competitive position, risks, objections, and next steps.\n\n\
         Provide your analysis as a JSON object with:\n\
         - conversion_probability: number between 0.0 and 1.0\n\
         - recommended_approach: string describing next steps\n\
         - insights: array of key observations\n\
         - objections: array of concerns raised\n\
         - success_factors: array of positive indicators\n\
         - risk_factors: array of potential challenges\n\
         - conversation_summary: string summarizing the interaction\n\n\
         Be analytical and objective, and give actionable recommendations.",
    );
    if strategy.conversation_style == ConversationStyle::Technical {
        prompt.push_str(
            "\n\nFocus on technical fit and implementation considerations in your analysis.",
        );
    }
    prompt
}

/// System prompt for the coordinator in coordinated mode.
pub fn coordinator_prompt(
    lead: &LeadRecord,
    strategy: &SimulationStrategy,
    roster: &[AgentPersona],
) -> String {
    let participants = roster
        .iter()
        .map(|p| format!("- {} ({})", p.as_str(), p.title()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You coordinate a simulated sales discovery call for {company}.\n\n\
         Participants:\n{participants}\n\n\
         Objectives: identify the prospect's challenges and requirements, assess technical \
         fit, gauge buying readiness, surface objections, and establish next steps. Keep the \
         conversation natural and bring in specialists only when needed. The conversation \
         has at most {turns} turns; let the manager close it with an analysis.\n\n\
         Reply with exactly two lines:\n\
         {next} <participant name>\n\
         {instruction} <one-sentence instruction for that participant>",
        company = lead.company_name,
        turns = strategy.max_turns,
        next = routing::NEXT_PREFIX,
        instruction = routing::INSTRUCTION_PREFIX,
    )
}

/// Opening task message that frames the conversation for every participant.
pub fn opening_task(
    lead: &LeadRecord,
    strategy: &SimulationStrategy,
    pattern: OrchestrationPattern,
) -> String {
    let context = format!(
        "Company: {company} ({size} employees)\n\
         Industry: {industry}\n\
         Known challenges: {pains}\n\
         Engagement level: {engagement:.1}\n\
         Strategy: {approach} approach",
        company = lead.company_name,
        size = size_label(lead),
        industry = lead.effective_industry(),
        pains = join_or(&lead.pain_points, "to be discovered"),
        engagement = prompt_engagement(lead),
        approach = strategy.engagement_approach.as_str(),
    );

    match pattern {
        OrchestrationPattern::RoundRobin => format!(
            "Begin a sales discovery call simulation for {company}.\n\n{context}\n\n\
             {rep}: open with a professional introduction and discovery questions.\n\
             Prospect: respond authentically as the contact from {company}.\n\
             Sales Manager: observe and provide the final analysis.",
            company = lead.company_name,
            rep = strategy.primary_persona.title(),
        ),
        OrchestrationPattern::Handoff => format!(
            "Initiate a sales discovery call simulation for {company}.\n\n{context}\n\n\
             {rep}: begin with a professional introduction and discovery questions.\n\
             Prospect: respond authentically as the contact from {company}.\n\
             All reps: hand off when a colleague's expertise is needed.\n\
             Sales Manager: observe the conversation and provide the final analysis.",
            company = lead.company_name,
            rep = strategy.primary_persona.title(),
        ),
        OrchestrationPattern::Coordinated => format!(
            "Orchestrate a comprehensive sales simulation for {company}.\n\n{context}\n\n\
             Coordinate between the sales rep, the prospect, and technical experts as needed. \
             Gather enough information for an accurate conversion prediction and finish with \
             actionable next steps.",
            company = lead.company_name,
        ),
    }
}

/// System prompt for any persona in the roster.
pub fn system_prompt(
    persona: AgentPersona,
    lead: &LeadRecord,
    strategy: &SimulationStrategy,
    pattern: OrchestrationPattern,
    roster: &[AgentPersona],
    json_output: bool,
) -> String {
    match persona {
        AgentPersona::Prospect => prospect_prompt(lead),
        AgentPersona::Manager => manager_prompt(strategy),
        AgentPersona::Coordinator => coordinator_prompt(lead, strategy, roster),
        rep => {
            let targets: Vec<AgentPersona> = if pattern == OrchestrationPattern::Handoff {
                routing::handoff_targets(rep)
                    .iter()
                    .copied()
                    .filter(|p| roster.contains(p))
                    .collect()
            } else {
                vec![]
            };
            rep_prompt(rep, lead, strategy, &targets, json_output)
        }
    }
}
