//! Heuristic transcript analyzer.
//!
//! Turns a finished conversation into [`SimulationResults`] by keyword
//! matching over the lowercased transcript. All keyword lists and weights
//! live in [`AnalyzerConfig`] so they can be tuned from configuration.

use serde_json::{json, Map, Value};

use crate::domain::models::{
    AgentPersona, AnalyzerConfig, BuyingStage, CompetitiveIntelligence, ConversationMetrics,
    ConversationQuality, ConversationTranscript, EngagementScoring, LeadRecord,
    NextStepRecommendations, ObjectionAnalysis, ObjectionCategory, RiskLevel, SimulationResults,
    SimulationStrategy, TechnicalRequirements, UrgencyLevel,
};
use crate::services::assessment_extractor::ManagerAssessment;

pub const DEFAULT_APPROACH: &str = "Standard discovery approach";

const ROI_APPROACH: &str = "Focus on ROI and value demonstration";
const DEMO_APPROACH: &str = "Schedule technical demo";
const DEEP_DIVE_APPROACH: &str = "Schedule technical deep-dive with engineering team";
const FLEXIBLE_PRICING_APPROACH: &str = "Focus on ROI demonstration and flexible pricing";
const DIFFERENTIATION_APPROACH: &str = "Provide competitive differentiation materials";
const STAKEHOLDER_APPROACH: &str = "Map stakeholder engagement strategy";

/// Keyword hits found in one transcript.
#[derive(Debug, Default)]
struct Signals {
    positive: Vec<String>,
    negative: Vec<String>,
    technical: usize,
    implementation: bool,
    urgency: usize,
    price: bool,
    budget: usize,
    cost_negative: bool,
    demo: bool,
    competitor: usize,
    decision: usize,
    engagement: usize,
}

/// Distinct terms of `terms` present in `text`.
fn matched<'a>(text: &'a str, terms: &'a [String]) -> impl Iterator<Item = &'a String> + 'a {
    terms
        .iter()
        .filter(move |term| !term.is_empty() && text.contains(term.to_lowercase().as_str()))
}

fn count(text: &str, terms: &[String]) -> usize {
    matched(text, terms).count()
}

/// Replace every occurrence of the given phrases so they cannot match again.
fn mask(text: &str, phrases: &[String]) -> String {
    phrases
        .iter()
        .filter(|p| !p.is_empty())
        .fold(text.to_string(), |acc, phrase| {
            acc.replace(phrase.to_lowercase().as_str(), " ")
        })
}

fn unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

fn push_unique(list: &mut Vec<String>, item: impl Into<String>) {
    let item = item.into();
    if !item.trim().is_empty() && !list.iter().any(|existing| existing.eq_ignore_ascii_case(&item)) {
        list.push(item);
    }
}

/// Map free-text objections onto a category.
pub fn classify_objection(text: &str) -> ObjectionCategory {
    let text = text.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
    if has(&["budget", "fund"]) {
        ObjectionCategory::Budget
    } else if has(&["price", "cost", "expensive"]) {
        ObjectionCategory::Price
    } else if has(&["timing", "timeline", "not now", "later", "quarter"]) {
        ObjectionCategory::Timing
    } else if has(&["approval", "authority", "decision", "board"]) {
        ObjectionCategory::Authority
    } else if has(&["competitor", "alternative", "already have", "currently using"]) {
        ObjectionCategory::Competition
    } else if has(&["implementation", "integration", "migration", "complex"]) {
        ObjectionCategory::Implementation
    } else if has(&["support", "service"]) {
        ObjectionCategory::Support
    } else if has(&["trust", "security", "risk", "reference"]) {
        ObjectionCategory::Trust
    } else if has(&["feature", "missing", "capabilit"]) {
        ObjectionCategory::Features
    } else {
        ObjectionCategory::Need
    }
}

/// Keyword-driven scorer for finished conversations.
#[derive(Debug, Clone, Default)]
pub struct TranscriptAnalyzer {
    config: AnalyzerConfig,
}

impl TranscriptAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn signals(&self, transcript: &ConversationTranscript) -> Signals {
        let c = &self.config;
        let text = transcript.full_text().to_lowercase();

        let negative: Vec<String> = matched(&text, &c.negative_phrases).cloned().collect();
        let unmasked = mask(&text, &c.negative_phrases);
        let positive: Vec<String> = matched(&unmasked, &c.positive_phrases).cloned().collect();

        let prospect_text = transcript.text_by(AgentPersona::Prospect).to_lowercase();
        let engagement_text = if prospect_text.trim().is_empty() {
            &text
        } else {
            &prospect_text
        };

        Signals {
            positive,
            negative,
            technical: count(&text, &c.technical_terms),
            implementation: count(&text, &c.implementation_terms) > 0,
            urgency: count(&text, &c.urgency_terms),
            price: count(&text, &c.price_terms) > 0,
            budget: count(&text, &c.budget_terms),
            cost_negative: count(&text, &c.cost_negative_phrases) > 0,
            demo: count(&text, &c.demo_terms) > 0,
            competitor: count(&text, &c.competitor_terms),
            decision: count(&text, &c.decision_terms),
            engagement: count(engagement_text, &c.engagement_terms),
        }
    }

    fn quality(&self, turns: u32, engagement: f64) -> ConversationQuality {
        let q = &self.config.quality;
        if turns >= q.excellent_turns && engagement >= q.excellent_engagement {
            ConversationQuality::Excellent
        } else if turns >= q.good_turns && engagement >= q.good_engagement {
            ConversationQuality::Good
        } else if turns >= q.fair_turns || engagement >= q.fair_engagement {
            ConversationQuality::Fair
        } else {
            ConversationQuality::Poor
        }
    }

    /// Score a finished conversation.
    ///
    /// `label` names the conversation pattern in the summary. When the
    /// manager produced a structured assessment its probability is averaged
    /// with the heuristic one and its lists are merged in.
    pub fn analyze(
        &self,
        transcript: &ConversationTranscript,
        lead: &LeadRecord,
        strategy: &SimulationStrategy,
        label: &str,
        assessment: Option<&ManagerAssessment>,
    ) -> SimulationResults {
        let c = &self.config;
        let s = self.signals(transcript);

        let mut insights = Vec::new();
        let mut success_factors = Vec::new();
        let mut risk_factors = Vec::new();
        let mut objections = Vec::new();
        let mut approach = DEFAULT_APPROACH.to_string();

        let mut probability = c.base_probability
            + s.positive.len() as f64 * c.positive_weight
            - s.negative.len() as f64 * c.negative_weight;

        let technical_engaged = s.technical > c.technical_threshold;
        let urgent = s.urgency > c.urgency_threshold;
        let budget_discussed = s.budget > c.budget_threshold;
        let budget_objection = budget_discussed && s.cost_negative;
        let complex_decision = s.decision > c.decision_threshold;

        if s.price {
            objections.push(
                ObjectionAnalysis::new("Price sensitivity", ObjectionCategory::Price, RiskLevel::Medium)
                    .with_response(ROI_APPROACH),
            );
            approach = ROI_APPROACH.to_string();
        }
        if s.implementation {
            risk_factors.push("Implementation complexity concerns".to_string());
        }
        if s.demo {
            success_factors.push("Interest in product demonstration".to_string());
            approach = DEMO_APPROACH.to_string();
        }
        if technical_engaged {
            insights.push("High technical engagement - prospect has technical requirements".to_string());
            probability += c.technical_bonus;
            approach = DEEP_DIVE_APPROACH.to_string();
        }
        if urgent {
            success_factors.push("Time-sensitive opportunity".to_string());
            probability += c.urgency_bonus;
        }
        if budget_objection {
            objections.push(
                ObjectionAnalysis::new("Budget constraints", ObjectionCategory::Budget, RiskLevel::High)
                    .with_response("Offer flexible pricing or phased rollout")
                    .with_underlying_concern("Cost relative to perceived value"),
            );
            approach = FLEXIBLE_PRICING_APPROACH.to_string();
        } else if budget_discussed {
            success_factors.push("Budget discussion initiated".to_string());
        }
        if s.competitor > 0 {
            risk_factors.push("Competitive evaluation in progress".to_string());
            approach = DIFFERENTIATION_APPROACH.to_string();
        }
        if complex_decision {
            insights.push("Complex decision-making process identified".to_string());
            approach = STAKEHOLDER_APPROACH.to_string();
        }

        let heuristic_probability = unit(probability);
        let mut probability = heuristic_probability;
        let mut summary_detail = None;

        if let Some(assessment) = assessment {
            probability = unit((heuristic_probability + assessment.probability()) / 2.0);
            for item in &assessment.insights {
                push_unique(&mut insights, item.as_str());
            }
            for item in &assessment.success_factors {
                push_unique(&mut success_factors, item.as_str());
            }
            for item in &assessment.risk_factors {
                push_unique(&mut risk_factors, item.as_str());
            }
            for text in assessment.objections.iter().filter(|t| !t.trim().is_empty()) {
                if !objections.iter().any(|o| o.objection_text.eq_ignore_ascii_case(text)) {
                    objections.push(ObjectionAnalysis::new(
                        text.trim(),
                        classify_objection(text),
                        RiskLevel::Medium,
                    ));
                }
            }
            if approach == DEFAULT_APPROACH {
                if let Some(recommended) = assessment
                    .recommended_approach
                    .as_deref()
                    .filter(|a| !a.trim().is_empty())
                {
                    approach = recommended.trim().to_string();
                }
            }
            summary_detail = assessment
                .conversation_summary
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string);
        }

        let mut summary = if probability > 0.7 {
            format!("Highly positive {label} simulation with strong buying signals")
        } else if probability > 0.4 {
            format!("Promising {label} simulation with moderate interest")
        } else {
            format!("Challenging {label} simulation requiring nurturing approach")
        };
        if let Some(detail) = summary_detail {
            summary.push_str(". ");
            summary.push_str(&detail);
        }

        let turns = u32::try_from(transcript.len()).unwrap_or(u32::MAX);
        let engagement = unit(c.engagement_base + s.engagement as f64 * c.engagement_step);

        let rapport = unit(
            0.5 + s.positive.len() as f64 * c.positive_weight
                - s.negative.len() as f64 * c.negative_weight,
        );
        let categories_hit = [
            technical_engaged,
            urgent,
            budget_discussed,
            complex_decision,
            s.competitor > 0,
            s.price,
        ]
        .iter()
        .filter(|hit| **hit)
        .count();
        let information_gathered = categories_hit as f64 / 6.0;

        let metrics = ConversationMetrics {
            total_turns: turns,
            prospect_engagement_score: engagement,
            conversation_quality: self.quality(turns, engagement),
            technical_depth: u8::try_from(s.technical.min(5)).unwrap_or(5),
            rapport_score: rapport,
            information_gathered,
        };

        let scoring = EngagementScoring {
            overall_engagement: 0.0,
            buying_signals_strength: rapport,
            decision_authority: if complex_decision { 0.4 } else { 0.6 },
            budget_availability: if budget_objection {
                0.3
            } else if budget_discussed {
                0.7
            } else {
                0.5
            },
            timeline_urgency: unit(0.3 + s.urgency as f64 * c.urgency_bonus),
            technical_fit: unit(0.3 + s.technical as f64 * c.technical_bonus),
            competitive_position: if s.competitor > 0 { 0.4 } else { 0.6 },
            positive_signals: s.positive.clone(),
            negative_signals: s.negative.clone(),
            buying_stage: if probability > 0.7 && budget_discussed && !budget_objection {
                BuyingStage::Purchase
            } else if s.demo || technical_engaged {
                BuyingStage::Evaluation
            } else if !s.positive.is_empty() {
                BuyingStage::Consideration
            } else {
                BuyingStage::Awareness
            },
        };

        let next_steps = self.next_steps(lead, &s, &approach, probability, urgent);
        let technical_requirements = (s.technical > 0 || !lead.tech_stack.is_empty())
            .then(|| self.technical_requirements(transcript, lead, &s));
        let competitive_intelligence =
            (s.competitor > 0).then(|| competitive_intelligence(transcript));

        let confidence = (0.4 + 0.05 * f64::from(turns)).min(0.85)
            + if assessment.is_some() { 0.1 } else { 0.0 };

        let mut metadata = Map::new();
        metadata.insert("pattern".to_string(), json!(label));
        metadata.insert("total_turns".to_string(), json!(turns));
        metadata.insert(
            "primary_persona".to_string(),
            json!(strategy.primary_persona.as_str()),
        );
        metadata.insert("heuristic_probability".to_string(), json!(heuristic_probability));
        metadata.insert(
            "assessment_extracted".to_string(),
            Value::Bool(assessment.is_some()),
        );

        let mut results = SimulationResults {
            conversion_probability: probability,
            confidence_score: unit(confidence),
            recommended_approach: approach,
            conversation_metrics: metrics,
            objection_analysis: objections,
            next_steps,
            engagement_scoring: scoring,
            technical_requirements,
            competitive_intelligence,
            conversation_summary: summary,
            key_insights: insights,
            success_factors,
            risk_factors,
            simulation_metadata: metadata,
        };
        results.normalize();
        results
    }

    fn next_steps(
        &self,
        lead: &LeadRecord,
        s: &Signals,
        approach: &str,
        probability: f64,
        urgent: bool,
    ) -> NextStepRecommendations {
        let (timeline, urgency) = if urgent {
            ("Within 1 week", UrgencyLevel::Urgent)
        } else if probability > 0.4 {
            ("Within 2 weeks", UrgencyLevel::Moderate)
        } else {
            ("Within 30 days", UrgencyLevel::Low)
        };

        let mut required_resources = Vec::new();
        if s.technical > self.config.technical_threshold {
            required_resources.push("Solutions engineer".to_string());
        }
        if s.demo {
            required_resources.push("Demo environment".to_string());
        }
        if s.price || s.budget > self.config.budget_threshold {
            required_resources.push("ROI calculator".to_string());
        }

        let mut stakeholders = vec![lead.contact_or_default().to_string()];
        if s.technical > 0 {
            stakeholders.push("Technical lead".to_string());
        }
        if s.decision > self.config.decision_threshold {
            stakeholders.push("Economic buyer".to_string());
        }

        let mut success_criteria = vec!["Prospect agrees to a follow-up meeting".to_string()];
        if s.demo {
            success_criteria.push("Demo scheduled with technical stakeholders".to_string());
        }

        NextStepRecommendations {
            primary_action: approach.to_string(),
            timeline: timeline.to_string(),
            urgency,
            required_resources,
            stakeholders_to_involve: stakeholders,
            success_criteria,
            alternative_actions: vec![format!(
                "Share a {} case study",
                lead.effective_industry()
            )],
        }
    }

    fn technical_requirements(
        &self,
        transcript: &ConversationTranscript,
        lead: &LeadRecord,
        s: &Signals,
    ) -> TechnicalRequirements {
        let text = transcript.full_text().to_lowercase();
        let mentions = |word: &str| text.contains(word);

        let mut requirements = TechnicalRequirements {
            current_tech_stack: lead.tech_stack.clone(),
            ..Default::default()
        };
        if mentions("integration") || mentions("api") {
            requirements
                .integration_needs
                .push("Integration with existing systems".to_string());
        }
        if mentions("security") || mentions("compliance") {
            requirements
                .security_requirements
                .push("Security and compliance review".to_string());
        }
        if mentions("scalability") || mentions("scale") {
            requirements
                .scalability_concerns
                .push("Growth in data and user volume".to_string());
        }
        if mentions("performance") || mentions("latency") {
            requirements
                .performance_requirements
                .push("Performance under production load".to_string());
        }
        requirements.implementation_complexity = if s.implementation && !s.negative.is_empty() {
            RiskLevel::High
        } else if s.implementation || s.technical > self.config.technical_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };
        if transcript.turns_by(AgentPersona::TechnicalRep).next().is_some() {
            requirements
                .technical_decision_makers
                .push("Technical lead".to_string());
        }
        requirements
    }
}

fn competitive_intelligence(transcript: &ConversationTranscript) -> CompetitiveIntelligence {
    let text = transcript.full_text().to_lowercase();
    let mut intel = CompetitiveIntelligence {
        competitive_threats: vec!["Competitive evaluation in progress".to_string()],
        differentiation_opportunities: vec![DIFFERENTIATION_APPROACH.to_string()],
        ..Default::default()
    };
    if text.contains("currently using") || text.contains("already have") {
        intel
            .current_solutions
            .push("Existing solution in place".to_string());
        intel
            .switching_barriers
            .push("Migration effort from current solution".to_string());
    }
    intel
}
