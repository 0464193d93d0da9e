//! Structured simulation results.
//!
//! Every [`SimulationResults`] leaving the core has been through
//! [`SimulationResults::normalize`], so downstream consumers can rely on
//! scores being in range and on the list fields never being empty.
//! [`SimulationResults::validate`] is advisory only.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::DomainResult;

/// Placeholder used for empty next-step lists.
pub const TO_BE_DETERMINED: &str = "To be determined";

/// Response attached to objections that came back without one.
pub const DEFAULT_OBJECTION_RESPONSE: &str = "Requires follow-up to address this concern";

/// Summary used when none was produced.
pub const DEFAULT_SUMMARY: &str = "Simulation completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ConversationQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Urgent,
    Moderate,
    Low,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyingStage {
    Awareness,
    Consideration,
    Evaluation,
    Purchase,
    PostPurchase,
}

impl BuyingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Awareness => "awareness",
            Self::Consideration => "consideration",
            Self::Evaluation => "evaluation",
            Self::Purchase => "purchase",
            Self::PostPurchase => "post_purchase",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectionCategory {
    Price,
    Budget,
    Timing,
    Authority,
    Need,
    Trust,
    Competition,
    Implementation,
    Support,
    Features,
}

impl ObjectionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Budget => "budget",
            Self::Timing => "timing",
            Self::Authority => "authority",
            Self::Need => "need",
            Self::Trust => "trust",
            Self::Competition => "competition",
            Self::Implementation => "implementation",
            Self::Support => "support",
            Self::Features => "features",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

const fn default_half() -> f64 {
    0.5
}

/// Quality and engagement metrics for the conversation itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMetrics {
    pub total_turns: u32,
    pub prospect_engagement_score: f64,
    pub conversation_quality: ConversationQuality,
    /// Technical discussion depth (0-5)
    #[serde(default)]
    pub technical_depth: u8,
    #[serde(default = "default_half")]
    pub rapport_score: f64,
    #[serde(default = "default_half")]
    pub information_gathered: f64,
}

/// One objection raised by the prospect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectionAnalysis {
    pub objection_text: String,
    pub category: ObjectionCategory,
    pub severity: RiskLevel,
    #[serde(default)]
    pub potential_responses: Vec<String>,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub underlying_concern: Option<String>,
}

impl ObjectionAnalysis {
    pub fn new(
        objection_text: impl Into<String>,
        category: ObjectionCategory,
        severity: RiskLevel,
    ) -> Self {
        Self {
            objection_text: objection_text.into(),
            category,
            severity,
            potential_responses: vec![],
            is_resolved: false,
            underlying_concern: None,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.potential_responses.push(response.into());
        self
    }

    pub fn with_underlying_concern(mut self, concern: impl Into<String>) -> Self {
        self.underlying_concern = Some(concern.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextStepRecommendations {
    pub primary_action: String,
    pub timeline: String,
    pub urgency: UrgencyLevel,
    #[serde(default)]
    pub required_resources: Vec<String>,
    #[serde(default)]
    pub stakeholders_to_involve: Vec<String>,
    #[serde(default)]
    pub success_criteria: Vec<String>,
    #[serde(default)]
    pub alternative_actions: Vec<String>,
}

/// Engagement and buying-signal sub-scores, each in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementScoring {
    /// Derived from the six component scores when missing or zero
    #[serde(default)]
    pub overall_engagement: f64,
    #[serde(default = "default_half")]
    pub buying_signals_strength: f64,
    #[serde(default = "default_half")]
    pub decision_authority: f64,
    #[serde(default = "default_half")]
    pub budget_availability: f64,
    #[serde(default = "default_half")]
    pub timeline_urgency: f64,
    #[serde(default = "default_half")]
    pub technical_fit: f64,
    #[serde(default = "default_half")]
    pub competitive_position: f64,
    #[serde(default)]
    pub positive_signals: Vec<String>,
    #[serde(default)]
    pub negative_signals: Vec<String>,
    pub buying_stage: BuyingStage,
}

impl EngagementScoring {
    fn components(&self) -> [f64; 6] {
        [
            self.buying_signals_strength,
            self.decision_authority,
            self.budget_availability,
            self.timeline_urgency,
            self.technical_fit,
            self.competitive_position,
        ]
    }

    /// Mean of the six component scores.
    pub fn component_mean(&self) -> f64 {
        self.components().iter().sum::<f64>() / 6.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalRequirements {
    #[serde(default)]
    pub integration_needs: Vec<String>,
    #[serde(default)]
    pub security_requirements: Vec<String>,
    #[serde(default)]
    pub scalability_concerns: Vec<String>,
    #[serde(default)]
    pub performance_requirements: Vec<String>,
    #[serde(default)]
    pub implementation_complexity: RiskLevel,
    #[serde(default)]
    pub technical_decision_makers: Vec<String>,
    #[serde(default)]
    pub current_tech_stack: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveIntelligence {
    #[serde(default)]
    pub competitors_mentioned: Vec<String>,
    #[serde(default)]
    pub current_solutions: Vec<String>,
    #[serde(default)]
    pub switching_barriers: Vec<String>,
    #[serde(default)]
    pub our_advantages: Vec<String>,
    #[serde(default)]
    pub competitive_threats: Vec<String>,
    #[serde(default)]
    pub differentiation_opportunities: Vec<String>,
}

/// Complete assessment of one simulated conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub conversion_probability: f64,
    pub confidence_score: f64,
    /// Short form of `next_steps.primary_action`
    #[serde(default)]
    pub recommended_approach: String,
    pub conversation_metrics: ConversationMetrics,
    #[serde(default)]
    pub objection_analysis: Vec<ObjectionAnalysis>,
    pub next_steps: NextStepRecommendations,
    pub engagement_scoring: EngagementScoring,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_requirements: Option<TechnicalRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_intelligence: Option<CompetitiveIntelligence>,
    #[serde(default)]
    pub conversation_summary: String,
    #[serde(default)]
    pub key_insights: Vec<String>,
    #[serde(default)]
    pub success_factors: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub simulation_metadata: Map<String, Value>,
}

/// Outcome of [`SimulationResults::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn fill_placeholder(list: &mut Vec<String>, field: &str) {
    if list.is_empty() {
        list.push(format!("No {} identified in simulation", field.replace('_', " ")));
    }
}

fn check_unit(errors: &mut Vec<String>, field: &str, v: f64) {
    if !(0.0..=1.0).contains(&v) {
        errors.push(format!("{field} must be between 0.0 and 1.0, got {v}"));
    }
}

impl SimulationResults {
    /// Parse results from JSON and normalize them.
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let mut results: Self = serde_json::from_str(json)?;
        results.normalize();
        Ok(results)
    }

    /// Bring the results into schema shape.
    ///
    /// Idempotent; applying it twice changes nothing.
    pub fn normalize(&mut self) {
        self.conversion_probability = clamp_unit(self.conversion_probability);
        self.confidence_score = clamp_unit(self.confidence_score);

        let metrics = &mut self.conversation_metrics;
        metrics.prospect_engagement_score = clamp_unit(metrics.prospect_engagement_score);
        metrics.rapport_score = clamp_unit(metrics.rapport_score);
        metrics.information_gathered = clamp_unit(metrics.information_gathered);
        metrics.technical_depth = metrics.technical_depth.min(5);

        let scoring = &mut self.engagement_scoring;
        scoring.buying_signals_strength = clamp_unit(scoring.buying_signals_strength);
        scoring.decision_authority = clamp_unit(scoring.decision_authority);
        scoring.budget_availability = clamp_unit(scoring.budget_availability);
        scoring.timeline_urgency = clamp_unit(scoring.timeline_urgency);
        scoring.technical_fit = clamp_unit(scoring.technical_fit);
        scoring.competitive_position = clamp_unit(scoring.competitive_position);
        scoring.overall_engagement = clamp_unit(scoring.overall_engagement);
        if scoring.overall_engagement == 0.0 {
            scoring.overall_engagement = scoring.component_mean();
        }

        let engagement = scoring.overall_engagement;
        let p = self.conversion_probability;
        if p > 0.8 && engagement < 0.5 {
            self.conversion_probability = p.min(engagement + 0.3);
        } else if p < 0.3 && engagement > 0.7 {
            self.conversion_probability = p.max(engagement - 0.2);
        }

        for objection in &mut self.objection_analysis {
            if objection.potential_responses.is_empty() {
                objection
                    .potential_responses
                    .push(DEFAULT_OBJECTION_RESPONSE.to_string());
            }
        }

        let steps = &mut self.next_steps;
        for list in [
            &mut steps.required_resources,
            &mut steps.stakeholders_to_involve,
            &mut steps.success_criteria,
        ] {
            if list.is_empty() {
                list.push(TO_BE_DETERMINED.to_string());
            }
        }

        fill_placeholder(&mut self.key_insights, "key_insights");
        fill_placeholder(&mut self.success_factors, "success_factors");
        fill_placeholder(&mut self.risk_factors, "risk_factors");

        if self.conversation_summary.trim().is_empty() {
            self.conversation_summary = DEFAULT_SUMMARY.to_string();
        }
        if self.recommended_approach.trim().is_empty() {
            self.recommended_approach.clone_from(&self.next_steps.primary_action);
        }
    }

    /// Check the results against the schema and a few business rules.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        check_unit(&mut errors, "conversion_probability", self.conversion_probability);
        check_unit(&mut errors, "confidence_score", self.confidence_score);

        let metrics = &self.conversation_metrics;
        check_unit(&mut errors, "prospect_engagement_score", metrics.prospect_engagement_score);
        check_unit(&mut errors, "rapport_score", metrics.rapport_score);
        check_unit(&mut errors, "information_gathered", metrics.information_gathered);
        if metrics.technical_depth > 5 {
            errors.push(format!(
                "technical_depth must be between 0 and 5, got {}",
                metrics.technical_depth
            ));
        }

        let scoring = &self.engagement_scoring;
        check_unit(&mut errors, "overall_engagement", scoring.overall_engagement);
        for (name, value) in [
            "buying_signals_strength",
            "decision_authority",
            "budget_availability",
            "timeline_urgency",
            "technical_fit",
            "competitive_position",
        ]
        .into_iter()
        .zip(scoring.components())
        {
            check_unit(&mut errors, name, value);
        }

        if self.conversation_summary.trim().is_empty() {
            errors.push("conversation_summary cannot be empty".to_string());
        }
        if self.next_steps.primary_action.trim().is_empty() {
            errors.push("next_steps.primary_action cannot be empty".to_string());
        }
        for (i, objection) in self.objection_analysis.iter().enumerate() {
            if objection.objection_text.trim().is_empty() {
                errors.push(format!("objection_analysis[{i}].objection_text cannot be empty"));
            }
            if objection.potential_responses.is_empty() {
                errors.push(format!(
                    "objection_analysis[{i}].potential_responses cannot be empty"
                ));
            }
        }

        if self.conversion_probability > 0.8 && self.confidence_score < 0.6 {
            warnings.push(
                "High conversion probability with low confidence may indicate unreliable prediction"
                    .to_string(),
            );
        }
        if self.conversion_probability < 0.2 && self.success_factors.len() > 3 {
            warnings.push(
                "Low conversion probability conflicts with multiple success factors".to_string(),
            );
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
