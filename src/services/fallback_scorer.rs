//! Deterministic lead scoring used when no conversation could be simulated.

use serde_json::{json, Map};

use crate::domain::models::{
    BuyingStage, ConversationMetrics, ConversationQuality, EngagementScoring, LeadRecord,
    NextStepRecommendations, ObjectionAnalysis, ObjectionCategory, RiskLevel, SimulationResults,
    UrgencyLevel,
};

/// Confidence attached to every fallback result.
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Conversion estimate from lead attributes alone.
pub fn fallback_probability(lead: &LeadRecord) -> f64 {
    let mut score: f64 = 0.3;
    if lead.company_size.is_some_and(|size| size > 500) {
        score += 0.2;
    }
    if lead.engagement_level > 0.6 {
        score += 0.2;
    }
    if !lead.pain_points.is_empty() {
        score += 0.1;
    }
    if lead.research_completed {
        score += 0.1;
    }
    score.min(1.0)
}

pub fn fallback_approach(lead: &LeadRecord) -> &'static str {
    if lead.company_size.is_some_and(|size| size > 1000) {
        "Enterprise discovery call with technical demo"
    } else if lead.engagement_level > 0.7 {
        "Schedule product demonstration"
    } else {
        "Standard discovery call approach"
    }
}

/// Build schema-valid results for `lead` without a transcript.
///
/// `reason` explains why the simulation could not run and ends up in the
/// summary and metadata.
pub fn fallback_results(lead: &LeadRecord, reason: &str) -> SimulationResults {
    let approach = fallback_approach(lead);
    let engagement = lead.engagement_level.clamp(0.0, 1.0);

    let mut metadata = Map::new();
    metadata.insert("fallback".to_string(), json!(true));
    metadata.insert("reason".to_string(), json!(reason));

    let mut results = SimulationResults {
        conversion_probability: fallback_probability(lead),
        confidence_score: FALLBACK_CONFIDENCE,
        recommended_approach: approach.to_string(),
        conversation_metrics: ConversationMetrics {
            total_turns: 0,
            prospect_engagement_score: engagement,
            conversation_quality: ConversationQuality::Poor,
            technical_depth: 0,
            rapport_score: 0.5,
            information_gathered: 0.0,
        },
        objection_analysis: vec![
            ObjectionAnalysis::new("Budget concerns", ObjectionCategory::Budget, RiskLevel::Medium),
            ObjectionAnalysis::new(
                "Implementation timeline",
                ObjectionCategory::Timing,
                RiskLevel::Medium,
            ),
        ],
        next_steps: NextStepRecommendations {
            primary_action: approach.to_string(),
            timeline: "Within 2 weeks".to_string(),
            urgency: if lead.engagement_level > 0.7 {
                UrgencyLevel::Moderate
            } else {
                UrgencyLevel::Low
            },
            required_resources: Vec::new(),
            stakeholders_to_involve: vec![lead.contact_or_default().to_string()],
            success_criteria: vec!["Discovery call booked".to_string()],
            alternative_actions: vec!["Retry the simulation once the backend is available".to_string()],
        },
        engagement_scoring: EngagementScoring {
            overall_engagement: engagement,
            buying_signals_strength: 0.5,
            decision_authority: 0.5,
            budget_availability: 0.5,
            timeline_urgency: 0.5,
            technical_fit: 0.5,
            competitive_position: 0.5,
            positive_signals: Vec::new(),
            negative_signals: Vec::new(),
            buying_stage: BuyingStage::Awareness,
        },
        technical_requirements: None,
        competitive_intelligence: None,
        conversation_summary: format!(
            "Fallback simulation for {} ({reason})",
            lead.company_name
        ),
        key_insights: vec![
            "Conversation simulation unavailable; scored from lead attributes".to_string(),
        ],
        success_factors: vec!["Company fit".to_string(), "Pain point alignment".to_string()],
        risk_factors: vec![
            "Competition".to_string(),
            "Decision timeline".to_string(),
            "Limited simulation capability".to_string(),
        ],
        simulation_metadata: metadata,
    };
    results.normalize();
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_lead() {
        let lead = LeadRecord::new("Tiny Co");
        let results = fallback_results(&lead, "backend unavailable");

        assert!((results.conversion_probability - 0.3).abs() < 1e-9);
        assert!((results.confidence_score - FALLBACK_CONFIDENCE).abs() < f64::EPSILON);
        assert_eq!(results.recommended_approach, "Standard discovery call approach");
        assert_eq!(
            results.conversation_summary,
            "Fallback simulation for Tiny Co (backend unavailable)"
        );
    }

    #[test]
    fn test_every_bonus_applies() {
        let lead = LeadRecord::new("Globex")
            .with_company_size(2000)
            .with_engagement(0.8)
            .with_pain_point("Manual reporting")
            .with_research_completed(true);
        let results = fallback_results(&lead, "timeout");

        assert!((results.conversion_probability - 0.9).abs() < 1e-9);
        assert_eq!(
            results.recommended_approach,
            "Enterprise discovery call with technical demo"
        );
    }

    #[test]
    fn test_size_thresholds_are_exclusive() {
        let at_500 = LeadRecord::new("A").with_company_size(500);
        assert!((fallback_probability(&at_500) - 0.3).abs() < 1e-9);

        let at_1000 = LeadRecord::new("B").with_company_size(1000).with_engagement(0.75);
        assert_eq!(fallback_approach(&at_1000), "Schedule product demonstration");
    }

    #[test]
    fn test_unknown_size_gets_no_size_bonus() {
        let lead = LeadRecord::new("Unknown Size").with_engagement(0.65);
        assert!((fallback_probability(&lead) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_lists_are_non_empty_and_valid() {
        let results = fallback_results(&LeadRecord::new("Initech"), "generation failed");

        assert!(!results.key_insights.is_empty());
        assert!(!results.success_factors.is_empty());
        assert!(!results.risk_factors.is_empty());
        assert!(results
            .objection_analysis
            .iter()
            .all(|o| !o.potential_responses.is_empty()));
        assert!(results.validate().is_valid);
    }

    #[test]
    fn test_deterministic() {
        let lead = LeadRecord::new("Same").with_engagement(0.9);
        let a = fallback_results(&lead, "x");
        let b = fallback_results(&lead, "x");
        assert_eq!(a, b);
    }
}
