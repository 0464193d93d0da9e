//! Best-effort extraction of the manager's structured assessment.
//!
//! The manager is asked to close the call with a JSON object. Models wrap it
//! in prose or code fences, so every `{` in a manager turn is tried as the
//! start of a JSON value and the first object carrying a
//! `conversion_probability` wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::models::{AgentPersona, ConversationTranscript};

/// Structured assessment the manager persona produces at the end of a call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerAssessment {
    pub conversion_probability: f64,
    pub recommended_approach: Option<String>,
    #[serde(alias = "key_insights")]
    pub insights: Vec<String>,
    #[serde(alias = "objections_identified")]
    pub objections: Vec<String>,
    pub success_factors: Vec<String>,
    pub risk_factors: Vec<String>,
    pub conversation_summary: Option<String>,
}

impl ManagerAssessment {
    /// Assessed probability on the unit scale.
    ///
    /// Values between 1 and 100 are read as percentages.
    pub fn probability(&self) -> f64 {
        let p = self.conversion_probability;
        if p.is_nan() {
            0.0
        } else if p > 1.0 && p <= 100.0 {
            p / 100.0
        } else {
            p.clamp(0.0, 1.0)
        }
    }
}

/// Find the newest manager turn holding a parseable assessment.
pub fn extract_assessment(transcript: &ConversationTranscript) -> Option<ManagerAssessment> {
    transcript
        .turns_by(AgentPersona::Manager)
        .rev()
        .find_map(|turn| assessment_in(&turn.content))
}

fn assessment_in(text: &str) -> Option<ManagerAssessment> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match values.next()? {
            Ok(Value::Object(map)) if map.contains_key("conversion_probability") => {
                match serde_json::from_value(Value::Object(map)) {
                    Ok(assessment) => Some(assessment),
                    Err(e) => {
                        debug!(error = %e, "manager assessment has unexpected shape");
                        None
                    }
                }
            }
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript_with_manager(content: &str) -> ConversationTranscript {
        let mut transcript = ConversationTranscript::new();
        transcript.push(AgentPersona::SmbRep, "Hello");
        transcript.push(AgentPersona::Prospect, "Hi");
        transcript.push(AgentPersona::Manager, content);
        transcript
    }

    #[test]
    fn test_inline_json() {
        let transcript = transcript_with_manager(
            r#"{"conversion_probability": 0.65, "insights": ["Strong fit"], "risk_factors": []}"#,
        );
        let assessment = extract_assessment(&transcript).unwrap();

        assert!((assessment.probability() - 0.65).abs() < f64::EPSILON);
        assert_eq!(assessment.insights, vec!["Strong fit"]);
    }

    #[test]
    fn test_fenced_json_with_prose() {
        let transcript = transcript_with_manager(
            "Here is my analysis of the call.\n\n```json\n{\n  \"conversion_probability\": 0.4,\n  \"objections\": [\"Budget freeze\"],\n  \"recommended_approach\": \"Follow up next quarter\"\n}\n```\nLet me know.",
        );
        let assessment = extract_assessment(&transcript).unwrap();

        assert_eq!(assessment.objections, vec!["Budget freeze"]);
        assert_eq!(
            assessment.recommended_approach.as_deref(),
            Some("Follow up next quarter")
        );
    }

    #[test]
    fn test_skips_objects_without_probability() {
        let transcript = transcript_with_manager(
            r#"Context: {"note": "ignore me"} and then {"conversion_probability": 0.3}"#,
        );
        let assessment = extract_assessment(&transcript).unwrap();
        assert!((assessment.probability() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_newest_manager_turn_wins() {
        let mut transcript = transcript_with_manager(r#"{"conversion_probability": 0.2}"#);
        transcript.push(AgentPersona::Manager, r#"{"conversion_probability": 0.8}"#);

        let assessment = extract_assessment(&transcript).unwrap();
        assert!((assessment.probability() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unparseable_yields_none() {
        assert!(extract_assessment(&transcript_with_manager("Looks promising overall.")).is_none());
        assert!(extract_assessment(&transcript_with_manager("{conversion_probability: high")).is_none());
        assert!(extract_assessment(&ConversationTranscript::new()).is_none());
    }

    #[test]
    fn test_wrong_field_type_yields_none() {
        let transcript = transcript_with_manager(r#"{"conversion_probability": "likely"}"#);
        assert!(extract_assessment(&transcript).is_none());
    }

    #[test]
    fn test_percentage_probability() {
        let assessment = ManagerAssessment {
            conversion_probability: 72.0,
            ..Default::default()
        };
        assert!((assessment.probability() - 0.72).abs() < 1e-9);

        let assessment = ManagerAssessment {
            conversion_probability: -3.0,
            ..Default::default()
        };
        assert!(assessment.probability().abs() < f64::EPSILON);
    }
}
