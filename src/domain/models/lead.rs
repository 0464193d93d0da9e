//! Lead domain model.
//!
//! A lead is the prospective customer a simulation is run against. The core
//! only ever reads it; ownership stays with the caller.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Company size assumed when the lead does not state one.
pub const DEFAULT_COMPANY_SIZE: u32 = 100;

/// Industry assumed when the lead does not state one.
pub const DEFAULT_INDUSTRY: &str = "Technology";

/// A prospective customer company and contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Company name (required)
    pub company_name: String,
    /// Industry vertical
    #[serde(default)]
    pub industry: Option<String>,
    /// Number of employees
    #[serde(default)]
    pub company_size: Option<u32>,
    /// Primary contact name
    #[serde(default)]
    pub contact_name: Option<String>,
    /// Known pain points
    #[serde(default)]
    pub pain_points: Vec<String>,
    /// Current technology stack
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// Normalized engagement level (0.0-1.0)
    #[serde(default)]
    pub engagement_level: f64,
    /// Previous outreach attempts
    #[serde(default)]
    pub outreach_attempts: u32,
    /// Whether prior research on the company has been completed
    #[serde(default)]
    pub research_completed: bool,
}

impl LeadRecord {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            industry: None,
            company_size: None,
            contact_name: None,
            pain_points: vec![],
            tech_stack: vec![],
            engagement_level: 0.0,
            outreach_attempts: 0,
            research_completed: false,
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_company_size(mut self, size: u32) -> Self {
        self.company_size = Some(size);
        self
    }

    pub fn with_contact(mut self, name: impl Into<String>) -> Self {
        self.contact_name = Some(name.into());
        self
    }

    pub fn with_pain_point(mut self, pain_point: impl Into<String>) -> Self {
        self.pain_points.push(pain_point.into());
        self
    }

    pub fn with_tech(mut self, tech: impl Into<String>) -> Self {
        self.tech_stack.push(tech.into());
        self
    }

    pub fn with_engagement(mut self, level: f64) -> Self {
        self.engagement_level = level;
        self
    }

    pub fn with_outreach_attempts(mut self, attempts: u32) -> Self {
        self.outreach_attempts = attempts;
        self
    }

    pub fn with_research_completed(mut self, done: bool) -> Self {
        self.research_completed = done;
        self
    }

    /// Company size, falling back to [`DEFAULT_COMPANY_SIZE`].
    pub fn effective_size(&self) -> u32 {
        self.company_size.unwrap_or(DEFAULT_COMPANY_SIZE)
    }

    /// Industry, falling back to [`DEFAULT_INDUSTRY`].
    pub fn effective_industry(&self) -> &str {
        self.industry.as_deref().unwrap_or(DEFAULT_INDUSTRY)
    }

    pub fn contact_or_default(&self) -> &str {
        self.contact_name.as_deref().unwrap_or("the decision maker")
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.company_name.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "company_name cannot be empty".to_string(),
            ));
        }
        if self.company_size == Some(0) {
            return Err(DomainError::ValidationFailed(
                "company_size must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.engagement_level) {
            return Err(DomainError::ValidationFailed(format!(
                "engagement_level must be between 0.0 and 1.0, got {}",
                self.engagement_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let lead: LeadRecord = serde_json::from_str(r#"{"company_name": "Acme"}"#).unwrap();

        assert_eq!(lead.effective_size(), 100);
        assert_eq!(lead.effective_industry(), "Technology");
        assert_eq!(lead.contact_or_default(), "the decision maker");
        assert!(lead.pain_points.is_empty());
        assert!((lead.engagement_level - 0.0).abs() < f64::EPSILON);
        assert!(lead.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let lead = LeadRecord::new("TechCorp")
            .with_industry("Software Development")
            .with_company_size(250)
            .with_contact("John Smith")
            .with_pain_point("Manual processes")
            .with_tech("PostgreSQL")
            .with_engagement(0.6)
            .with_outreach_attempts(2);

        assert_eq!(lead.effective_industry(), "Software Development");
        assert_eq!(lead.effective_size(), 250);
        assert_eq!(lead.pain_points, vec!["Manual processes".to_string()]);
        assert_eq!(lead.outreach_attempts, 2);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(LeadRecord::new("  ").validate().is_err());
        assert!(LeadRecord::new("Acme").with_company_size(0).validate().is_err());
        assert!(LeadRecord::new("Acme").with_engagement(1.5).validate().is_err());
        assert!(LeadRecord::new("Acme").with_engagement(-0.1).validate().is_err());
    }
}
