use serde::{Deserialize, Serialize};

/// The intent bucket a probe question belongs to.
///
/// Discovery-style categories (general/location/service/comparison/
/// recommendation) probe whether a platform surfaces the business
/// organically; the brand-awareness categories (`brand_recall`,
/// `service_check`, `competitor_compare`) ask about it directly;
/// `role_insight` belongs to the employer-research variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    General,
    Location,
    Service,
    Comparison,
    Recommendation,
    BrandRecall,
    ServiceCheck,
    CompetitorCompare,
    RoleInsight,
}

impl QuestionCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionCategory::General => "general",
            QuestionCategory::Location => "location",
            QuestionCategory::Service => "service",
            QuestionCategory::Comparison => "comparison",
            QuestionCategory::Recommendation => "recommendation",
            QuestionCategory::BrandRecall => "brand_recall",
            QuestionCategory::ServiceCheck => "service_check",
            QuestionCategory::CompetitorCompare => "competitor_compare",
            QuestionCategory::RoleInsight => "role_insight",
        }
    }

    /// Categories whose question text must contain a configured location
    /// string whenever the profile has one.
    #[must_use]
    pub fn requires_location(self) -> bool {
        matches!(
            self,
            QuestionCategory::General
                | QuestionCategory::Service
                | QuestionCategory::Comparison
                | QuestionCategory::Recommendation
        )
    }
}

impl std::fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A natural-language prompt sent to each AI platform. Immutable once
/// generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeQuestion {
    pub text: String,
    pub category: QuestionCategory,
    /// Set for employer-research questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_family: Option<String>,
    /// For brand-awareness questions: the entity the question tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tested_entity: Option<String>,
    /// For brand-awareness questions: the service/attribute the question tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tested_attribute: Option<String>,
}

impl ProbeQuestion {
    #[must_use]
    pub fn new(text: impl Into<String>, category: QuestionCategory) -> Self {
        Self {
            text: text.into(),
            category,
            job_family: None,
            tested_entity: None,
            tested_attribute: None,
        }
    }

    #[must_use]
    pub fn with_job_family(mut self, job_family: impl Into<String>) -> Self {
        self.job_family = Some(job_family.into());
        self
    }

    #[must_use]
    pub fn with_tested_entity(mut self, entity: impl Into<String>) -> Self {
        self.tested_entity = Some(entity.into());
        self
    }

    #[must_use]
    pub fn with_tested_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.tested_attribute = Some(attribute.into());
        self
    }
}
