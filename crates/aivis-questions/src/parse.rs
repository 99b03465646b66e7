//! Tagged parsing of generator-model output.
//!
//! Generator models are asked for a JSON array but wrap it in prose or
//! code fences often enough that parsing is modeled as an explicit
//! success/failure result, with the deterministic template set as the
//! recovery branch for failure. No best-effort regex extraction of
//! half-valid JSON.

use serde::Deserialize;

use aivis_core::QuestionCategory;

/// One question as proposed by a generator model.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedQuestion {
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub job_family: Option<String>,
}

/// Why generator output could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub reason: String,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Parse a generator answer into questions.
///
/// Locates the outermost JSON array in the text (models often wrap it in
/// prose or a code fence) and deserializes it strictly. Blank question
/// texts are dropped; an array that yields no usable questions is a
/// failure.
///
/// # Errors
///
/// Returns [`ParseFailure`] when no JSON array is present, the array does
/// not deserialize, or every entry is blank.
pub fn parse_generated_questions(raw: &str) -> Result<Vec<GeneratedQuestion>, ParseFailure> {
    let start = raw.find('[').ok_or_else(|| ParseFailure {
        reason: "no JSON array in generator output".to_string(),
    })?;
    let end = raw.rfind(']').ok_or_else(|| ParseFailure {
        reason: "unterminated JSON array in generator output".to_string(),
    })?;
    if end < start {
        return Err(ParseFailure {
            reason: "malformed JSON array bounds in generator output".to_string(),
        });
    }

    let slice = &raw[start..=end];
    let questions: Vec<GeneratedQuestion> =
        serde_json::from_str(slice).map_err(|e| ParseFailure {
            reason: format!("generator output is not a question array: {e}"),
        })?;

    let questions: Vec<GeneratedQuestion> = questions
        .into_iter()
        .filter(|q| !q.text.trim().is_empty())
        .collect();

    if questions.is_empty() {
        return Err(ParseFailure {
            reason: "generator output contained no usable questions".to_string(),
        });
    }

    Ok(questions)
}

/// Map a generator-supplied category string onto the question taxonomy.
/// Unknown or missing categories land in `general`.
#[must_use]
pub fn map_category(raw: Option<&str>) -> QuestionCategory {
    match raw.map(str::trim).map(str::to_lowercase).as_deref() {
        Some("location") => QuestionCategory::Location,
        Some("service") => QuestionCategory::Service,
        Some("comparison") => QuestionCategory::Comparison,
        Some("recommendation") => QuestionCategory::Recommendation,
        Some("brand_recall") => QuestionCategory::BrandRecall,
        Some("service_check") => QuestionCategory::ServiceCheck,
        Some("competitor_compare") => QuestionCategory::CompetitorCompare,
        Some("role_insight") => QuestionCategory::RoleInsight,
        _ => QuestionCategory::General,
    }
}
