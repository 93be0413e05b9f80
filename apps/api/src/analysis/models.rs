use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four labeled critique sections a review is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackSection {
    Strengths,
    Weaknesses,
    FormattingIssues,
    Suggestions,
}

impl FeedbackSection {
    pub const ALL: [FeedbackSection; 4] = [
        FeedbackSection::Strengths,
        FeedbackSection::Weaknesses,
        FeedbackSection::FormattingIssues,
        FeedbackSection::Suggestions,
    ];

    /// Header text as the model writes it and as it appears in stored JSON.
    pub fn label(self) -> &'static str {
        match self {
            FeedbackSection::Strengths => "Strengths",
            FeedbackSection::Weaknesses => "Weaknesses",
            FeedbackSection::FormattingIssues => "Formatting Issues",
            FeedbackSection::Suggestions => "Suggestions",
        }
    }
}

/// Structured critique. Every section is always present; a section the
/// model never mentioned is an empty list.
///
/// Serializes as `{"Strengths": [...], "Weaknesses": [...], "Formatting Issues": [...], "Suggestions": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(rename = "Strengths", default)]
    pub strengths: Vec<String>,
    #[serde(rename = "Weaknesses", default)]
    pub weaknesses: Vec<String>,
    #[serde(rename = "Formatting Issues", default)]
    pub formatting_issues: Vec<String>,
    #[serde(rename = "Suggestions", default)]
    pub suggestions: Vec<String>,
}

impl Feedback {
    pub fn section(&self, section: FeedbackSection) -> &[String] {
        match section {
            FeedbackSection::Strengths => &self.strengths,
            FeedbackSection::Weaknesses => &self.weaknesses,
            FeedbackSection::FormattingIssues => &self.formatting_issues,
            FeedbackSection::Suggestions => &self.suggestions,
        }
    }

    pub fn set_section(&mut self, section: FeedbackSection, points: Vec<String>) {
        match section {
            FeedbackSection::Strengths => self.strengths = points,
            FeedbackSection::Weaknesses => self.weaknesses = points,
            FeedbackSection::FormattingIssues => self.formatting_issues = points,
            FeedbackSection::Suggestions => self.suggestions = points,
        }
    }

    pub fn is_empty(&self) -> bool {
        FeedbackSection::ALL
            .iter()
            .all(|s| self.section(*s).is_empty())
    }

    /// Reads stored feedback. Anything that does not deserialize becomes empty feedback.
    pub fn from_stored(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Output of parsing one raw model response. `score` is as extracted and
/// may exceed 100; clamping happens in the review pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32,
    pub feedback: Feedback,
}
