//! Review pipeline — gate → generate → parse → clamp.
//!
//! Never fails: a rejected document or a generation error still produces a
//! `ReviewOutcome` (score 0, empty feedback, explanatory message) that is
//! persisted and shown like any other result.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::gate::{count_markers, is_resume_like};
use crate::analysis::generator::FeedbackGenerator;
use crate::analysis::models::Feedback;
use crate::analysis::parser::FeedbackParser;
use crate::analysis::prompts::NOT_A_RESUME_SENTINEL;

pub const REJECTION_MESSAGE: &str = "Only Resume and CV are allowed to review";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// The model reviewed the document.
    Reviewed,
    /// The gate or the model decided the document is not a resume.
    Rejected,
    /// The generation service could not be reached or answered garbage.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub status: ReviewStatus,
    /// Always within 0..=100.
    pub score: i32,
    /// Sweep of the circular score indicator, `score / 100 * 360`.
    pub score_degrees: f64,
    pub feedback: Feedback,
    pub message: Option<String>,
}

impl ReviewOutcome {
    fn reviewed(raw_score: u32, feedback: Feedback) -> Self {
        let score = clamp_score(raw_score);
        Self {
            status: ReviewStatus::Reviewed,
            score,
            score_degrees: score_degrees(score),
            feedback,
            message: None,
        }
    }

    fn without_review(status: ReviewStatus, message: String) -> Self {
        Self {
            status,
            score: 0,
            score_degrees: 0.0,
            feedback: Feedback::default(),
            message: Some(message),
        }
    }
}

pub fn clamp_score(raw: u32) -> i32 {
    raw.min(100) as i32
}

pub fn score_degrees(score: i32) -> f64 {
    f64::from(score.clamp(0, 100)) / 100.0 * 360.0
}

/// Runs one document's text through the full review.
pub async fn review_resume(
    text: &str,
    generator: &dyn FeedbackGenerator,
    parser: &dyn FeedbackParser,
) -> ReviewOutcome {
    if !is_resume_like(text) {
        info!(
            "Document rejected by resume gate ({} markers found)",
            count_markers(text)
        );
        return ReviewOutcome::without_review(
            ReviewStatus::Rejected,
            REJECTION_MESSAGE.to_string(),
        );
    }

    let raw = match generator.generate_feedback(text).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Resume analysis failed: {e}");
            return ReviewOutcome::without_review(
                ReviewStatus::Failed,
                format!("Error during resume analysis: {e}"),
            );
        }
    };

    let result = parser.parse(&raw);

    if result.feedback.is_empty() && mentions_sentinel(&raw) {
        info!("Model declined to review the document");
        return ReviewOutcome::without_review(
            ReviewStatus::Rejected,
            REJECTION_MESSAGE.to_string(),
        );
    }

    if result.score > 100 {
        warn!("Model reported out-of-range score {}, clamping", result.score);
    }
    info!("Resume reviewed: score {}", clamp_score(result.score));

    ReviewOutcome::reviewed(result.score, result.feedback)
}

fn mentions_sentinel(raw: &str) -> bool {
    let sentinel = NOT_A_RESUME_SENTINEL.trim_end_matches('.').to_lowercase();
    raw.to_lowercase().contains(&sentinel)
}
