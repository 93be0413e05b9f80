//! Persistence for reviewed resumes. Append-only: one INSERT per upload, no UPDATEs.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::{Feedback, FeedbackSection};
use crate::models::resume::{ResumeHistoryRow, ResumeRow};

/// Parameters for storing one review.
pub struct NewResumeRecord<'a> {
    pub user_id: Uuid,
    pub filename: &'a str,
    pub content: &'a str,
    pub score: i32,
    pub feedback: &'a Feedback,
}

/// A history entry with its feedback decoded.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub filename: String,
    pub score: i32,
    pub feedback: Feedback,
    pub created_at: DateTime<Utc>,
}

impl From<ResumeHistoryRow> for HistoryEntry {
    fn from(row: ResumeHistoryRow) -> Self {
        HistoryEntry {
            feedback: Feedback::from_stored(&row.feedback),
            id: row.id,
            filename: row.filename,
            score: row.score,
            created_at: row.created_at,
        }
    }
}

pub async fn insert_resume_record(
    pool: &PgPool,
    record: NewResumeRecord<'_>,
) -> Result<ResumeRow, sqlx::Error> {
    let NewResumeRecord {
        user_id,
        filename,
        content,
        score,
        feedback,
    } = record;

    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, user_id, filename, content, score, feedback)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(strip_nul(filename))
    .bind(strip_nul(content))
    .bind(score.clamp(0, 100))
    .bind(Json(feedback_without_nul(feedback)))
    .fetch_one(pool)
    .await?;

    info!("Stored resume {} (score {}) for user {user_id}", row.id, row.score);
    Ok(row)
}

/// Postgres TEXT and JSONB reject NUL characters; PDF text and model output can carry them.
fn strip_nul(text: &str) -> Cow<'_, str> {
    if text.contains('\0') {
        Cow::Owned(text.replace('\0', ""))
    } else {
        Cow::Borrowed(text)
    }
}

fn feedback_without_nul(feedback: &Feedback) -> Feedback {
    let mut clean = Feedback::default();
    for section in FeedbackSection::ALL {
        let points = feedback
            .section(section)
            .iter()
            .map(|p| strip_nul(p).into_owned())
            .collect();
        clean.set_section(section, points);
    }
    clean
}

/// All reviews for a user, newest first.
pub async fn get_resume_history(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<HistoryEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ResumeHistoryRow>(
        r#"
        SELECT id, filename, score, feedback, created_at
        FROM resumes
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(HistoryEntry::from).collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn history_row(feedback: serde_json::Value) -> ResumeHistoryRow {
        ResumeHistoryRow {
            id: Uuid::new_v4(),
            filename: "cv.pdf".to_string(),
            score: 72,
            feedback,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_strip_nul_removes_only_nul() {
        assert_eq!(strip_nul("cv\0.pdf"), "cv.pdf");
        assert_eq!(strip_nul("Skills\0\0 Rust"), "Skills Rust");
        assert!(matches!(strip_nul("plain text"), Cow::Borrowed("plain text")));
    }

    #[test]
    fn test_feedback_without_nul_keeps_sections_and_order() {
        let feedback = Feedback {
            strengths: vec!["Clear\0".into(), "Concise".into()],
            weaknesses: vec![],
            formatting_issues: vec!["\0Fonts".into()],
            suggestions: vec!["Add dates".into()],
        };
        let clean = feedback_without_nul(&feedback);
        assert_eq!(clean.strengths, vec!["Clear", "Concise"]);
        assert_eq!(clean.formatting_issues, vec!["Fonts"]);
        assert_eq!(clean.suggestions, vec!["Add dates"]);
        assert!(serde_json::to_string(&clean).unwrap().find("\\u0000").is_none());
    }

    #[test]
    fn test_history_entry_decodes_feedback() {
        let entry = HistoryEntry::from(history_row(json!({
            "Strengths": ["Clear"],
            "Weaknesses": [],
            "Formatting Issues": ["Fonts"],
            "Suggestions": []
        })));
        assert_eq!(entry.feedback.strengths, vec!["Clear"]);
        assert_eq!(entry.feedback.formatting_issues, vec!["Fonts"]);
        assert_eq!(entry.score, 72);
    }

    #[test]
    fn test_history_entry_with_corrupt_feedback_is_empty() {
        let entry = HistoryEntry::from(history_row(json!("{not json")));
        assert!(entry.feedback.is_empty());
        assert_eq!(entry.filename, "cv.pdf");
    }

    #[test]
    fn test_history_entry_serializes_all_sections() {
        let entry = HistoryEntry::from(history_row(json!({})));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["feedback"]["Suggestions"], json!([]));
        assert_eq!(value["score"], 72);
    }
}
