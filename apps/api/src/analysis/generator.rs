//! Feedback Generator — sends the review prompt to the generation service.
//!
//! `AppState` holds an `Arc<dyn FeedbackGenerator>`; the default backend is
//! `LlmClient`, and tests substitute a recording double.

use async_trait::async_trait;

use crate::analysis::prompts::build_review_prompt;
use crate::llm_client::{LlmClient, LlmError};

#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    /// Returns the model's raw, unstructured review of `resume_text`.
    async fn generate_feedback(&self, resume_text: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl FeedbackGenerator for LlmClient {
    async fn generate_feedback(&self, resume_text: &str) -> Result<String, LlmError> {
        let prompt = build_review_prompt(resume_text);
        self.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::config::Config;
    use crate::llm_client::tests::spawn_stub;

    #[tokio::test]
    async fn test_llm_client_sends_review_prompt() {
        let router = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["prompt"].as_str().unwrap_or_default();
                assert!(prompt.contains("professional resume reviewer"));
                assert!(prompt.contains("Experience: 3 years"));
                Json(json!({ "response": "Score: 70/100\nStrengths\n- ok" }))
            }),
        );
        let mut config = Config::for_tests();
        config.generation_url = spawn_stub(router).await;
        let client = LlmClient::new(&config).unwrap();

        let raw = client
            .generate_feedback("Experience: 3 years\nEducation: BSc")
            .await
            .unwrap();
        assert_eq!(raw, "Score: 70/100\nStrengths\n- ok");
    }
}
