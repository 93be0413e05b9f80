// Prompt constants for resume review.

/// Sentence the model is told to answer with when the document is not a resume.
pub const NOT_A_RESUME_SENTINEL: &str = "Only Resume and CV are allowed to review.";

/// Review prompt template. Replace `{resume_text}` before sending.
pub const REVIEW_PROMPT_TEMPLATE: &str = r#"
You're a professional resume reviewer. Analyze the following resume and return in clearly labeled sections:
- Score out of 100 (based on relevance, formatting, keyword density, grammar)
- Strengths (bullet points)
- Weaknesses (bullet points)
- Formatting Issues (bullet points)
- Suggestions to improve clarity and keyword relevance (bullet points)
- Review only the resume and CV. If another document is provided, say "{sentinel}"

Resume:
{resume_text}
"#;

/// Builds the full review prompt for `resume_text`.
pub fn build_review_prompt(resume_text: &str) -> String {
    REVIEW_PROMPT_TEMPLATE
        .replace("{sentinel}", NOT_A_RESUME_SENTINEL)
        .replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::FeedbackSection;

    #[test]
    fn test_prompt_embeds_full_text() {
        let text = "Jane Doe\nExperience: 5 years Rust\nEducation: MSc";
        let prompt = build_review_prompt(text);
        assert!(prompt.contains(text));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_prompt_names_every_section_and_score() {
        let prompt = build_review_prompt("x");
        assert!(prompt.contains("Score out of 100"));
        for section in FeedbackSection::ALL {
            assert!(prompt.contains(section.label()), "missing {}", section.label());
        }
    }

    #[test]
    fn test_prompt_includes_rejection_sentinel() {
        let prompt = build_review_prompt("x");
        assert!(prompt.contains(NOT_A_RESUME_SENTINEL));
        assert!(!prompt.contains("{sentinel}"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_review_prompt("same"), build_review_prompt("same"));
    }
}
