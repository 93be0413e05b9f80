//! Resume Gate — a cheap pre-filter that keeps obviously unrelated documents
//! away from the generation service. False positives and negatives are tolerated.

/// Section words that almost every resume or CV contains.
pub const RESUME_MARKERS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "summary",
    "projects",
    "certifications",
];

/// Minimum number of distinct markers for a document to count as resume-like.
pub const MIN_MARKER_MATCHES: usize = 2;

/// Number of distinct markers present in `text`, case-insensitively.
/// A marker repeated many times still counts once.
pub fn count_markers(text: &str) -> usize {
    let text_lower = text.to_lowercase();
    RESUME_MARKERS
        .iter()
        .filter(|marker| text_lower.contains(*marker))
        .count()
}

pub fn is_resume_like(text: &str) -> bool {
    count_markers(text) >= MIN_MARKER_MATCHES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_markers_pass() {
        assert!(is_resume_like("Work Experience ... Education: BSc"));
    }

    #[test]
    fn test_single_marker_fails() {
        assert!(!is_resume_like("Ten years of experience selling widgets."));
    }

    #[test]
    fn test_repeated_marker_counts_once() {
        let text = "experience experience EXPERIENCE Experience";
        assert_eq!(count_markers(text), 1);
        assert!(!is_resume_like(text));
    }

    #[test]
    fn test_no_markers_fails() {
        assert!(!is_resume_like("quarterly sales report"));
        assert!(!is_resume_like(""));
    }

    #[test]
    fn test_case_insensitive_and_substring() {
        // "Skillset" contains "skills"; "PROJECTS" matches regardless of case.
        assert!(is_resume_like("SKILLSET: Rust\nPROJECTS: compiler"));
    }

    #[test]
    fn test_extraction_error_messages_never_pass() {
        for message in [
            "Unsupported file format. Only PDF and DOCX are allowed.",
            "No extractable text found in PDF.",
            "No extractable text found in DOCX.",
            "Error extracting text: invalid file header",
        ] {
            assert!(!is_resume_like(message), "{message}");
        }
    }

    #[test]
    fn test_full_resume_counts_every_marker() {
        let text = "Summary\nExperience\nEducation\nSkills\nProjects\nCertifications";
        assert_eq!(count_markers(text), RESUME_MARKERS.len());
    }
}
