//! Response Parser — turns the model's free-form review into an `AnalysisResult`.
//!
//! The model is asked for labeled sections but nothing enforces a schema, so the
//! default parser locates headers by position rather than trusting their order.
//! Callers only see the `FeedbackParser` trait; a structured-output parser can
//! replace `HeaderSectionParser` without touching them.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::models::{AnalysisResult, Feedback, FeedbackSection};

/// `<1-3 digits>`, optional whitespace, optional `/`, optional whitespace, `100`.
static SCORE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,3})\s*/?\s*100").expect("score pattern is valid"));

pub trait FeedbackParser: Send + Sync {
    fn parse(&self, raw: &str) -> AnalysisResult;
}

/// Default parser: regex score extraction plus header-position section splitting.
pub struct HeaderSectionParser;

impl FeedbackParser for HeaderSectionParser {
    fn parse(&self, raw: &str) -> AnalysisResult {
        AnalysisResult {
            score: extract_score(raw),
            feedback: extract_sections(raw),
        }
    }
}

/// First score-like match in `raw`, or 0. Values above 100 are returned as-is.
pub fn extract_score(raw: &str) -> u32 {
    SCORE_PATTERN
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

pub fn extract_sections(raw: &str) -> Feedback {
    let mut feedback = Feedback::default();
    for (section, span) in locate_sections(raw) {
        if let Some(span) = span {
            let body = &raw[span.start + section.label().len()..span.end];
            feedback.set_section(section, section_points(body));
        }
    }
    feedback
}

/// Byte span of every section, header included. A header that never appears
/// gets `None`. Sections run from their header to the next header in text
/// order, whatever order the model used.
fn locate_sections(raw: &str) -> Vec<(FeedbackSection, Option<Range<usize>>)> {
    // ASCII lowering keeps byte offsets aligned with `raw`.
    let haystack = raw.to_ascii_lowercase();

    let mut found: Vec<(FeedbackSection, usize)> = Vec::new();
    let mut missing = Vec::new();
    for section in FeedbackSection::ALL {
        let needle = section.label().to_ascii_lowercase();
        match haystack.find(&needle) {
            Some(pos) => found.push((section, pos)),
            None => missing.push((section, None)),
        }
    }
    found.sort_by_key(|(_, pos)| *pos);

    let mut spans: Vec<_> = found
        .iter()
        .enumerate()
        .map(|(i, (section, start))| {
            let end = found.get(i + 1).map_or(raw.len(), |(_, next)| *next);
            (*section, Some(*start..end.max(*start + section.label().len())))
        })
        .collect();
    spans.extend(missing);
    spans
}

/// Splits a section body into cleaned bullet points.
///
/// The body starts right after the header, so its first line is whatever
/// trails the header (usually just `:` or `**`); it only counts if real text remains.
fn section_points(body: &str) -> Vec<String> {
    let mut lines = body.lines();
    let mut points = Vec::new();

    if let Some(rest) = lines.next() {
        let rest = rest.trim_matches(|c: char| c == ':' || c == '*' || c == '#' || c.is_whitespace());
        push_point(&mut points, rest);
    }
    for line in lines {
        push_point(&mut points, line);
    }
    points
}

fn push_point(points: &mut Vec<String>, line: &str) {
    let cleaned = line
        .trim_matches(|c: char| matches!(c, '-' | '*' | '•' | ' '))
        .trim();
    if !cleaned.is_empty() {
        points.push(cleaned.to_string());
    }
}
