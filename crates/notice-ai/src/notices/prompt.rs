use std::fmt::Write;

use super::domain::{Importance, NoticeCategory, NoticeSubmission, EXAMPLE_TAGS};

fn quoted_alternatives<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels
        .map(|label| format!("\"{label}\""))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Builds the classification instruction for one notice.
///
/// Title and content are embedded verbatim. The model sees them inline with
/// the instruction, so a notice that contains instructions of its own can
/// steer the result.
pub fn build_classification_prompt(submission: &NoticeSubmission) -> String {
    let categories = quoted_alternatives(NoticeCategory::ALL.iter().map(|c| c.label()));
    let importance = quoted_alternatives(Importance::ALL.iter().map(|i| i.label()));
    let tags = EXAMPLE_TAGS
        .iter()
        .map(|tag| format!("\"{tag}\""))
        .collect::<Vec<_>>()
        .join(",");

    let mut prompt = String::new();
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Analyze the following campus notice and classify it.");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Title: {}", submission.title);
    let _ = writeln!(prompt, "Content: {}", submission.content);
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Return ONLY a valid JSON object in this format:");
    let _ = writeln!(prompt, "{{");
    let _ = writeln!(prompt, "  \"category\": {categories},");
    let _ = writeln!(prompt, "  \"importance\": {importance},");
    let _ = writeln!(prompt, "  \"tags\": [{tags}]");
    let _ = writeln!(prompt, "}}");
    prompt
}
