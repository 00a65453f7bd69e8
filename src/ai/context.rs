//! Query assembly for codebase questions
//!
//! Combines the project summary, the current-file digest and the question
//! into the text sent to the question-answering service, keeping the project
//! summary inside a character budget.

use std::borrow::Cow;

pub const TRUNCATION_MARKER: &str = "... (summary truncated)";

/// Appended to every query so answers can carry file edits
const FILE_INSTRUCTIONS_NOTE: &str = r#"Note: If you need to generate or update files, please provide the file generation instructions in the following JSON format wrapped in a code block:

```json files
[
    {
        "path": "relative/path/to/file.ts",
        "content": "file content here"
    }
]
```"#;

/// Builds query text within a summary budget
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    max_summary_chars: usize,
}

impl ContextBuilder {
    /// `max_summary_chars == 0` means no cap
    pub fn new(max_summary_chars: usize) -> Self {
        Self { max_summary_chars }
    }

    pub fn build_query(&self, question: &str, project_summary: &str, file_context: Option<&str>) -> String {
        let summary = truncate_summary(project_summary, self.max_summary_chars);
        format!(
            "Context:\n{}\n{}\n\nQuestion: {}\n\n{}\n",
            summary.trim_end(),
            file_context.unwrap_or(""),
            question,
            FILE_INSTRUCTIONS_NOTE
        )
    }
}

/// Cut `text` to at most `max_chars` characters plus a marker line.
///
/// The cut lands on the last line boundary inside the budget when there is
/// one, so no outline entry is split in half.
pub fn truncate_summary(text: &str, max_chars: usize) -> Cow<'_, str> {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }

    let byte_limit = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let head = &text[..byte_limit];
    let head = match head.rfind('\n') {
        Some(newline) => &head[..=newline],
        None => head,
    };

    let mut out = String::with_capacity(head.len() + TRUNCATION_MARKER.len() + 1);
    out.push_str(head);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(TRUNCATION_MARKER);
    out.push('\n');
    Cow::Owned(out)
}

/// Estimate tokens (rough approximation)
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}
