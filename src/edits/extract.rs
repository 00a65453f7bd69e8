//! Extraction of ```` ```json files ```` blocks from answer text

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Opening fence, optional `json`, then `file` or `files`, body up to the
/// next closing fence.
const FILES_BLOCK_PATTERN: &str = r"(?is)```(?:json)?\s*files?\s*\n(.*?)```";

static FILES_BLOCK: OnceLock<Regex> = OnceLock::new();

fn files_block() -> &'static Regex {
    FILES_BLOCK.get_or_init(|| Regex::new(FILES_BLOCK_PATTERN).expect("files block pattern is valid"))
}

/// One file the answer asks to create or update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEdit {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Error)]
#[error("files block {block} is not valid JSON: {source}")]
pub struct ExtractError {
    /// 1-based index of the block in the answer
    pub block: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Edits found in an answer plus the blocks that could not be parsed
#[derive(Debug, Default)]
pub struct Extraction {
    pub edits: Vec<FileEdit>,
    pub errors: Vec<ExtractError>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.errors.is_empty()
    }
}

/// Collect every well-formed file edit from `answer`.
///
/// Array elements without string `path` and `content` fields are dropped;
/// a block whose body is not an array is ignored.
pub fn extract_file_edits(answer: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for (index, captures) in files_block().captures_iter(answer).enumerate() {
        let body = captures.get(1).map_or("", |m| m.as_str());

        let value: serde_json::Value = match serde_json::from_str(body.trim()) {
            Ok(value) => value,
            Err(source) => {
                extraction.errors.push(ExtractError {
                    block: index + 1,
                    source,
                });
                continue;
            }
        };

        let serde_json::Value::Array(items) = value else {
            debug!("Files block {} is not an array, ignoring", index + 1);
            continue;
        };

        extraction.edits.extend(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<FileEdit>(item).ok()),
        );
    }

    extraction
}
