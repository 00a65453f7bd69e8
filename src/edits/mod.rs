//! File edits proposed inside answers
//!
//! Answers may carry fenced ```` ```json files ```` blocks holding a JSON array
//! of `{ "path", "content" }` objects. [`extract_file_edits`] pulls them out
//! and [`apply_file_edits`] writes them below the project root.

pub mod apply;
pub mod extract;

pub use apply::{apply_file_edits, EditOutcome, EditStatus};
pub use extract::{extract_file_edits, Extraction, FileEdit};
