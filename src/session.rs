//! Analysis and question state for one user session
//!
//! A session holds the latest project snapshot and the conversation context.
//! Both are replaced as whole values after a successful operation, so a
//! reader holding the previous `Arc` never sees a half-built tree.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::ai::context::estimate_tokens;
use crate::ai::{Answer, ContextBuilder, QuestionService, RemoteError};
use crate::project::summary::{summarize_file, summarize_project};
use crate::project::{FileEntry, Node, ProjectSnapshot, ScanError, Scanner};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please analyze the project structure first")]
    NotAnalyzed,

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("scan worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Carried between queries to keep the remote conversation going
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    pub conversation_id: Option<String>,
    pub current_file_path: Option<PathBuf>,
}

/// The file the user is looking at while asking
#[derive(Debug, Clone)]
pub struct CurrentFile {
    pub path: PathBuf,
    pub content: String,
}

impl CurrentFile {
    pub fn from_entry(entry: &FileEntry) -> Self {
        Self {
            path: entry.path().to_path_buf(),
            content: entry.content().to_string(),
        }
    }
}

pub struct Session {
    scanner: Scanner,
    context: ContextBuilder,
    snapshot: Option<Arc<ProjectSnapshot>>,
    conversation: ConversationContext,
}

impl Session {
    pub fn new(scanner: Scanner, context: ContextBuilder) -> Self {
        Self {
            scanner,
            context,
            snapshot: None,
            conversation: ConversationContext::default(),
        }
    }

    /// Continue an existing remote conversation
    pub fn with_conversation_id(mut self, conversation_id: Option<String>) -> Self {
        self.conversation = ConversationContext {
            conversation_id,
            current_file_path: None,
        };
        self
    }

    pub fn snapshot(&self) -> Option<Arc<ProjectSnapshot>> {
        self.snapshot.clone()
    }

    pub fn conversation(&self) -> &ConversationContext {
        &self.conversation
    }

    /// Scan `root` on a blocking worker and swap in the new snapshot.
    /// The previous snapshot survives a failed scan.
    pub async fn analyze(&mut self, root: &Path) -> Result<Arc<ProjectSnapshot>, SessionError> {
        let scanner = self.scanner.clone();
        let root = root.to_path_buf();

        let snapshot = tokio::task::spawn_blocking(move || scanner.scan(&root)).await??;
        let snapshot = Arc::new(snapshot);
        self.snapshot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// The scanned copy of `path`, if the snapshot holds it
    pub fn tracked_file(&self, path: &Path) -> Option<CurrentFile> {
        let snapshot = self.snapshot.as_ref()?;
        let relative = path.strip_prefix(&snapshot.root).ok()?;
        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        match snapshot.tree.lookup(components.iter().map(String::as_str))? {
            Node::File(entry) => Some(CurrentFile::from_entry(entry)),
            Node::Directory(_) => None,
        }
    }

    /// The project summary of the current snapshot
    pub fn project_summary(&self) -> Result<String, SessionError> {
        let snapshot = self.snapshot.as_ref().ok_or(SessionError::NotAnalyzed)?;
        Ok(summarize_project(Some(&snapshot.tree), self.scanner.rules()))
    }

    /// Full query text for `question`
    pub fn prepare_query(&self, question: &str, current_file: Option<&CurrentFile>) -> Result<String, SessionError> {
        let summary = self.project_summary()?;
        let file_context = current_file.map(|file| summarize_file(&file.path.display().to_string(), &file.content));

        Ok(self.context.build_query(question, &summary, file_context.as_deref()))
    }

    /// Ask `question` and move the conversation forward
    pub async fn ask<S>(&mut self, service: &S, question: &str, current_file: Option<&CurrentFile>) -> Result<Answer, SessionError>
    where
        S: QuestionService + ?Sized,
    {
        let query = self.prepare_query(question, current_file)?;
        debug!("Query is ~{} tokens", estimate_tokens(&query));

        let answer = service
            .ask(&query, self.conversation.conversation_id.as_deref())
            .await?;

        self.conversation = ConversationContext {
            conversation_id: answer
                .conversation_id
                .clone()
                .or_else(|| self.conversation.conversation_id.clone()),
            current_file_path: current_file.map(|file| file.path.clone()),
        };
        info!(
            "Answer {} received (conversation {})",
            answer.message_id.as_deref().unwrap_or("-"),
            self.conversation.conversation_id.as_deref().unwrap_or("-")
        );

        Ok(answer)
    }

    pub fn reset_conversation(&mut self) {
        self.conversation = ConversationContext::default();
    }
}
