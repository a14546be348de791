use async_trait::async_trait;

use super::domain::{Applicant, Posting, PostingId, PostingSummary};

/// Read-only storage abstraction consumed by the posting service and export pipeline.
///
/// Persistence (inserts, updates, migrations) lives behind the implementor.
#[async_trait]
pub trait PostingRepository: Send + Sync {
    /// Applicants of one posting with their documents and parent posting attached.
    async fn applicants_for_posting(
        &self,
        posting_id: PostingId,
    ) -> Result<Vec<Applicant>, RepositoryError>;

    async fn posting(&self, posting_id: PostingId) -> Result<Option<Posting>, RepositoryError>;

    /// Every posting, newest first, with its applicant count.
    async fn postings_with_applicant_counts(&self) -> Result<Vec<PostingSummary>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
