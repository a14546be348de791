use std::sync::Arc;

use super::domain::{Posting, PostingId, PostingSummary};
use super::export::{DocumentExport, DocumentExporter, ExportError};
use super::repository::{PostingRepository, RepositoryError};

/// Service composing the posting repository and the document export pipeline.
pub struct PostingService<R> {
    repository: Arc<R>,
    exporter: DocumentExporter<R>,
}

impl<R> PostingService<R>
where
    R: PostingRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        let exporter = DocumentExporter::new(repository.clone());
        Self {
            repository,
            exporter,
        }
    }

    /// All postings, newest first, with applicant counts.
    pub async fn list(&self) -> Result<Vec<PostingSummary>, PostingServiceError> {
        Ok(self.repository.postings_with_applicant_counts().await?)
    }

    pub async fn get(&self, posting_id: PostingId) -> Result<Posting, PostingServiceError> {
        let posting = self
            .repository
            .posting(posting_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(posting)
    }

    /// Export every document submitted to `posting_ids` as one nested archive.
    pub async fn export_documents(
        &self,
        posting_ids: &[PostingId],
    ) -> Result<DocumentExport, PostingServiceError> {
        Ok(self.exporter.export(posting_ids).await?)
    }
}

/// Error raised by the posting service.
#[derive(Debug, thiserror::Error)]
pub enum PostingServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
