use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use super::archive::{ArchiveBuilder, ArchiveEncodingError};
use super::posting::package_posting;
use crate::postings::domain::{posting_display_name, Applicant, Posting, PostingId};
use crate::postings::repository::{PostingRepository, RepositoryError};

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct DocumentExport {
    /// Top-level archive bytes.
    pub bytes: Vec<u8>,
    /// Posting archive entry names, in request order.
    pub postings: Vec<String>,
    /// Documents written into the archive.
    pub documents_found: usize,
}

/// Builds the postings -> applicants -> documents archive hierarchy.
///
/// Postings are loaded and packaged one at a time in request order. Packaging runs on
/// the blocking pool and is awaited before the next posting is loaded.
pub struct DocumentExporter<R> {
    repository: Arc<R>,
}

impl<R> DocumentExporter<R>
where
    R: PostingRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn export(&self, posting_ids: &[PostingId]) -> Result<DocumentExport, ExportError> {
        info!(postings = ?posting_ids, "exporting applicant documents");

        let mut archive = ArchiveBuilder::open();
        let mut seen = HashSet::new();
        let mut postings = Vec::new();
        let mut documents_found = 0usize;

        for &posting_id in posting_ids {
            if !seen.insert(posting_id) {
                warn!(%posting_id, "posting requested more than once; repeat ignored");
                continue;
            }

            let applicants = self.repository.applicants_for_posting(posting_id).await?;
            if applicants.is_empty() {
                warn!(%posting_id, "no applicants found for posting");
                continue;
            }

            let candidates: usize = applicants.iter().map(Applicant::exportable_documents).sum();
            info!(
                %posting_id,
                applicants = applicants.len(),
                documents = candidates,
                "loaded applicants for posting"
            );

            if candidates == 0 {
                warn!(%posting_id, "no documents found for posting applicants");
                continue;
            }

            let display_name = display_name_for(posting_id, &applicants);
            let (returned, stored, written) = tokio::task::spawn_blocking(move || {
                append_posting(archive, &applicants, &display_name)
            })
            .await??;
            archive = returned;
            documents_found += written;

            match stored {
                Some(stored) => {
                    info!(
                        %posting_id,
                        entry = %stored,
                        documents = written,
                        "posting archive added"
                    );
                    postings.push(stored);
                }
                None => warn!(%posting_id, "no documents could be decoded; posting skipped"),
            }
        }

        info!(
            documents_found,
            postings_included = postings.len(),
            "document export summary"
        );

        if documents_found == 0 {
            return Err(ExportError::NoDocumentsFound);
        }

        let bytes = tokio::task::spawn_blocking(move || archive.finalize()).await??;

        Ok(DocumentExport {
            bytes,
            postings,
            documents_found,
        })
    }
}

/// Packages one posting into `archive`, leaving it out when no document was written.
fn append_posting(
    mut archive: ArchiveBuilder,
    applicants: &[Applicant],
    display_name: &str,
) -> Result<(ArchiveBuilder, Option<String>, usize), ArchiveEncodingError> {
    let packaged = package_posting(applicants, display_name)?;
    if packaged.documents == 0 {
        return Ok((archive, None, 0));
    }
    let stored = archive.add_entry(&format!("{display_name}.zip"), &packaged.bytes)?;
    Ok((archive, Some(stored), packaged.documents))
}

fn display_name_for(posting_id: PostingId, applicants: &[Applicant]) -> String {
    applicants
        .first()
        .and_then(|applicant| applicant.posting.as_ref())
        .map(Posting::display_name)
        .unwrap_or_else(|| posting_display_name(posting_id, None))
}

/// Error raised by the export pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no documents found for any applicant in the requested postings")]
    NoDocumentsFound,
    #[error(transparent)]
    Archive(#[from] ArchiveEncodingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("packaging task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
