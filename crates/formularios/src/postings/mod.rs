//! Job postings, their applicants, and bulk export of submitted documents.

pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, ApplicantId, Document, DocumentId, Posting, PostingId, PostingStatus,
    PostingSummary,
};
pub use export::{
    export_file_name, ArchiveBuilder, ArchiveEncodingError, DocumentExport, DocumentExporter,
    ExportError,
};
pub use repository::{PostingRepository, RepositoryError};
pub use router::{posting_router, DownloadRequest};
pub use service::{PostingService, PostingServiceError};
