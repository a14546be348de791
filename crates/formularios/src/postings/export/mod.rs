//! Bulk document export as nested ZIP archives.
//!
//! The top-level archive holds one `{posting}.zip` per posting with documents; each of
//! those holds one `{names}_{surname}_{national_id}.zip` per export unit, which in turn
//! holds the unit's documents. Every level is a fully formed archive embedded as an
//! opaque entry in its parent.

mod applicant;
mod archive;
mod orchestrator;
mod posting;

use chrono::NaiveDate;

pub use applicant::{decode_content, document_entry_name, package_applicant};
pub use archive::{ArchiveBuilder, ArchiveEncodingError, COMPRESSION_LEVEL};
pub use orchestrator::{DocumentExport, DocumentExporter, ExportError};
pub use posting::{group_by_national_id, package_posting, package_posting_with, ExportUnit};

/// Completed archive buffer along with the number of entries written to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedArchive {
    pub bytes: Vec<u8>,
    pub entries: usize,
    /// Documents written anywhere beneath this archive.
    pub documents: usize,
}

/// `Postulaciones{YYYYMMDD}.zip` for the given export date.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("Postulaciones{}.zip", date.format("%Y%m%d"))
}
