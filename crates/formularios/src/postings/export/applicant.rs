use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use tracing::{debug, warn};

use super::archive::{ArchiveBuilder, ArchiveEncodingError};
use super::PackagedArchive;
use crate::postings::domain::Document;

/// Standard alphabet, padding optional, trailing bits tolerated.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes stored content, ignoring line breaks and other ASCII whitespace.
pub fn decode_content(content: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Vec<u8> = content
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    LENIENT.decode(compact)
}

/// Packages one export unit's documents into a single archive.
///
/// Documents without content or with undecodable content are skipped. Entry numbering
/// follows the position in `documents`, so skipped documents leave gaps.
pub fn package_applicant(
    documents: &[&Document],
    label: &str,
) -> Result<PackagedArchive, ArchiveEncodingError> {
    let mut archive = ArchiveBuilder::open();

    for (index, document) in documents.iter().enumerate() {
        let content = match document.content.as_deref() {
            Some(content) if document.has_content() => content,
            _ => {
                warn!(
                    document_id = %document.id,
                    applicant = label,
                    "document has no content; skipped"
                );
                continue;
            }
        };

        let payload = match decode_content(content) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    document_id = %document.id,
                    applicant = label,
                    error = %err,
                    "document content is not valid base64; skipped"
                );
                continue;
            }
        };

        let requested = document_entry_name(document, index + 1);
        let stored = archive.add_entry(&requested, &payload)?;
        debug!(applicant = label, entry = %stored, bytes = payload.len(), "document added");
    }

    let entries = archive.len();
    if entries == 0 {
        warn!(applicant = label, "no documents were added for applicant");
    }
    debug!(
        applicant = label,
        added = entries,
        total = documents.len(),
        "applicant archive assembled"
    );

    Ok(PackagedArchive {
        bytes: archive.finalize()?,
        entries,
        documents: entries,
    })
}

/// Stored filename when present, otherwise `documento_{position}.{pdf|bin}`.
pub fn document_entry_name(document: &Document, position: usize) -> String {
    match document.file_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            let extension = if document.is_pdf() { "pdf" } else { "bin" };
            format!("documento_{position}.{extension}")
        }
    }
}
