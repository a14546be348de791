use std::collections::HashMap;

use tracing::{debug, error, info};

use super::applicant::package_applicant;
use super::archive::{ArchiveBuilder, ArchiveEncodingError};
use super::PackagedArchive;
use crate::postings::domain::{Applicant, Document};

/// Applicant records sharing one national ID within a posting.
#[derive(Debug, Clone)]
pub struct ExportUnit<'a> {
    pub national_id: &'a str,
    /// First record seen for this national ID; supplies the display fields.
    pub primary: &'a Applicant,
    pub records: Vec<&'a Applicant>,
}

impl<'a> ExportUnit<'a> {
    pub fn label(&self) -> String {
        self.primary.export_label()
    }

    /// Documents of every record in the unit, in record order.
    pub fn documents(&self) -> Vec<&'a Document> {
        self.records
            .iter()
            .copied()
            .flat_map(|record| record.documents.iter())
            .collect()
    }

    pub fn exportable_documents(&self) -> usize {
        self.records
            .iter()
            .map(|record| record.exportable_documents())
            .sum()
    }
}

/// Single pass grouping keyed by national ID, in order of first appearance.
pub fn group_by_national_id(applicants: &[Applicant]) -> Vec<ExportUnit<'_>> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut units: Vec<ExportUnit<'_>> = Vec::new();

    for applicant in applicants {
        let key = applicant.national_id.as_str();
        match positions.get(key) {
            Some(&position) => units[position].records.push(applicant),
            None => {
                positions.insert(key, units.len());
                units.push(ExportUnit {
                    national_id: key,
                    primary: applicant,
                    records: vec![applicant],
                });
            }
        }
    }

    units
}

/// Packages every export unit of one posting into a single archive.
///
/// A failure while packaging one unit is logged and that unit is left out; only
/// failures of the posting-level archive itself are returned.
pub fn package_posting(
    applicants: &[Applicant],
    posting_name: &str,
) -> Result<PackagedArchive, ArchiveEncodingError> {
    package_posting_with(applicants, posting_name, package_applicant)
}

/// [`package_posting`] with the per-unit packager supplied by the caller.
pub fn package_posting_with<F>(
    applicants: &[Applicant],
    posting_name: &str,
    package_unit: F,
) -> Result<PackagedArchive, ArchiveEncodingError>
where
    F: Fn(&[&Document], &str) -> Result<PackagedArchive, ArchiveEncodingError>,
{
    let mut archive = ArchiveBuilder::open();
    let mut documents_written = 0;
    let units = group_by_national_id(applicants);

    info!(
        posting = posting_name,
        records = applicants.len(),
        units = units.len(),
        "grouped applicants by national id"
    );

    for unit in &units {
        let label = unit.label();
        let documents = unit.documents();

        debug!(applicant = %label, documents = documents.len(), "packaging applicant");

        if unit.exportable_documents() == 0 {
            debug!(applicant = %label, "applicant has no documents; skipped");
            continue;
        }

        let packaged = match package_unit(&documents, &label) {
            Ok(packaged) => packaged,
            Err(err) => {
                error!(
                    posting = posting_name,
                    national_id = unit.national_id,
                    error = %err,
                    "failed to package applicant; continuing with remaining applicants"
                );
                continue;
            }
        };

        let stored = archive.add_entry(&format!("{label}.zip"), &packaged.bytes)?;
        documents_written += packaged.documents;
        debug!(
            posting = posting_name,
            entry = %stored,
            documents = packaged.documents,
            "applicant archive added"
        );
    }

    let entries = archive.len();
    info!(
        posting = posting_name,
        entries,
        documents = documents_written,
        "posting archive assembled"
    );

    Ok(PackagedArchive {
        bytes: archive.finalize()?,
        entries,
        documents: documents_written,
    })
}
