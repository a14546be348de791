use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings ("formularios").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingId(pub i64);

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for applicant records ("postulantes").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantId(pub String);

/// Identifier wrapper for uploaded documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Publication state of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PostingStatus {
    #[default]
    #[serde(rename = "Activo")]
    Active,
    #[serde(rename = "Inactivo")]
    Inactive,
    #[serde(rename = "Cerrado")]
    Closed,
}

/// A job opening accepting applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub id: PostingId,
    /// Role name ("cargo"); used as the archive display name when present.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub opens_on: NaiveDate,
    pub closes_on: NaiveDate,
    #[serde(default)]
    pub status: PostingStatus,
    pub created_at: DateTime<Utc>,
}

impl Posting {
    /// Name used for the posting-level archive entry.
    pub fn display_name(&self) -> String {
        posting_display_name(self.id, self.title.as_deref())
    }
}

/// Falls back to `Postulacion_{id}` when the posting has no usable title.
pub fn posting_display_name(id: PostingId, title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => format!("Postulacion_{id}"),
    }
}

/// Posting listing row carrying how many applicant records reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostingSummary {
    #[serde(flatten)]
    pub posting: Posting,
    #[serde(rename = "cantidad_postulantes")]
    pub applicant_count: usize,
}

/// A person who submitted data and documents against one posting.
///
/// The national ID is not unique per posting; several records may share it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub national_id: String,
    pub names: String,
    pub paternal_surname: String,
    #[serde(default)]
    pub maternal_surname: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub posting_id: PostingId,
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Parent posting, attached eagerly by the repository.
    #[serde(default)]
    pub posting: Option<Posting>,
}

impl Applicant {
    /// `{names}_{paternal_surname}_{national_id}`
    pub fn export_label(&self) -> String {
        format!(
            "{}_{}_{}",
            self.names, self.paternal_surname, self.national_id
        )
    }

    pub fn exportable_documents(&self) -> usize {
        self.documents
            .iter()
            .filter(|document| document.has_content())
            .count()
    }
}

/// Uploaded file owned by exactly one applicant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Base64 encoded payload.
    #[serde(default)]
    pub content: Option<String>,
    pub media_type: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl Document {
    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .is_some_and(|content| !content.trim().is_empty())
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type
            .parse::<mime::Mime>()
            .map(|media| media.essence_str() == mime::APPLICATION_PDF.essence_str())
            .unwrap_or(false)
    }
}
