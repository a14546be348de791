use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::postings::domain::{
    Applicant, ApplicantId, Document, DocumentId, Posting, PostingId, PostingStatus,
    PostingSummary,
};
use crate::postings::repository::{PostingRepository, RepositoryError};
use crate::postings::{posting_router, PostingService};

pub(super) fn posting(id: i64, title: Option<&str>) -> Posting {
    Posting {
        id: PostingId(id),
        title: title.map(str::to_string),
        description: Some("Apoyo administrativo".to_string()),
        requirements: vec!["Titulo tecnico".to_string()],
        opens_on: NaiveDate::from_ymd_opt(2025, 1, 6).expect("valid date"),
        closes_on: NaiveDate::from_ymd_opt(2025, 1, 31).expect("valid date"),
        status: PostingStatus::Active,
        created_at: Utc
            .with_ymd_and_hms(2025, 1, 2, 9, id.rem_euclid(60) as u32, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn encode(payload: &[u8]) -> String {
    STANDARD.encode(payload)
}

pub(super) fn pdf(id: &str, payload: &[u8], file_name: Option<&str>) -> Document {
    Document {
        id: DocumentId(id.to_string()),
        content: Some(encode(payload)),
        media_type: "application/pdf".to_string(),
        file_name: file_name.map(str::to_string),
    }
}

pub(super) fn empty_document(id: &str) -> Document {
    Document {
        id: DocumentId(id.to_string()),
        content: None,
        media_type: "application/pdf".to_string(),
        file_name: None,
    }
}

pub(super) fn applicant(
    id: &str,
    national_id: &str,
    names: &str,
    paternal_surname: &str,
    posting: &Posting,
    documents: Vec<Document>,
) -> Applicant {
    Applicant {
        id: ApplicantId(id.to_string()),
        national_id: national_id.to_string(),
        names: names.to_string(),
        paternal_surname: paternal_surname.to_string(),
        maternal_surname: None,
        email: format!("{id}@example.cl"),
        phone: None,
        posting_id: posting.id,
        documents,
        posting: Some(posting.clone()),
    }
}

/// Decompresses one archive level into `(name, payload)` pairs in stored order.
pub(super) fn read_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid archive");
    (0..archive.len())
        .map(|index| {
            let mut file = archive.by_index(index).expect("entry readable");
            let mut payload = Vec::new();
            file.read_to_end(&mut payload).expect("entry decompresses");
            (file.name().to_string(), payload)
        })
        .collect()
}

pub(super) fn entry_names(bytes: &[u8]) -> Vec<String> {
    read_entries(bytes)
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

/// Flattens the nested archive into `posting/applicant/document` paths with payloads.
pub(super) fn flatten_export(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut flattened = Vec::new();
    for (posting, posting_bytes) in read_entries(bytes) {
        for (applicant, applicant_bytes) in read_entries(&posting_bytes) {
            for (document, payload) in read_entries(&applicant_bytes) {
                flattened.push((format!("{posting}/{applicant}/{document}"), payload));
            }
        }
    }
    flattened
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) postings: Arc<Mutex<Vec<Posting>>>,
    pub(super) applicants: Arc<Mutex<Vec<Applicant>>>,
}

impl MemoryRepository {
    pub(super) fn with_posting(&self, posting: Posting) -> &Self {
        self.postings
            .lock()
            .expect("repository mutex poisoned")
            .push(posting);
        self
    }

    pub(super) fn with_applicant(&self, applicant: Applicant) -> &Self {
        self.applicants
            .lock()
            .expect("repository mutex poisoned")
            .push(applicant);
        self
    }
}

#[async_trait]
impl PostingRepository for MemoryRepository {
    async fn applicants_for_posting(
        &self,
        posting_id: PostingId,
    ) -> Result<Vec<Applicant>, RepositoryError> {
        let guard = self.applicants.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|applicant| applicant.posting_id == posting_id)
            .cloned()
            .collect())
    }

    async fn posting(&self, posting_id: PostingId) -> Result<Option<Posting>, RepositoryError> {
        let guard = self.postings.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|posting| posting.id == posting_id).cloned())
    }

    async fn postings_with_applicant_counts(&self) -> Result<Vec<PostingSummary>, RepositoryError> {
        let postings = self.postings.lock().expect("repository mutex poisoned");
        let applicants = self.applicants.lock().expect("repository mutex poisoned");
        let mut summaries: Vec<PostingSummary> = postings
            .iter()
            .map(|posting| PostingSummary {
                posting: posting.clone(),
                applicant_count: applicants
                    .iter()
                    .filter(|applicant| applicant.posting_id == posting.id)
                    .count(),
            })
            .collect();
        summaries.sort_by(|a, b| b.posting.created_at.cmp(&a.posting.created_at));
        Ok(summaries)
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl PostingRepository for UnavailableRepository {
    async fn applicants_for_posting(
        &self,
        _posting_id: PostingId,
    ) -> Result<Vec<Applicant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn posting(&self, _posting_id: PostingId) -> Result<Option<Posting>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn postings_with_applicant_counts(&self) -> Result<Vec<PostingSummary>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// P1 "Analista Contable": Ana (1-1) with two PDFs, Bruno (2-2) with none. P2 has no applicants.
pub(super) fn scenario_repository() -> Arc<MemoryRepository> {
    let repository = MemoryRepository::default();
    let first = posting(1, Some("Analista Contable"));
    let second = posting(2, Some("Chofer"));

    repository
        .with_posting(first.clone())
        .with_posting(second)
        .with_applicant(applicant(
            "ana",
            "1-1",
            "Ana",
            "Rojas",
            &first,
            vec![
                pdf("doc-1", b"curriculum", Some("cv.pdf")),
                pdf("doc-2", b"certificado", None),
            ],
        ))
        .with_applicant(applicant("bruno", "2-2", "Bruno", "Soto", &first, Vec::new()));

    Arc::new(repository)
}

pub(super) fn build_service(repository: Arc<MemoryRepository>) -> PostingService<MemoryRepository> {
    PostingService::new(repository)
}

pub(super) fn router_with_repository<R>(repository: Arc<R>) -> axum::Router
where
    R: PostingRepository + 'static,
{
    posting_router(Arc::new(PostingService::new(repository)))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
