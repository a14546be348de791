use async_trait::async_trait;
use chrono::NaiveDate;
use formularios::error::AppError;
use formularios::postings::{
    Applicant, Posting, PostingId, PostingRepository, PostingSummary, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// JSON fixture used to hydrate the in-memory store.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SeedData {
    #[serde(default)]
    pub(crate) postings: Vec<Posting>,
    #[serde(default)]
    pub(crate) applicants: Vec<Applicant>,
}

/// Read-only posting store backed by a seed fixture.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryPostingRepository {
    postings: Arc<Vec<Posting>>,
    applicants: Arc<Vec<Applicant>>,
}

impl InMemoryPostingRepository {
    pub(crate) fn from_seed(seed: SeedData) -> Self {
        Self {
            postings: Arc::new(seed.postings),
            applicants: Arc::new(seed.applicants),
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let seed: SeedData = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            postings = seed.postings.len(),
            applicants = seed.applicants.len(),
            "loaded posting seed fixture"
        );
        Ok(Self::from_seed(seed))
    }

    pub(crate) fn load_optional(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn find_posting(&self, posting_id: PostingId) -> Option<&Posting> {
        self.postings.iter().find(|posting| posting.id == posting_id)
    }
}

#[async_trait]
impl PostingRepository for InMemoryPostingRepository {
    async fn applicants_for_posting(
        &self,
        posting_id: PostingId,
    ) -> Result<Vec<Applicant>, RepositoryError> {
        let posting = self.find_posting(posting_id).cloned();
        Ok(self
            .applicants
            .iter()
            .filter(|applicant| applicant.posting_id == posting_id)
            .map(|applicant| Applicant {
                posting: posting.clone(),
                ..applicant.clone()
            })
            .collect())
    }

    async fn posting(&self, posting_id: PostingId) -> Result<Option<Posting>, RepositoryError> {
        Ok(self.find_posting(posting_id).cloned())
    }

    async fn postings_with_applicant_counts(&self) -> Result<Vec<PostingSummary>, RepositoryError> {
        let mut summaries: Vec<PostingSummary> = self
            .postings
            .iter()
            .map(|posting| PostingSummary {
                posting: posting.clone(),
                applicant_count: self
                    .applicants
                    .iter()
                    .filter(|applicant| applicant.posting_id == posting.id)
                    .count(),
            })
            .collect();
        summaries.sort_by(|a, b| b.posting.created_at.cmp(&a.posting.created_at));
        Ok(summaries)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
