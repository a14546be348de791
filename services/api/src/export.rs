use crate::infra::InMemoryPostingRepository;
use chrono::{Local, NaiveDate};
use clap::Args;
use formularios::config::AppConfig;
use formularios::error::AppError;
use formularios::postings::{export_file_name, PostingId, PostingService};
use formularios::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// JSON fixture with postings and applicants
    #[arg(long)]
    pub(crate) seed: PathBuf,
    /// Posting identifier to include (repeatable, processed in order)
    #[arg(long = "posting", required = true)]
    pub(crate) postings: Vec<i64>,
    /// Directory the archive is written to
    #[arg(long, default_value = ".")]
    pub(crate) out_dir: PathBuf,
    /// Export date used in the archive name (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) async fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        seed,
        postings,
        out_dir,
        date,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let repository = Arc::new(InMemoryPostingRepository::load(&seed)?);
    let service = PostingService::new(repository);

    let posting_ids: Vec<PostingId> = postings.into_iter().map(PostingId).collect();
    let export = service.export_documents(&posting_ids).await?;

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let path = out_dir.join(export_file_name(date));
    std::fs::create_dir_all(&out_dir)?;
    std::fs::write(&path, &export.bytes)?;

    info!(path = %path.display(), bytes = export.bytes.len(), "export written");

    println!("Document export");
    println!(
        "- {} documents across {} postings",
        export.documents_found,
        export.postings.len()
    );
    for entry in &export.postings {
        println!("  - {entry}");
    }
    println!("- Written to {}", path.display());

    Ok(())
}
