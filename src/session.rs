use crate::aggregate::aggregate;
use crate::errors::PipelineError;
use crate::ingest::{check_file_type, parse_records};
use crate::models::AggregationResult;
use crate::normalize::normalize;
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSession {
    pub file_name: String,
    pub uploaded_at: String,
    pub record_count: usize,
    pub entry_count: usize,
    pub dropped_rows: usize,
    pub views: AggregationResult,
}

pub fn run_pipeline(
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<DashboardSession, PipelineError> {
    run_pipeline_at(Local::now(), file_name, content_type, bytes)
}

pub fn run_pipeline_at(
    now: DateTime<Local>,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<DashboardSession, PipelineError> {
    check_file_type(file_name, content_type)?;
    let records = parse_records(bytes)?;
    let normalized = normalize(&records);
    if normalized.dropped > 0 {
        debug!(
            file = file_name,
            dropped = normalized.dropped,
            "skipped incomplete rows"
        );
    }

    Ok(DashboardSession {
        file_name: file_name.to_string(),
        uploaded_at: now.to_rfc3339(),
        record_count: records.len(),
        entry_count: normalized.entries.len(),
        dropped_rows: normalized.dropped,
        views: aggregate(&normalized.entries),
    })
}
