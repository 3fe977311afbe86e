//! Reports handlers

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use super::analyses::find_record;
use super::blocking;
use crate::charts::render_pie;
use crate::report::{compose_report, report_file_name};
use crate::{AppResult, AppState};

/// Generate the PDF report for an analysis
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = find_record(&state, id).await?;

    let images = state.images.clone();
    let (record, pdf) = blocking(move || {
        let source_image = record
            .image_reference
            .as_deref()
            .and_then(|reference| images.load(reference));

        // a missing chart becomes a placeholder in the PDF
        let chart = render_pie(&record.impact).unwrap_or_else(|e| {
            tracing::warn!("Impact chart unavailable for {}: {}", record.id, e);
            Vec::new()
        });

        let pdf = compose_report(&record, source_image.as_deref(), &chart, Utc::now())?;
        Ok((record, pdf))
    })
    .await?;

    let disposition = format!("attachment; filename=\"{}\"", report_file_name(&record));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}
