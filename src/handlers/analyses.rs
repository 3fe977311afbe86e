//! Analysis handlers

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::blocking;
use crate::charts::render_pie;
use crate::models::AnalysisRecord;
use crate::store::decode_upload;
use crate::{AppError, AppResult, AppState};

const DEFAULT_MIME: &str = "image/png";

struct Upload {
    bytes: Vec<u8>,
    mime_type: String,
}

async fn read_upload(mut multipart: Multipart) -> AppResult<Upload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let mime_type = field
            .content_type()
            .filter(|m| m.starts_with("image/"))
            .unwrap_or(DEFAULT_MIME)
            .to_string();
        let bytes = field.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(AppError::ValidationError("Uploaded image is empty".to_string()));
        }
        return Ok(Upload { bytes, mime_type });
    }
    Err(AppError::ValidationError("Missing 'image' field".to_string()))
}

/// Upload, classify and record one image
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<AnalysisRecord>)> {
    let Upload { bytes, mime_type } = read_upload(multipart).await?;

    let (bytes, decoded) = blocking(move || {
        let decoded = decode_upload(&bytes)
            .map_err(|e| AppError::ValidationError(format!("Unsupported image: {}", e)))?;
        Ok((bytes, decoded))
    })
    .await?;

    let classification = state.gateway.classify(&bytes, &mime_type).await?;

    let records = state.records.clone();
    let images = state.images.clone();
    let record = blocking(move || {
        let id = Uuid::new_v4();
        let image_reference = match images.save(id, &decoded) {
            Ok(reference) => Some(reference),
            Err(e) => {
                tracing::warn!("Could not keep uploaded image for {}: {}", id, e);
                None
            }
        };

        let record = AnalysisRecord::new(id, Utc::now(), classification, image_reference);
        if let Err(e) = records.append(&record) {
            if let Some(reference) = &record.image_reference {
                images.remove(reference);
            }
            return Err(e.into());
        }
        Ok(record)
    })
    .await?;

    tracing::info!("Analysis {} recorded as {}", record.id, record.category);

    Ok((StatusCode::CREATED, Json(record)))
}

/// Get single analysis
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AnalysisRecord>> {
    Ok(Json(find_record(&state, id).await?))
}

/// Stored upload for an analysis
pub async fn image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = find_record(&state, id).await?;
    let images = state.images.clone();
    let bytes = blocking(move || {
        record
            .image_reference
            .as_deref()
            .and_then(|reference| images.load(reference))
            .ok_or_else(|| AppError::NotFound("Image not available".to_string()))
    })
    .await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

/// Impact pie chart for an analysis
pub async fn chart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = find_record(&state, id).await?;
    let png = blocking(move || Ok(render_pie(&record.impact)?)).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

pub(crate) async fn find_record(state: &AppState, id: Uuid) -> AppResult<AnalysisRecord> {
    let records = state.records.clone();
    blocking(move || {
        records
            .find(id)?
            .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))
    })
    .await
}
