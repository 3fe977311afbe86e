//! Dashboard handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::charts::render_bar;
use crate::dashboard::{summarize, DashboardSummary};
use crate::models::WasteCategory;
use crate::report::tip_of_the_day;
use super::blocking;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize, Default)]
pub struct DashboardFilter {
    pub category: Option<String>,
}

impl DashboardFilter {
    fn category(&self) -> AppResult<Option<WasteCategory>> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(label) => label.parse().map(Some).map_err(AppError::ValidationError),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TipResponse {
    pub date: NaiveDate,
    pub tip: &'static str,
}

/// Summary of stored analyses, newest first
pub async fn summary(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> AppResult<Json<DashboardSummary>> {
    let category = filter.category()?;
    let records = state.records.clone();
    let summary = blocking(move || {
        let mut summary = summarize(&records.load()?, category);
        summary.records.reverse();
        Ok(summary)
    })
    .await?;
    Ok(Json(summary))
}

/// "Analyses by Category" bar chart
pub async fn chart(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> AppResult<impl IntoResponse> {
    let category = filter.category()?;
    let records = state.records.clone();
    let png = blocking(move || {
        let summary = summarize(&records.load()?, category);
        Ok(render_bar(&summary.category_counts)?)
    })
    .await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// Eco tip for today
pub async fn tip() -> Json<TipResponse> {
    let date = Utc::now().date_naive();
    Json(TipResponse {
        date,
        tip: tip_of_the_day(date),
    })
}
