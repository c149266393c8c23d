//! Dataset handlers - project summaries, CSV downloads and visualizations.
//!
//! Downloads are served as `text/csv` attachments named after the export.

use agora_core::services::{CsvExport, DatasetDescriptor, ProjectData, Visualization};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::auth::AuthUser;
use crate::dto::VisualizationQuery;
use crate::error::HttpError;
use crate::state::AppState;

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn csv_attachment(export: CsvExport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.content,
    )
        .into_response()
}

/// Progress and dataset counts. Creator or contributors.
pub async fn project_data(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ProjectData>, HttpError> {
    Ok(Json(state.core.datasets().project_data(&auth.user, id).await?))
}

/// Dataset descriptors with field lists. Creator only.
pub async fn project_datasets(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<DatasetDescriptor>>, HttpError> {
    Ok(Json(state.core.datasets().datasets(&auth.user, id).await?))
}

pub async fn download_data(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, HttpError> {
    let export = state.core.datasets().download_data(&auth.user, id).await?;
    Ok(csv_attachment(export))
}

pub async fn download_dataset(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, dataset_id)): Path<(i64, String)>,
) -> Result<Response, HttpError> {
    let export = state
        .core
        .datasets()
        .download_dataset(&auth.user, id, &dataset_id)
        .await?;
    Ok(csv_attachment(export))
}

pub async fn download_all_data(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, HttpError> {
    let export = state
        .core
        .datasets()
        .download_all_data(&auth.user, id)
        .await?;
    Ok(csv_attachment(export))
}

/// `?type=map|time_series|confidence`, `map` by default.
pub async fn visualization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<VisualizationQuery>,
) -> Result<Json<Visualization>, HttpError> {
    let data = state
        .core
        .datasets()
        .visualization(&auth.user, id, query.kind())
        .await?;
    Ok(Json(data))
}
