//! Project handlers - CRUD, discovery, membership, pictures, locations and messages.

use agora_core::services::{CreateProject, NearbyProject};
use agora_core::{CollectionLocation, Project, ProjectMessage};
use axum::Json;
use axum::extract::{Path, Query, State};

use crate::auth::AuthUser;
use crate::dto::{
    AddLocationRequest, CreateProjectRequest, ListProjectsQuery, NearbyParams, PostMessageRequest,
    UpdateProjectRequest, UploadPictureRequest, UploadPictureResponse,
};
use crate::error::HttpError;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<Project>, HttpError> {
    let input = CreateProject::try_from(req)?;
    Ok(Json(state.core.projects().create(&auth.user, input).await?))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<Vec<Project>>, HttpError> {
    let status = query.status()?;
    Ok(Json(state.core.projects().list(status).await?))
}

/// Active projects within a radius, nearest first.
pub async fn nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<NearbyProject>>, HttpError> {
    Ok(Json(state.core.projects().nearby(params.into()).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Project>, HttpError> {
    Ok(Json(state.core.projects().get(id).await?))
}

/// Partial update. Creator only.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, HttpError> {
    let project = state
        .core
        .projects()
        .update(&auth.user, req.project_id, req.updates)
        .await?;
    Ok(Json(project))
}

pub async fn join(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Project>, HttpError> {
    Ok(Json(state.core.projects().join(&auth.user, id).await?))
}

pub async fn upload_picture(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UploadPictureRequest>,
) -> Result<Json<UploadPictureResponse>, HttpError> {
    let upload = state
        .core
        .projects()
        .upload_picture(&auth.user, req.into())
        .await?;
    Ok(Json(upload.into()))
}

pub async fn add_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<AddLocationRequest>,
) -> Result<Json<CollectionLocation>, HttpError> {
    let location = state
        .core
        .projects()
        .add_location(&auth.user, id, req.into())
        .await?;
    Ok(Json(location))
}

pub async fn list_locations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CollectionLocation>>, HttpError> {
    Ok(Json(
        state.core.projects().list_locations(&auth.user, id).await?,
    ))
}

pub async fn post_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<PostMessageRequest>,
) -> Result<Json<ProjectMessage>, HttpError> {
    let message = state
        .core
        .projects()
        .post_message(&auth.user, id, &req.content)
        .await?;
    Ok(Json(message))
}

pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ProjectMessage>>, HttpError> {
    Ok(Json(
        state.core.projects().list_messages(&auth.user, id).await?,
    ))
}
