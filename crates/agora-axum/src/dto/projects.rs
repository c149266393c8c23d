//! Project DTOs.

use agora_core::domain::ActionType;
use agora_core::services::{AddLocation, CreateProject, NearbyQuery, PictureUpload, UploadPicture};
use agora_core::{Picture, Project, ProjectStatus, ProjectUpdate};
use serde::{Deserialize, Serialize};

use super::{SUCCESS, loose_id, parse_or_default};
use crate::error::HttpError;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub plant_type: String,
    pub action_type: Option<String>,
    pub data_needed: Option<String>,
    pub purpose: Option<String>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub submissions_needed: i64,
}

impl TryFrom<CreateProjectRequest> for CreateProject {
    type Error = HttpError;

    fn try_from(req: CreateProjectRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            action_type: parse_or_default(
                "action_type",
                req.action_type.as_deref(),
                ActionType::parse,
            )?,
            title: req.title,
            description: req.description,
            plant_type: req.plant_type,
            data_needed: req.data_needed,
            purpose: req.purpose,
            location_name: req.location_name,
            latitude: req.latitude,
            longitude: req.longitude,
            submissions_needed: req.submissions_needed,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProjectsQuery {
    pub status: Option<String>,
}

impl ListProjectsQuery {
    pub fn status(&self) -> Result<Option<ProjectStatus>, HttpError> {
        match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => ProjectStatus::parse(raw)
                .map(Some)
                .ok_or_else(|| HttpError::BadRequest(format!("invalid status: {raw}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

impl From<NearbyParams> for NearbyQuery {
    fn from(params: NearbyParams) -> Self {
        Self {
            latitude: params.latitude,
            longitude: params.longitude,
            radius_km: params.radius_km,
            limit: params.limit,
        }
    }
}

/// Partial update. The frontend sends `projectId` and the whole edited
/// project under `updates`; unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(alias = "projectId", deserialize_with = "loose_id")]
    pub project_id: i64,
    #[serde(default)]
    pub updates: ProjectUpdate,
}

#[derive(Debug, Deserialize)]
pub struct UploadPictureRequest {
    #[serde(alias = "projectId", deserialize_with = "loose_id")]
    pub project_id: i64,
    #[serde(default)]
    pub image_base64: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

impl From<UploadPictureRequest> for UploadPicture {
    fn from(req: UploadPictureRequest) -> Self {
        Self {
            project_id: req.project_id,
            image_base64: req.image_base64,
            latitude: req.latitude,
            longitude: req.longitude,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadPictureResponse {
    pub message: &'static str,
    pub picture: Picture,
    pub project: Project,
}

impl From<PictureUpload> for UploadPictureResponse {
    fn from(upload: PictureUpload) -> Self {
        Self {
            message: SUCCESS,
            picture: upload.picture,
            project: upload.project,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddLocationRequest {
    #[serde(default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
}

impl From<AddLocationRequest> for AddLocation {
    fn from(req: AddLocationRequest) -> Self {
        Self {
            name: req.name,
            latitude: req.latitude,
            longitude: req.longitude,
            description: req.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VisualizationQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl VisualizationQuery {
    /// Requested visualization, `map` when absent.
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("map")
    }
}
