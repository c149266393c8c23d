//! Project service - collection projects, membership, uploads and discovery.

use std::sync::Arc;

use serde::Serialize;

use super::identification::identify_or_unknown;
use crate::domain::{
    ActionType, CollectionLocation, GeoPoint, NewCollectionLocation, NewPicture, NewProject,
    NewProjectMessage, Picture, Project, ProjectMessage, ProjectStatus, ProjectUpdate, User,
    haversine_km,
};
use crate::ports::{CoreError, PictureRepository, PlantIdentifierPort, ProjectRepository};
use crate::utils::validation::{
    decode_image, optional_point, optional_text, require_point, require_text,
};

pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_NEARBY_LIMIT: usize = 20;

pub(crate) const PROJECT_NOT_FOUND: &str = "Project not found!";
pub(crate) const NOT_A_MEMBER: &str = "Unauthorized!";

#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: String,
    pub description: Option<String>,
    pub plant_type: String,
    pub action_type: ActionType,
    pub data_needed: Option<String>,
    pub purpose: Option<String>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub submissions_needed: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyProject {
    #[serde(flatten)]
    pub project: Project,
    pub distance_km: f64,
}

#[derive(Debug, Clone)]
pub struct UploadPicture {
    pub project_id: i64,
    pub image_base64: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PictureUpload {
    pub picture: Picture,
    pub project: Project,
}

#[derive(Debug, Clone)]
pub struct AddLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
}

pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    pictures: Arc<dyn PictureRepository>,
    identifier: Arc<dyn PlantIdentifierPort>,
}

impl ProjectService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        pictures: Arc<dyn PictureRepository>,
        identifier: Arc<dyn PlantIdentifierPort>,
    ) -> Self {
        Self {
            projects,
            pictures,
            identifier,
        }
    }

    pub async fn create(&self, creator: &User, input: CreateProject) -> Result<Project, CoreError> {
        let title = require_text("title", &input.title)?;
        let plant_type = require_text("plant_type", &input.plant_type)?;
        if input.submissions_needed < 1 {
            return Err(CoreError::Validation(
                "submissions_needed must be at least 1".to_string(),
            ));
        }
        let location = optional_point(input.latitude, input.longitude)?;

        let project = self
            .projects
            .insert(&NewProject {
                created_by: creator.id,
                title,
                description: optional_text(input.description),
                plant_type,
                action_type: input.action_type,
                data_needed: optional_text(input.data_needed),
                purpose: optional_text(input.purpose),
                location_name: optional_text(input.location_name),
                location,
                submissions_needed: input.submissions_needed,
            })
            .await?;

        tracing::info!(project_id = project.id, user_id = creator.id, "Created project");
        Ok(project)
    }

    pub async fn list(&self, status: Option<ProjectStatus>) -> Result<Vec<Project>, CoreError> {
        self.projects.list(status).await.map_err(CoreError::from)
    }

    pub async fn get(&self, project_id: i64) -> Result<Project, CoreError> {
        self.projects
            .get_by_id(project_id)
            .await
            .map_err(CoreError::not_found_as(PROJECT_NOT_FOUND))
    }

    /// Partially update a project. Creator only.
    pub async fn update(
        &self,
        user: &User,
        project_id: i64,
        update: ProjectUpdate,
    ) -> Result<Project, CoreError> {
        let project = self.get(project_id).await?;
        if project.created_by != user.id {
            return Err(CoreError::Forbidden(NOT_A_MEMBER.to_string()));
        }

        let update = ProjectUpdate {
            title: update.title.map(|t| require_text("title", &t)).transpose()?,
            plant_type: update
                .plant_type
                .map(|t| require_text("plant_type", &t))
                .transpose()?,
            ..update
        };
        if update.is_empty() {
            return Ok(project);
        }

        self.projects
            .update(project_id, &update)
            .await
            .map_err(CoreError::from)
    }

    /// Join as a contributor. Joining twice, or joining your own project, is a no-op.
    pub async fn join(&self, user: &User, project_id: i64) -> Result<Project, CoreError> {
        let project = self.get(project_id).await?;
        if project.is_member(user.id) {
            return Ok(project);
        }
        self.projects.add_contributor(project_id, user.id).await?;
        tracing::debug!(project_id, user_id = user.id, "User joined project");
        self.get(project_id).await
    }

    /// Active projects within a radius, closest first.
    pub async fn nearby(&self, query: NearbyQuery) -> Result<Vec<NearbyProject>, CoreError> {
        let origin = require_point(query.latitude, query.longitude)?;
        let radius_km = query.radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(CoreError::Validation(
                "radius_km must be a positive number".to_string(),
            ));
        }

        let active = self.projects.list(Some(ProjectStatus::Active)).await?;
        Ok(nearest(
            active,
            origin,
            radius_km,
            query.limit.unwrap_or(DEFAULT_NEARBY_LIMIT),
        ))
    }

    /// Upload a photo to a project. Creator or contributors only.
    pub async fn upload_picture(
        &self,
        user: &User,
        input: UploadPicture,
    ) -> Result<PictureUpload, CoreError> {
        let project = self.member_project(user, input.project_id).await?;
        let image = decode_image(&input.image_base64)?;
        let location = optional_point(input.latitude, input.longitude)?;

        let identification = identify_or_unknown(self.identifier.as_ref(), &image.bytes).await;
        let is_match = identification.matches(&project.plant_type);

        let picture = self
            .pictures
            .insert(&NewPicture {
                project_id: project.id,
                user_id: user.id,
                image_base64: image.base64,
                location,
                identification: Some(identification),
                is_match,
                notes: optional_text(input.notes),
            })
            .await?;

        let project = if is_match {
            let updated = self.projects.record_match(project.id).await?;
            if updated.status == ProjectStatus::Completed && project.status != updated.status {
                tracing::info!(project_id = project.id, "Project reached its target");
            }
            updated
        } else {
            project
        };

        tracing::info!(
            project_id = project.id,
            picture_id = picture.id,
            user_id = user.id,
            is_match,
            "Uploaded picture"
        );
        Ok(PictureUpload { picture, project })
    }

    pub async fn add_location(
        &self,
        user: &User,
        project_id: i64,
        input: AddLocation,
    ) -> Result<CollectionLocation, CoreError> {
        self.member_project(user, project_id).await?;
        let name = require_text("name", &input.name)?;
        let point = require_point(input.latitude, input.longitude)?;

        self.projects
            .add_location(&NewCollectionLocation {
                project_id,
                name,
                point,
                description: optional_text(input.description),
                added_by: user.id,
            })
            .await
            .map_err(CoreError::from)
    }

    pub async fn list_locations(
        &self,
        user: &User,
        project_id: i64,
    ) -> Result<Vec<CollectionLocation>, CoreError> {
        self.member_project(user, project_id).await?;
        self.projects
            .list_locations(project_id)
            .await
            .map_err(CoreError::from)
    }

    pub async fn post_message(
        &self,
        user: &User,
        project_id: i64,
        content: &str,
    ) -> Result<ProjectMessage, CoreError> {
        self.member_project(user, project_id).await?;
        let content = require_text("content", content)?;
        self.projects
            .add_message(&NewProjectMessage {
                project_id,
                user_id: user.id,
                content,
            })
            .await
            .map_err(CoreError::from)
    }

    pub async fn list_messages(
        &self,
        user: &User,
        project_id: i64,
    ) -> Result<Vec<ProjectMessage>, CoreError> {
        self.member_project(user, project_id).await?;
        self.projects
            .list_messages(project_id)
            .await
            .map_err(CoreError::from)
    }

    async fn member_project(&self, user: &User, project_id: i64) -> Result<Project, CoreError> {
        let project = self.get(project_id).await?;
        if !project.is_member(user.id) {
            tracing::warn!(project_id, user_id = user.id, "Rejected non-member");
            return Err(CoreError::Forbidden(NOT_A_MEMBER.to_string()));
        }
        Ok(project)
    }
}

/// Keep projects with a location within `radius_km` of `origin`, closest first.
///
/// Ties on distance are broken by id. At most `limit` projects are returned.
pub fn nearest(
    projects: Vec<Project>,
    origin: GeoPoint,
    radius_km: f64,
    limit: usize,
) -> Vec<NearbyProject> {
    let mut within: Vec<NearbyProject> = projects
        .into_iter()
        .filter_map(|project| {
            let distance_km = haversine_km(origin, project.location?);
            (distance_km <= radius_km).then_some(NearbyProject {
                project,
                distance_km,
            })
        })
        .collect();

    within.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then(a.project.id.cmp(&b.project.id))
    });
    within.truncate(limit);
    within
}
