//! Project repository trait definition.
//!
//! Covers projects, their contributors, collection locations and the
//! project message board.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{
    CollectionLocation, NewCollectionLocation, NewProject, NewProjectMessage, Project,
    ProjectMessage, ProjectStatus, ProjectUpdate,
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert(&self, project: &NewProject) -> Result<Project, RepositoryError>;

    /// Returns `Err(RepositoryError::NotFound)` if the project doesn't exist.
    async fn get_by_id(&self, id: i64) -> Result<Project, RepositoryError>;

    /// Projects, newest first, optionally filtered by status.
    async fn list(&self, status: Option<ProjectStatus>) -> Result<Vec<Project>, RepositoryError>;

    /// Apply the set fields of `update` and return the stored project.
    async fn update(&self, id: i64, update: &ProjectUpdate) -> Result<Project, RepositoryError>;

    /// Add a contributor. Returns `false` if they were already one.
    async fn add_contributor(&self, project_id: i64, user_id: i64)
    -> Result<bool, RepositoryError>;

    /// Count one matching picture, completing the project when the target is reached.
    async fn record_match(&self, project_id: i64) -> Result<Project, RepositoryError>;

    async fn add_location(
        &self,
        location: &NewCollectionLocation,
    ) -> Result<CollectionLocation, RepositoryError>;

    /// Locations in the order they were added.
    async fn list_locations(
        &self,
        project_id: i64,
    ) -> Result<Vec<CollectionLocation>, RepositoryError>;

    async fn add_message(
        &self,
        message: &NewProjectMessage,
    ) -> Result<ProjectMessage, RepositoryError>;

    /// Messages oldest first.
    async fn list_messages(&self, project_id: i64) -> Result<Vec<ProjectMessage>, RepositoryError>;
}
