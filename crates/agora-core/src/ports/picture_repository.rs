//! Picture repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{NewPicture, Picture};

#[async_trait]
pub trait PictureRepository: Send + Sync {
    async fn insert(&self, picture: &NewPicture) -> Result<Picture, RepositoryError>;

    /// Pictures of a project ordered by upload time, oldest first.
    async fn list_by_project(&self, project_id: i64) -> Result<Vec<Picture>, RepositoryError>;
}
