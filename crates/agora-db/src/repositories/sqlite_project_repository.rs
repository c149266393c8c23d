//! `SQLite` implementation of the `ProjectRepository` trait.
//!
//! Contributors live in `project_contributors` and are attached to each
//! project after the row is read.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use agora_core::domain::{
    CollectionLocation, NewCollectionLocation, NewProject, NewProjectMessage, Project,
    ProjectMessage, ProjectStatus, ProjectUpdate,
};
use agora_core::ports::{ProjectRepository, RepositoryError};

use super::row_mappers::{
    PROJECT_SELECT_COLUMNS, col, row_to_location, row_to_message, row_to_project, storage_error,
};

pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn contributors_of(&self, project_id: i64) -> Result<Vec<i64>, RepositoryError> {
        sqlx::query_scalar(
            "SELECT user_id FROM project_contributors WHERE project_id = ? ORDER BY rowid",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn all_contributors(&self) -> Result<HashMap<i64, Vec<i64>>, RepositoryError> {
        let rows = sqlx::query("SELECT project_id, user_id FROM project_contributors ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        let mut by_project: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in &rows {
            by_project
                .entry(col(row, "project_id")?)
                .or_default()
                .push(col(row, "user_id")?);
        }
        Ok(by_project)
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn insert(&self, project: &NewProject) -> Result<Project, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO projects (created_by, title, description, plant_type, action_type, data_needed, purpose, location_name, latitude, longitude, submissions_needed, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(project.created_by)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.plant_type)
        .bind(project.action_type.as_str())
        .bind(&project.data_needed)
        .bind(&project.purpose)
        .bind(&project.location_name)
        .bind(project.location.map(|p| p.latitude))
        .bind(project.location.map(|p| p.longitude))
        .bind(project.submissions_needed)
        .bind(ProjectStatus::Active.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Project, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_SELECT_COLUMNS} FROM projects WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("project id={id}")))?;

        let mut project = row_to_project(&row)?;
        project.contributors = self.contributors_of(id).await?;
        Ok(project)
    }

    async fn list(&self, status: Option<ProjectStatus>) -> Result<Vec<Project>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_SELECT_COLUMNS} FROM projects
             WHERE ?1 IS NULL OR status = ?1
             ORDER BY id DESC"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut contributors = self.all_contributors().await?;
        rows.iter()
            .map(|row| {
                let mut project = row_to_project(row)?;
                project.contributors = contributors.remove(&project.id).unwrap_or_default();
                Ok(project)
            })
            .collect()
    }

    async fn update(&self, id: i64, update: &ProjectUpdate) -> Result<Project, RepositoryError> {
        let result = sqlx::query(
            "UPDATE projects SET
                title = COALESCE(?, title),
                description = COALESCE(?, description),
                plant_type = COALESCE(?, plant_type),
                data_needed = COALESCE(?, data_needed),
                purpose = COALESCE(?, purpose),
                location_name = COALESCE(?, location_name)
             WHERE id = ?",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.plant_type)
        .bind(&update.data_needed)
        .bind(&update.purpose)
        .bind(&update.location_name)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("project id={id}")));
        }
        self.get_by_id(id).await
    }

    async fn add_contributor(
        &self,
        project_id: i64,
        user_id: i64,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO project_contributors (project_id, user_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn record_match(&self, project_id: i64) -> Result<Project, RepositoryError> {
        let result = sqlx::query(
            "UPDATE projects SET
                submissions_completed = submissions_completed + 1,
                status = CASE WHEN submissions_completed + 1 >= submissions_needed
                              THEN 'completed' ELSE status END
             WHERE id = ?",
        )
        .bind(project_id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("project id={project_id}")));
        }
        self.get_by_id(project_id).await
    }

    async fn add_location(
        &self,
        location: &NewCollectionLocation,
    ) -> Result<CollectionLocation, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO collection_locations (project_id, name, latitude, longitude, description, added_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(location.project_id)
        .bind(&location.name)
        .bind(location.point.latitude)
        .bind(location.point.longitude)
        .bind(&location.description)
        .bind(location.added_by)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        let row = sqlx::query(
            "SELECT id, project_id, name, latitude, longitude, description, added_by, created_at
             FROM collection_locations WHERE id = ?",
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        row_to_location(&row)
    }

    async fn list_locations(
        &self,
        project_id: i64,
    ) -> Result<Vec<CollectionLocation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, project_id, name, latitude, longitude, description, added_by, created_at
             FROM collection_locations WHERE project_id = ? ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_location).collect()
    }

    async fn add_message(
        &self,
        message: &NewProjectMessage,
    ) -> Result<ProjectMessage, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO project_messages (project_id, user_id, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(message.project_id)
        .bind(message.user_id)
        .bind(&message.content)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        let row = sqlx::query(
            "SELECT id, project_id, user_id, content, created_at FROM project_messages WHERE id = ?",
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        row_to_message(&row)
    }

    async fn list_messages(&self, project_id: i64) -> Result<Vec<ProjectMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, project_id, user_id, content, created_at
             FROM project_messages WHERE project_id = ? ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{pool, seed_user};
    use agora_core::domain::{ActionType, GeoPoint};

    fn new_project(created_by: i64, needed: i64) -> NewProject {
        NewProject {
            created_by,
            title: "Knotweed survey".to_string(),
            description: Some("Map the river banks".to_string()),
            plant_type: "Japanese knotweed".to_string(),
            action_type: ActionType::Removal,
            data_needed: Some("Photos".to_string()),
            purpose: None,
            location_name: Some("Riverside".to_string()),
            location: GeoPoint::new(51.5, -0.12),
            submissions_needed: needed,
        }
    }

    #[tokio::test]
    async fn test_insert_update_and_list() {
        let pool = pool().await;
        let owner = seed_user(&pool, "owner").await;
        let repo = SqliteProjectRepository::new(pool);

        let first = repo.insert(&new_project(owner, 3)).await.unwrap();
        let second = repo.insert(&new_project(owner, 3)).await.unwrap();
        assert_eq!(first.status, ProjectStatus::Active);
        assert_eq!(first.location, GeoPoint::new(51.5, -0.12));
        assert!(first.contributors.is_empty());

        let updated = repo
            .update(
                first.id,
                &ProjectUpdate {
                    title: Some("Knotweed census".to_string()),
                    ..ProjectUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Knotweed census");
        assert_eq!(updated.plant_type, "Japanese knotweed");

        let ids: Vec<_> = repo.list(None).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(repo.list(Some(ProjectStatus::Completed)).await.unwrap().is_empty());

        assert!(matches!(
            repo.update(999, &ProjectUpdate::default()).await.unwrap_err(),
            RepositoryError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_contributors_are_unique() {
        let pool = pool().await;
        let owner = seed_user(&pool, "owner").await;
        let helper = seed_user(&pool, "helper").await;
        let repo = SqliteProjectRepository::new(pool);
        let project = repo.insert(&new_project(owner, 3)).await.unwrap();

        assert!(repo.add_contributor(project.id, helper).await.unwrap());
        assert!(!repo.add_contributor(project.id, helper).await.unwrap());

        let stored = repo.get_by_id(project.id).await.unwrap();
        assert_eq!(stored.contributors, vec![helper]);
        let listed = repo.list(None).await.unwrap();
        assert_eq!(listed[0].contributors, vec![helper]);
    }

    #[tokio::test]
    async fn test_record_match_completes_at_target() {
        let pool = pool().await;
        let owner = seed_user(&pool, "owner").await;
        let repo = SqliteProjectRepository::new(pool);
        let project = repo.insert(&new_project(owner, 2)).await.unwrap();

        let once = repo.record_match(project.id).await.unwrap();
        assert_eq!(once.submissions_completed, 1);
        assert_eq!(once.status, ProjectStatus::Active);

        let twice = repo.record_match(project.id).await.unwrap();
        assert_eq!(twice.submissions_completed, 2);
        assert_eq!(twice.status, ProjectStatus::Completed);
    }

    #[tokio::test]
    async fn test_locations_and_messages_in_order() {
        let pool = pool().await;
        let owner = seed_user(&pool, "owner").await;
        let repo = SqliteProjectRepository::new(pool);
        let project = repo.insert(&new_project(owner, 2)).await.unwrap();

        for name in ["North bank", "South bank"] {
            repo.add_location(&NewCollectionLocation {
                project_id: project.id,
                name: name.to_string(),
                point: GeoPoint::new(51.0, 0.0).unwrap(),
                description: None,
                added_by: owner,
            })
            .await
            .unwrap();
        }
        let names: Vec<_> = repo
            .list_locations(project.id)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["North bank", "South bank"]);

        for content in ["first", "second"] {
            repo.add_message(&NewProjectMessage {
                project_id: project.id,
                user_id: owner,
                content: content.to_string(),
            })
            .await
            .unwrap();
        }
        let messages = repo.list_messages(project.id).await.unwrap();
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");
    }
}
