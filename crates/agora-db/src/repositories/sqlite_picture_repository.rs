//! `SQLite` implementation of the `PictureRepository` trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use agora_core::domain::{NewPicture, Picture};
use agora_core::ports::{PictureRepository, RepositoryError};

use super::row_mappers::{PICTURE_SELECT_COLUMNS, encode_list, row_to_picture, storage_error};

pub struct SqlitePictureRepository {
    pool: SqlitePool,
}

impl SqlitePictureRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PictureRepository for SqlitePictureRepository {
    async fn insert(&self, picture: &NewPicture) -> Result<Picture, RepositoryError> {
        let ident = picture.identification.as_ref();
        let common_names = ident
            .map(|i| encode_list(&i.common_names))
            .transpose()?;

        let result = sqlx::query(
            "INSERT INTO pictures (project_id, user_id, image_base64, latitude, longitude, species, scientific_name, confidence, common_names, is_match, notes, uploaded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(picture.project_id)
        .bind(picture.user_id)
        .bind(&picture.image_base64)
        .bind(picture.location.map(|p| p.latitude))
        .bind(picture.location.map(|p| p.longitude))
        .bind(ident.map(|i| i.species.as_str()))
        .bind(ident.and_then(|i| i.scientific_name.as_deref()))
        .bind(ident.map(|i| i.confidence))
        .bind(common_names)
        .bind(picture.is_match)
        .bind(&picture.notes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        let row = sqlx::query(&format!(
            "SELECT {PICTURE_SELECT_COLUMNS} FROM pictures WHERE id = ?"
        ))
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        row_to_picture(&row)
    }

    async fn list_by_project(&self, project_id: i64) -> Result<Vec<Picture>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PICTURE_SELECT_COLUMNS} FROM pictures WHERE project_id = ? ORDER BY id"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_picture).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{pool, seed_user};
    use agora_core::domain::{GeoPoint, PlantIdentification};

    async fn seed_project(pool: &SqlitePool, owner: i64) -> i64 {
        sqlx::query(
            "INSERT INTO projects (created_by, title, plant_type, action_type, submissions_needed, created_at)
             VALUES (?, 'Survey', 'Oak', 'research', 5, ?)",
        )
        .bind(owner)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    #[tokio::test]
    async fn test_pictures_with_and_without_identification() {
        let pool = pool().await;
        let owner = seed_user(&pool, "owner").await;
        let project_id = seed_project(&pool, owner).await;
        let repo = SqlitePictureRepository::new(pool);

        let identified = repo
            .insert(&NewPicture {
                project_id,
                user_id: owner,
                image_base64: "aGk=".to_string(),
                location: GeoPoint::new(10.0, 20.0),
                identification: Some(PlantIdentification {
                    species: "Quercus robur".to_string(),
                    scientific_name: None,
                    confidence: 0.8,
                    common_names: vec!["Oak".to_string()],
                }),
                is_match: true,
                notes: Some("big one".to_string()),
            })
            .await
            .unwrap();
        assert!(identified.is_match);
        assert_eq!(
            identified.identification.as_ref().map(|i| i.species.as_str()),
            Some("Quercus robur")
        );

        repo.insert(&NewPicture {
            project_id,
            user_id: owner,
            image_base64: "aGk=".to_string(),
            location: None,
            identification: None,
            is_match: false,
            notes: None,
        })
        .await
        .unwrap();

        let pictures = repo.list_by_project(project_id).await.unwrap();
        assert_eq!(pictures.len(), 2);
        assert_eq!(pictures[0].id, identified.id);
        assert!(pictures[1].identification.is_none());
        assert!(pictures[1].location.is_none());
    }
}
