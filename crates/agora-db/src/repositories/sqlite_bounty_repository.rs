//! `SQLite` implementation of the `BountyRepository` trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use agora_core::domain::{Bounty, BountyFilter, BountyStatus, NewBounty};
use agora_core::ports::{BountyRepository, RepositoryError};

use super::row_mappers::{BOUNTY_SELECT_COLUMNS, row_to_bounty, storage_error};

pub struct SqliteBountyRepository {
    pool: SqlitePool,
}

impl SqliteBountyRepository {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BountyRepository for SqliteBountyRepository {
    async fn insert(&self, bounty: &NewBounty) -> Result<Bounty, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO bounties (creator_id, title, description, plant_species, reward_cents, num_submissions_needed, additional_notes, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(bounty.creator_id)
        .bind(&bounty.title)
        .bind(&bounty.description)
        .bind(&bounty.plant_species)
        .bind(bounty.reward_cents)
        .bind(bounty.num_submissions_needed)
        .bind(&bounty.additional_notes)
        .bind(BountyStatus::Open.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Bounty, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {BOUNTY_SELECT_COLUMNS} FROM bounties WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| RepositoryError::NotFound(format!("bounty id={id}")))?;

        row_to_bounty(&row)
    }

    async fn search(&self, filter: &BountyFilter) -> Result<Vec<Bounty>, RepositoryError> {
        let species = filter
            .plant_species
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let rows = sqlx::query(&format!(
            "SELECT {BOUNTY_SELECT_COLUMNS} FROM bounties
             WHERE status = 'open'
               AND (?1 IS NULL OR instr(lower(plant_species), ?1) > 0)
               AND (?2 IS NULL OR reward_cents >= ?2)
             ORDER BY id DESC"
        ))
        .bind(species)
        .bind(filter.min_reward_cents)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_bounty).collect()
    }

    async fn list_by_creator(&self, creator_id: i64) -> Result<Vec<Bounty>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {BOUNTY_SELECT_COLUMNS} FROM bounties WHERE creator_id = ?
             ORDER BY id DESC"
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_bounty).collect()
    }

    async fn increment_submissions(&self, id: i64) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE bounties SET current_submissions = current_submissions + 1 WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("bounty id={id}")));
        }
        Ok(())
    }

    async fn set_status(&self, id: i64, status: BountyStatus) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE bounties SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("bounty id={id}")));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        sqlx::query("DELETE FROM submissions")
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        let result = sqlx::query("DELETE FROM bounties")
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        tracing::info!(removed = result.rows_affected(), "Deleted all bounties");
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{pool, seed_user};

    fn new_bounty(creator_id: i64, species: &str, reward_cents: i64) -> NewBounty {
        NewBounty {
            creator_id,
            title: format!("Find {species}"),
            description: None,
            plant_species: species.to_string(),
            reward_cents,
            num_submissions_needed: 2,
            additional_notes: Some("north slope".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_starts_open_with_no_submissions() {
        let pool = pool().await;
        let creator = seed_user(&pool, "ada").await;
        let repo = SqliteBountyRepository::new(pool);

        let bounty = repo
            .insert(&new_bounty(creator, "Quercus robur", 1_250))
            .await
            .unwrap();
        assert_eq!(bounty.status, BountyStatus::Open);
        assert_eq!(bounty.current_submissions, 0);
        assert_eq!(bounty.reward_cents, 1_250);

        repo.increment_submissions(bounty.id).await.unwrap();
        assert_eq!(repo.get_by_id(bounty.id).await.unwrap().current_submissions, 1);
    }

    #[tokio::test]
    async fn test_search_filters_open_species_and_reward() {
        let pool = pool().await;
        let creator = seed_user(&pool, "ada").await;
        let repo = SqliteBountyRepository::new(pool);

        let oak = repo
            .insert(&new_bounty(creator, "Quercus robur", 500))
            .await
            .unwrap();
        let rich_oak = repo
            .insert(&new_bounty(creator, "Red Quercus", 5_000))
            .await
            .unwrap();
        let fern = repo
            .insert(&new_bounty(creator, "Bracken fern", 5_000))
            .await
            .unwrap();
        repo.set_status(fern.id, BountyStatus::Completed)
            .await
            .unwrap();

        let all = repo.search(&BountyFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![rich_oak.id, oak.id]);

        let quercus = repo
            .search(&BountyFilter {
                plant_species: Some("QUERCUS".to_string()),
                min_reward_cents: Some(1_000),
            })
            .await
            .unwrap();
        assert_eq!(quercus.len(), 1);
        assert_eq!(quercus[0].id, rich_oak.id);
    }

    #[tokio::test]
    async fn test_delete_all_removes_submissions() {
        let pool = pool().await;
        let creator = seed_user(&pool, "ada").await;
        let repo = SqliteBountyRepository::new(pool.clone());
        let bounty = repo
            .insert(&new_bounty(creator, "Quercus", 100))
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO submissions (bounty_id, user_id, image_base64, submission_type, species, submitted_at)
             VALUES (?, ?, 'aGk=', 'research', 'unknown', ?)",
        )
        .bind(bounty.id)
        .bind(creator)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 1);
        let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(left, 0);
        assert!(matches!(
            repo.get_by_id(bounty.id).await.unwrap_err(),
            RepositoryError::NotFound(_)
        ));
    }
}
