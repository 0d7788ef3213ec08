use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::{RepositoryError, RepositoryResult};
use crate::domain::Series;

const ENTITY: &str = "series";

const SELECT_SERIES: &str = "SELECT id, title, description, metadescription, is_published, \
     is_completed, created_at, updated_at FROM series";

#[derive(Debug, Clone)]
pub struct SeriesRepository {
    pool: SqlitePool,
}

impl SeriesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every series, newest first
    pub async fn get_all(&self) -> RepositoryResult<Vec<Series>> {
        let series = sqlx::query_as::<_, Series>(&format!("{SELECT_SERIES} ORDER BY id DESC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(series)
    }

    pub async fn find_by_id(&self, id: i64) -> RepositoryResult<Series> {
        sqlx::query_as::<_, Series>(&format!("{SELECT_SERIES} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))
    }

    /// Insert an unsaved series or overwrite a stored one. Ids and timestamps
    /// are written back only once the store accepted the write.
    pub async fn save(&self, series: &mut Series) -> RepositoryResult<()> {
        let now = OffsetDateTime::now_utc();

        match series.id {
            None => {
                let result = sqlx::query(
                    "INSERT INTO series (title, description, metadescription, is_published, \
                     is_completed, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(&series.title)
                .bind(&series.description)
                .bind(&series.metadescription)
                .bind(series.is_published)
                .bind(series.is_completed)
                .bind(now)
                .bind(now)
                .execute(&self.pool)
                .await
                .map_err(|err| RepositoryError::not_saved(ENTITY, err))?;

                series.id = Some(result.last_insert_rowid());
                series.created_at = Some(now);
            }
            Some(id) => {
                let result = sqlx::query(
                    "UPDATE series SET title = ?, description = ?, metadescription = ?, \
                     is_published = ?, is_completed = ?, updated_at = ? WHERE id = ?",
                )
                .bind(&series.title)
                .bind(&series.description)
                .bind(&series.metadescription)
                .bind(series.is_published)
                .bind(series.is_completed)
                .bind(now)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|err| RepositoryError::not_saved(ENTITY, err))?;

                if result.rows_affected() == 0 {
                    return Err(RepositoryError::not_saved(
                        ENTITY,
                        format!("series {id} no longer exists"),
                    ));
                }
            }
        }

        series.updated_at = Some(now);
        tracing::debug!(series_id = ?series.id, "series saved");
        Ok(())
    }

    pub async fn delete(&self, series: &Series) -> RepositoryResult<()> {
        let Some(id) = series.id else {
            return Err(RepositoryError::not_deleted(ENTITY, "series was never saved"));
        };

        let result = sqlx::query("DELETE FROM series WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::not_deleted(ENTITY, err))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_deleted(
                ENTITY,
                format!("series {id} was already removed"),
            ));
        }

        tracing::debug!(series_id = id, "series deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::migrated_pool;

    fn draft(title: &str) -> Series {
        Series::from_title_description_and_meta(title, "descrizione", "meta")
    }

    #[tokio::test]
    async fn save_assigns_id_and_round_trips() {
        let repository = SeriesRepository::new(migrated_pool().await);
        let mut series = draft("Laravel 101");

        repository.save(&mut series).await.unwrap();
        let id = series.id.expect("id assigned on insert");

        let stored = repository.find_by_id(id).await.unwrap();
        assert_eq!(stored.title, "Laravel 101");
        assert!(!stored.is_published);
        assert!(stored.created_at.is_some());
    }

    #[tokio::test]
    async fn update_overwrites_flags() {
        let repository = SeriesRepository::new(migrated_pool().await);
        let mut series = draft("Eloquent");
        repository.save(&mut series).await.unwrap();

        series.is_completed = true;
        repository.save(&mut series).await.unwrap();

        let stored = repository.find_by_id(series.id.unwrap()).await.unwrap();
        assert!(stored.is_completed);
        assert!(!stored.is_published);
    }

    #[tokio::test]
    async fn constraint_violation_is_not_saved() {
        let repository = SeriesRepository::new(migrated_pool().await);
        let mut series = draft("");

        let err = repository.save(&mut series).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotSaved { .. }));
        assert_eq!(series.id, None);
    }

    #[tokio::test]
    async fn deleted_series_is_not_found() {
        let repository = SeriesRepository::new(migrated_pool().await);
        let mut series = draft("Blade");
        repository.save(&mut series).await.unwrap();
        let id = series.id.unwrap();

        repository.delete(&series).await.unwrap();

        let err = repository.find_by_id(id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { entity: "series", .. }));

        let err = repository.delete(&series).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotDeleted { .. }));
    }

    #[tokio::test]
    async fn saving_a_vanished_series_is_not_saved() {
        let repository = SeriesRepository::new(migrated_pool().await);
        let mut series = draft("Artisan");
        repository.save(&mut series).await.unwrap();
        repository.delete(&series).await.unwrap();

        series.is_published = true;
        let err = repository.save(&mut series).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotSaved { .. }));
    }

    #[tokio::test]
    async fn get_all_lists_newest_first() {
        let repository = SeriesRepository::new(migrated_pool().await);
        for title in ["prima", "seconda"] {
            repository.save(&mut draft(title)).await.unwrap();
        }

        let titles: Vec<String> = repository
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|series| series.title)
            .collect();
        assert_eq!(titles, vec!["seconda", "prima"]);
    }
}
