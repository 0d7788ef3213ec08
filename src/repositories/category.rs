use sqlx::SqlitePool;

use super::{RepositoryError, RepositoryResult};
use crate::domain::Category;

const ENTITY: &str = "category";

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn save(&self, category: &mut Category) -> RepositoryResult<()> {
        match category.id {
            None => {
                let result = sqlx::query("INSERT INTO categories (name, slug) VALUES (?, ?)")
                    .bind(&category.name)
                    .bind(&category.slug)
                    .execute(&self.pool)
                    .await
                    .map_err(|err| RepositoryError::not_saved(ENTITY, err))?;
                category.id = Some(result.last_insert_rowid());
            }
            Some(id) => {
                let result = sqlx::query("UPDATE categories SET name = ?, slug = ? WHERE id = ?")
                    .bind(&category.name)
                    .bind(&category.slug)
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(|err| RepositoryError::not_saved(ENTITY, err))?;
                if result.rows_affected() == 0 {
                    return Err(RepositoryError::not_saved(
                        ENTITY,
                        format!("category {id} no longer exists"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// First category (lowest id) carrying `slug`
    pub async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug FROM categories WHERE slug = ? ORDER BY id LIMIT 1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn get_all(&self) -> RepositoryResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    pub async fn delete(&self, category: &Category) -> RepositoryResult<()> {
        let Some(id) = category.id else {
            return Err(RepositoryError::not_deleted(ENTITY, "category was never saved"));
        };

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::not_deleted(ENTITY, err))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_deleted(
                ENTITY,
                format!("category {id} was already removed"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::migrated_pool;

    #[tokio::test]
    async fn find_by_slug_matches_exactly() {
        let repository = CategoryRepository::new(migrated_pool().await);
        let mut news = Category::new("Notizie", "news");
        repository.save(&mut news).await.unwrap();

        let found = repository.find_by_slug("news").await.unwrap();
        assert_eq!(found, Some(news));

        assert_eq!(repository.find_by_slug("tutorials").await.unwrap(), None);
        assert_eq!(repository.find_by_slug("News").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_slug_is_not_saved() {
        let repository = CategoryRepository::new(migrated_pool().await);
        repository
            .save(&mut Category::new("Notizie", "news"))
            .await
            .unwrap();

        let err = repository
            .save(&mut Category::new("Novità", "news"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotSaved { .. }));
    }

    #[tokio::test]
    async fn delete_removes_and_get_all_lists_remaining() {
        let repository = CategoryRepository::new(migrated_pool().await);
        let mut news = Category::new("Notizie", "news");
        let mut guides = Category::new("Guide", "guides");
        repository.save(&mut news).await.unwrap();
        repository.save(&mut guides).await.unwrap();

        repository.delete(&news).await.unwrap();

        let all = repository.get_all().await.unwrap();
        assert_eq!(all, vec![guides]);
        assert!(matches!(
            repository.delete(&news).await,
            Err(RepositoryError::NotDeleted { .. })
        ));
    }
}
