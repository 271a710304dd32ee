use async_trait::async_trait;

use crate::db::Db;
use crate::models::PrayerCategoryRow;
use crate::sources::{CategorySource, SourceResult};

pub struct PrayerCategoryRepo {
    pool: Db,
}

impl PrayerCategoryRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategorySource for PrayerCategoryRepo {
    async fn list(&self) -> SourceResult<Vec<PrayerCategoryRow>> {
        let rows = sqlx::query_as::<_, PrayerCategoryRow>(
            "SELECT id, key, requires_campus_membership FROM prayer_categories ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_by_id(&self, id: i64) -> SourceResult<Option<PrayerCategoryRow>> {
        let row = sqlx::query_as::<_, PrayerCategoryRow>(
            "SELECT id, key, requires_campus_membership FROM prayer_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
