use async_trait::async_trait;

use crate::db::Db;
use crate::models::CampusRow;
use crate::sources::{CampusSource, SourceResult};

pub struct CampusRepo {
    pool: Db,
}

impl CampusRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampusSource for CampusRepo {
    async fn get_by_ids(&self, ids: &[i64]) -> SourceResult<Vec<CampusRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, CampusRow>(
            "SELECT id, name FROM campuses WHERE id = ANY($1::bigint[])",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
