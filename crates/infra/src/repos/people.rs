use async_trait::async_trait;

use crate::db::Db;
use crate::models::PersonRow;
use crate::sources::{PersonSource, SourceResult};

pub struct PersonRepo {
    pool: Db,
}

impl PersonRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonSource for PersonRepo {
    async fn get_by_id(&self, id: i64) -> SourceResult<Option<PersonRow>> {
        let row = sqlx::query_as::<_, PersonRow>(
            "SELECT id, primary_alias_id, first_name, last_name, campus_id \
             FROM people WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_by_alias_ids(&self, alias_ids: &[i64]) -> SourceResult<Vec<PersonRow>> {
        if alias_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, PersonRow>(
            r#"
            SELECT id, primary_alias_id, first_name, last_name, campus_id
            FROM people
            WHERE primary_alias_id = ANY($1::bigint[])
            "#,
        )
        .bind(alias_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
