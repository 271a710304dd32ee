use async_trait::async_trait;

use crate::db::Db;
use crate::sources::{GroupSource, SourceResult};

pub struct GroupRepo {
    pool: Db,
}

impl GroupRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupSource for GroupRepo {
    async fn fellow_member_alias_ids(&self, person_id: i64) -> SourceResult<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT p.primary_alias_id
            FROM group_members gm
            JOIN group_members mine ON mine.group_id = gm.group_id AND mine.person_id = $1
            JOIN people p ON p.id = gm.person_id
            WHERE gm.person_id <> $1
            "#,
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(alias_id,)| alias_id).collect())
    }
}
