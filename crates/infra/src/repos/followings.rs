use async_trait::async_trait;

use crate::db::Db;
use crate::sources::{FollowingSource, SourceResult};

pub struct FollowingRepo {
    pool: Db,
}

impl FollowingRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowingSource for FollowingRepo {
    async fn follow_node(
        &self,
        person_id: i64,
        node_type: &str,
        node_id: i64,
    ) -> SourceResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO followings (person_id, node_type, node_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (person_id, node_type, node_id) DO NOTHING
            "#,
        )
        .bind(person_id)
        .bind(node_type)
        .bind(node_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn unfollow_node(
        &self,
        person_id: i64,
        node_type: &str,
        node_id: i64,
    ) -> SourceResult<bool> {
        let result = sqlx::query(
            "DELETE FROM followings WHERE person_id = $1 AND node_type = $2 AND node_id = $3",
        )
        .bind(person_id)
        .bind(node_type)
        .bind(node_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn followed_node_ids(&self, person_id: i64, node_type: &str) -> SourceResult<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT node_id
            FROM followings
            WHERE person_id = $1 AND node_type = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(person_id)
        .bind(node_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(node_id,)| node_id).collect())
    }
}
