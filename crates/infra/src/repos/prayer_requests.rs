use async_trait::async_trait;
use uuid::Uuid;

use crate::db::Db;
use crate::models::PrayerRequestRow;
use crate::sources::{
    CreatePrayerRequest, InteractionOperation, PrayerFilter, PrayerSource, SourceResult,
};

const PRAYER_COLUMNS: &str = "id, first_name, last_name, text, answer, \
     requested_by_person_alias_id, entered_date_time, campus_id, category_id, flag_count, \
     prayer_count, is_public, is_anonymous, is_active";

pub struct PrayerRequestRepo {
    pool: Db,
}

impl PrayerRequestRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    /// Run a single-row `UPDATE ... RETURNING` built from `set_clause`.
    async fn update_returning(
        &self,
        id: i64,
        set_clause: &str,
    ) -> SourceResult<Option<PrayerRequestRow>> {
        let sql = format!(
            "UPDATE prayer_requests SET {set_clause}, updated_at = NOW() \
             WHERE id = $1 RETURNING {PRAYER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PrayerRequestRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}

#[async_trait]
impl PrayerSource for PrayerRequestRepo {
    async fn get_by_id(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>> {
        let sql = format!("SELECT {PRAYER_COLUMNS} FROM prayer_requests WHERE id = $1");
        let row = sqlx::query_as::<_, PrayerRequestRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list(&self, filter: PrayerFilter) -> SourceResult<Vec<PrayerRequestRow>> {
        let mut query = sqlx::QueryBuilder::new(format!(
            "SELECT {PRAYER_COLUMNS} FROM prayer_requests WHERE is_active = true"
        ));

        if let Some(campus_id) = filter.campus_id {
            query.push(" AND campus_id = ");
            query.push_bind(campus_id);
        }

        if let Some(alias_ids) = filter.requested_by_alias_ids {
            query.push(" AND requested_by_person_alias_id = ANY(");
            query.push_bind(alias_ids);
            query.push(")");
        }

        if let Some(ids) = filter.ids {
            query.push(" AND id = ANY(");
            query.push_bind(ids);
            query.push(")");
        }

        // Insertion order; the feed policy owns the final ordering.
        query.push(" ORDER BY id ASC");

        let rows = query
            .build_query_as::<PrayerRequestRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn create(&self, data: CreatePrayerRequest) -> SourceResult<PrayerRequestRow> {
        let sql = format!(
            r#"
            INSERT INTO prayer_requests (
                first_name, last_name, text, requested_by_person_alias_id, entered_date_time,
                campus_id, category_id, is_public, is_anonymous
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRAYER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PrayerRequestRow>(&sql)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.text)
            .bind(data.requested_by_person_alias_id)
            .bind(data.entered_date_time)
            .bind(data.campus_id)
            .bind(data.category_id)
            .bind(data.is_public)
            .bind(data.is_anonymous)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(prayer_id = row.id, "inserted prayer request");
        Ok(row)
    }

    async fn set_answer(
        &self,
        id: i64,
        answer: Option<String>,
    ) -> SourceResult<Option<PrayerRequestRow>> {
        let sql = format!(
            "UPDATE prayer_requests SET answer = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {PRAYER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PrayerRequestRow>(&sql)
            .bind(id)
            .bind(answer)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn increment_prayed(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>> {
        self.update_returning(id, "prayer_count = prayer_count + 1")
            .await
    }

    async fn flag(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>> {
        self.update_returning(id, "flag_count = flag_count + 1").await
    }

    async fn deactivate(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>> {
        self.update_returning(id, "is_active = false").await
    }

    async fn record_interaction(
        &self,
        prayer_request_id: i64,
        person_id: i64,
        operation: InteractionOperation,
    ) -> SourceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO prayer_interactions (id, prayer_request_id, person_id, operation)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(prayer_request_id)
        .bind(person_id)
        .bind(operation.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
