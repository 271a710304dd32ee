use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PrayerRequestRow {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub text: String,
    pub answer: Option<String>,
    pub requested_by_person_alias_id: Option<i64>,
    pub entered_date_time: DateTime<Utc>,
    pub campus_id: Option<i64>,
    pub category_id: Option<i64>,
    pub flag_count: i32,
    pub prayer_count: i32,
    pub is_public: bool,
    pub is_anonymous: bool,
    pub is_active: bool,
}

impl PrayerRequestRow {
    pub fn is_requested_by(&self, person_alias_id: i64) -> bool {
        self.requested_by_person_alias_id == Some(person_alias_id)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PersonRow {
    pub id: i64,
    pub primary_alias_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub campus_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CampusRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PrayerCategoryRow {
    pub id: i64,
    pub key: String,
    pub requires_campus_membership: bool,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct FollowingRow {
    pub person_id: i64,
    pub node_type: String,
    pub node_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PrayerInteractionRow {
    pub id: Uuid,
    pub prayer_request_id: i64,
    pub person_id: i64,
    pub operation: String,
    pub created_at: DateTime<Utc>,
}
