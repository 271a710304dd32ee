//! Narrow collaborator interfaces consumed by the prayer API.
//!
//! Every trait is object safe so the API layer can hold `Arc<dyn ...>` and swap
//! the Postgres repositories for [`memory::MemoryStore`] in tests.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::Db;
use crate::models::{CampusRow, PersonRow, PrayerCategoryRow, PrayerRequestRow};
use crate::repos::{
    CampusRepo, FollowingRepo, GroupRepo, PersonRepo, PrayerCategoryRepo, PrayerRequestRepo,
};

/// Node type under which saved prayers are stored in the followings set.
pub const PRAYER_NODE_TYPE: &str = "PrayerRequest";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("database error")]
    Db(#[from] sqlx::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Coarse store-side filter. The feed policy still applies its own predicates
/// on whatever the store returns.
#[derive(Debug, Clone, Default)]
pub struct PrayerFilter {
    pub campus_id: Option<i64>,
    pub requested_by_alias_ids: Option<Vec<i64>>,
    pub ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone)]
pub struct CreatePrayerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub text: String,
    pub requested_by_person_alias_id: Option<i64>,
    pub entered_date_time: DateTime<Utc>,
    pub campus_id: Option<i64>,
    pub category_id: Option<i64>,
    pub is_public: bool,
    pub is_anonymous: bool,
}

/// Interaction operations written to the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOperation {
    Prayed,
    Flagged,
}

impl InteractionOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prayed => "prayed",
            Self::Flagged => "flagged",
        }
    }
}

#[async_trait]
pub trait PrayerSource: Send + Sync {
    /// Fetch a record regardless of its active flag.
    async fn get_by_id(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>>;

    /// Active records matching `filter`, in store order.
    async fn list(&self, filter: PrayerFilter) -> SourceResult<Vec<PrayerRequestRow>>;

    async fn create(&self, data: CreatePrayerRequest) -> SourceResult<PrayerRequestRow>;

    /// Set or clear the answer. `None` when the record does not exist.
    async fn set_answer(
        &self,
        id: i64,
        answer: Option<String>,
    ) -> SourceResult<Option<PrayerRequestRow>>;

    async fn increment_prayed(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>>;

    async fn flag(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>>;

    /// Soft removal.
    async fn deactivate(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>>;

    async fn record_interaction(
        &self,
        prayer_request_id: i64,
        person_id: i64,
        operation: InteractionOperation,
    ) -> SourceResult<()>;
}

#[async_trait]
pub trait PersonSource: Send + Sync {
    async fn get_by_id(&self, id: i64) -> SourceResult<Option<PersonRow>>;

    async fn get_by_alias_ids(&self, alias_ids: &[i64]) -> SourceResult<Vec<PersonRow>>;
}

#[async_trait]
pub trait CampusSource: Send + Sync {
    async fn get_by_ids(&self, ids: &[i64]) -> SourceResult<Vec<CampusRow>>;
}

#[async_trait]
pub trait GroupSource: Send + Sync {
    /// Alias ids of everyone sharing at least one group with `person_id`,
    /// excluding the person themselves.
    async fn fellow_member_alias_ids(&self, person_id: i64) -> SourceResult<Vec<i64>>;
}

#[async_trait]
pub trait FollowingSource: Send + Sync {
    /// Returns `true` when the follow was newly created.
    async fn follow_node(&self, person_id: i64, node_type: &str, node_id: i64)
        -> SourceResult<bool>;

    /// Returns `true` when an existing follow was removed.
    async fn unfollow_node(
        &self,
        person_id: i64,
        node_type: &str,
        node_id: i64,
    ) -> SourceResult<bool>;

    async fn followed_node_ids(&self, person_id: i64, node_type: &str) -> SourceResult<Vec<i64>>;
}

#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn list(&self) -> SourceResult<Vec<PrayerCategoryRow>>;

    async fn get_by_id(&self, id: i64) -> SourceResult<Option<PrayerCategoryRow>>;
}

/// Bundle of collaborators handed to the API layer.
#[derive(Clone)]
pub struct DataSources {
    pub prayers: Arc<dyn PrayerSource>,
    pub people: Arc<dyn PersonSource>,
    pub campuses: Arc<dyn CampusSource>,
    pub groups: Arc<dyn GroupSource>,
    pub followings: Arc<dyn FollowingSource>,
    pub categories: Arc<dyn CategorySource>,
}

impl DataSources {
    pub fn postgres(db: Db) -> Self {
        Self {
            prayers: Arc::new(PrayerRequestRepo::new(db.clone())),
            people: Arc::new(PersonRepo::new(db.clone())),
            campuses: Arc::new(CampusRepo::new(db.clone())),
            groups: Arc::new(GroupRepo::new(db.clone())),
            followings: Arc::new(FollowingRepo::new(db.clone())),
            categories: Arc::new(PrayerCategoryRepo::new(db)),
        }
    }

    /// All collaborators backed by one shared in-memory store.
    pub fn memory(store: memory::MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            prayers: store.clone(),
            people: store.clone(),
            campuses: store.clone(),
            groups: store.clone(),
            followings: store.clone(),
            categories: store,
        }
    }
}
