//! In-process implementation of every collaborator trait.
//!
//! Records keep insertion order, which is the order `list` returns them in.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{
    CampusSource, CategorySource, CreatePrayerRequest, FollowingSource, GroupSource,
    InteractionOperation, PersonSource, PrayerFilter, PrayerSource, SourceResult,
};
use crate::models::{
    CampusRow, FollowingRow, PersonRow, PrayerCategoryRow, PrayerInteractionRow, PrayerRequestRow,
};

#[derive(Default)]
struct MemoryState {
    prayers: Vec<PrayerRequestRow>,
    people: Vec<PersonRow>,
    campuses: Vec<CampusRow>,
    categories: Vec<PrayerCategoryRow>,
    group_members: Vec<(i64, i64)>,
    followings: Vec<FollowingRow>,
    interactions: Vec<PrayerInteractionRow>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prayers(self, rows: impl IntoIterator<Item = PrayerRequestRow>) -> Self {
        self.state.write().prayers.extend(rows);
        self
    }

    pub fn with_person(self, row: PersonRow) -> Self {
        self.state.write().people.push(row);
        self
    }

    pub fn with_campus(self, row: CampusRow) -> Self {
        self.state.write().campuses.push(row);
        self
    }

    pub fn with_category(self, row: PrayerCategoryRow) -> Self {
        self.state.write().categories.push(row);
        self
    }

    pub fn with_group_member(self, group_id: i64, person_id: i64) -> Self {
        self.state.write().group_members.push((group_id, person_id));
        self
    }

    /// Snapshot of the interaction log, oldest first.
    pub fn interactions(&self) -> Vec<PrayerInteractionRow> {
        self.state.read().interactions.clone()
    }

    /// Snapshot of a record regardless of its active flag.
    pub fn prayer(&self, id: i64) -> Option<PrayerRequestRow> {
        self.state.read().prayers.iter().find(|p| p.id == id).cloned()
    }

    fn update_prayer(
        &self,
        id: i64,
        apply: impl FnOnce(&mut PrayerRequestRow),
    ) -> Option<PrayerRequestRow> {
        let mut state = self.state.write();
        let row = state.prayers.iter_mut().find(|p| p.id == id)?;
        apply(row);
        Some(row.clone())
    }
}

#[async_trait]
impl PrayerSource for MemoryStore {
    async fn get_by_id(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>> {
        Ok(self.prayer(id))
    }

    async fn list(&self, filter: PrayerFilter) -> SourceResult<Vec<PrayerRequestRow>> {
        let state = self.state.read();
        Ok(state
            .prayers
            .iter()
            .filter(|p| p.is_active)
            .filter(|p| filter.campus_id.map_or(true, |c| p.campus_id == Some(c)))
            .filter(|p| {
                filter.requested_by_alias_ids.as_ref().map_or(true, |ids| {
                    p.requested_by_person_alias_id
                        .is_some_and(|alias| ids.contains(&alias))
                })
            })
            .filter(|p| filter.ids.as_ref().map_or(true, |ids| ids.contains(&p.id)))
            .cloned()
            .collect())
    }

    async fn create(&self, data: CreatePrayerRequest) -> SourceResult<PrayerRequestRow> {
        let mut state = self.state.write();
        let id = state.prayers.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let row = PrayerRequestRow {
            id,
            first_name: data.first_name,
            last_name: data.last_name,
            text: data.text,
            answer: None,
            requested_by_person_alias_id: data.requested_by_person_alias_id,
            entered_date_time: data.entered_date_time,
            campus_id: data.campus_id,
            category_id: data.category_id,
            flag_count: 0,
            prayer_count: 0,
            is_public: data.is_public,
            is_anonymous: data.is_anonymous,
            is_active: true,
        };
        state.prayers.push(row.clone());
        Ok(row)
    }

    async fn set_answer(
        &self,
        id: i64,
        answer: Option<String>,
    ) -> SourceResult<Option<PrayerRequestRow>> {
        Ok(self.update_prayer(id, |p| p.answer = answer))
    }

    async fn increment_prayed(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>> {
        Ok(self.update_prayer(id, |p| p.prayer_count += 1))
    }

    async fn flag(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>> {
        Ok(self.update_prayer(id, |p| p.flag_count += 1))
    }

    async fn deactivate(&self, id: i64) -> SourceResult<Option<PrayerRequestRow>> {
        Ok(self.update_prayer(id, |p| p.is_active = false))
    }

    async fn record_interaction(
        &self,
        prayer_request_id: i64,
        person_id: i64,
        operation: InteractionOperation,
    ) -> SourceResult<()> {
        self.state.write().interactions.push(PrayerInteractionRow {
            id: Uuid::new_v4(),
            prayer_request_id,
            person_id,
            operation: operation.as_str().to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl PersonSource for MemoryStore {
    async fn get_by_id(&self, id: i64) -> SourceResult<Option<PersonRow>> {
        Ok(self.state.read().people.iter().find(|p| p.id == id).cloned())
    }

    async fn get_by_alias_ids(&self, alias_ids: &[i64]) -> SourceResult<Vec<PersonRow>> {
        Ok(self
            .state
            .read()
            .people
            .iter()
            .filter(|p| alias_ids.contains(&p.primary_alias_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CampusSource for MemoryStore {
    async fn get_by_ids(&self, ids: &[i64]) -> SourceResult<Vec<CampusRow>> {
        Ok(self
            .state
            .read()
            .campuses
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GroupSource for MemoryStore {
    async fn fellow_member_alias_ids(&self, person_id: i64) -> SourceResult<Vec<i64>> {
        let state = self.state.read();
        let groups: Vec<i64> = state
            .group_members
            .iter()
            .filter(|(_, member)| *member == person_id)
            .map(|(group, _)| *group)
            .collect();

        let mut alias_ids = Vec::new();
        for (group, member) in &state.group_members {
            if *member == person_id || !groups.contains(group) {
                continue;
            }
            if let Some(person) = state.people.iter().find(|p| p.id == *member) {
                if !alias_ids.contains(&person.primary_alias_id) {
                    alias_ids.push(person.primary_alias_id);
                }
            }
        }
        Ok(alias_ids)
    }
}

#[async_trait]
impl FollowingSource for MemoryStore {
    async fn follow_node(
        &self,
        person_id: i64,
        node_type: &str,
        node_id: i64,
    ) -> SourceResult<bool> {
        let mut state = self.state.write();
        let exists = state
            .followings
            .iter()
            .any(|f| f.person_id == person_id && f.node_type == node_type && f.node_id == node_id);
        if exists {
            return Ok(false);
        }
        state.followings.push(FollowingRow {
            person_id,
            node_type: node_type.to_string(),
            node_id,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn unfollow_node(
        &self,
        person_id: i64,
        node_type: &str,
        node_id: i64,
    ) -> SourceResult<bool> {
        let mut state = self.state.write();
        let before = state.followings.len();
        state.followings.retain(|f| {
            !(f.person_id == person_id && f.node_type == node_type && f.node_id == node_id)
        });
        Ok(state.followings.len() != before)
    }

    async fn followed_node_ids(&self, person_id: i64, node_type: &str) -> SourceResult<Vec<i64>> {
        Ok(self
            .state
            .read()
            .followings
            .iter()
            .filter(|f| f.person_id == person_id && f.node_type == node_type)
            .map(|f| f.node_id)
            .collect())
    }
}

#[async_trait]
impl CategorySource for MemoryStore {
    async fn list(&self) -> SourceResult<Vec<PrayerCategoryRow>> {
        Ok(self.state.read().categories.clone())
    }

    async fn get_by_id(&self, id: i64) -> SourceResult<Option<PrayerCategoryRow>> {
        Ok(self
            .state
            .read()
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }
}
