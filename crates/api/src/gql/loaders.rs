use async_graphql::dataloader::Loader;
use infra::models::{CampusRow, PersonRow};
use infra::sources::{CampusSource, FollowingSource, PersonSource, SourceError, PRAYER_NODE_TYPE};
use std::{
    collections::{HashMap, HashSet},
    future::Future,
    sync::Arc,
};

// PersonLoader - batch load people by person alias id
#[derive(Clone)]
pub struct PersonLoader {
    source: Arc<dyn PersonSource>,
}

impl PersonLoader {
    pub fn new(source: Arc<dyn PersonSource>) -> Self {
        Self { source }
    }
}

impl Loader<i64> for PersonLoader {
    type Value = PersonRow;
    type Error = Arc<SourceError>;

    fn load(
        &self,
        keys: &[i64],
    ) -> impl Future<Output = std::result::Result<HashMap<i64, Self::Value>, Self::Error>> + Send
    {
        let source = self.source.clone();
        let alias_ids: Vec<i64> = keys.to_vec();

        async move {
            if alias_ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = source
                .get_by_alias_ids(&alias_ids)
                .await
                .map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.primary_alias_id, r)).collect())
        }
    }
}

// CampusLoader - batch load campuses by id
#[derive(Clone)]
pub struct CampusLoader {
    source: Arc<dyn CampusSource>,
}

impl CampusLoader {
    pub fn new(source: Arc<dyn CampusSource>) -> Self {
        Self { source }
    }
}

impl Loader<i64> for CampusLoader {
    type Value = CampusRow;
    type Error = Arc<SourceError>;

    fn load(
        &self,
        keys: &[i64],
    ) -> impl Future<Output = std::result::Result<HashMap<i64, Self::Value>, Self::Error>> + Send
    {
        let source = self.source.clone();
        let ids: Vec<i64> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = source.get_by_ids(&ids).await.map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}

/// Whether `person_id` has saved `prayer_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SavedKey {
    pub person_id: i64,
    pub prayer_id: i64,
}

// SavedLoader - one followed-id lookup per person per batch
#[derive(Clone)]
pub struct SavedLoader {
    source: Arc<dyn FollowingSource>,
}

impl SavedLoader {
    pub fn new(source: Arc<dyn FollowingSource>) -> Self {
        Self { source }
    }
}

impl Loader<SavedKey> for SavedLoader {
    type Value = bool;
    type Error = Arc<SourceError>;

    fn load(
        &self,
        keys: &[SavedKey],
    ) -> impl Future<Output = std::result::Result<HashMap<SavedKey, bool>, Self::Error>> + Send
    {
        let source = self.source.clone();
        let keys: Vec<SavedKey> = keys.to_vec();

        async move {
            let mut person_ids: Vec<i64> = keys.iter().map(|k| k.person_id).collect();
            person_ids.sort_unstable();
            person_ids.dedup();

            let mut saved = HashMap::with_capacity(keys.len());
            for person_id in person_ids {
                let followed: HashSet<i64> = source
                    .followed_node_ids(person_id, PRAYER_NODE_TYPE)
                    .await
                    .map_err(Arc::new)?
                    .into_iter()
                    .collect();

                for key in keys.iter().filter(|k| k.person_id == person_id) {
                    saved.insert(*key, followed.contains(&key.prayer_id));
                }
            }

            Ok(saved)
        }
    }
}
