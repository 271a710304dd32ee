use std::str::FromStr;

use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use infra::models::{PrayerCategoryRow, PrayerRequestRow};

use super::error::PrayerError;
use super::policy::{project_fields, PrayerView, Viewer};
use crate::gql::domains::campuses::Campus;
use crate::gql::domains::people::Person;
use crate::gql::error::GqlError;
use crate::gql::loaders::{CampusLoader, PersonLoader, SavedKey, SavedLoader};
use crate::state::AppState;

/// Type prefix of prayer node ids.
pub const PRAYER_TYPE: &str = "Prayer";

/// Interactions a viewer can perform on a prayer request.
#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum PrayerAction {
    Increment,
    Flag,
    Delete,
    Save,
    Unsave,
    RemoveAnswer,
}

impl PrayerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increment => "INCREMENT",
            Self::Flag => "FLAG",
            Self::Delete => "DELETE",
            Self::Save => "SAVE",
            Self::Unsave => "UNSAVE",
            Self::RemoveAnswer => "REMOVE_ANSWER",
        }
    }
}

impl FromStr for PrayerAction {
    type Err = PrayerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INCREMENT" => Ok(Self::Increment),
            "FLAG" => Ok(Self::Flag),
            "DELETE" => Ok(Self::Delete),
            "SAVE" => Ok(Self::Save),
            "UNSAVE" => Ok(Self::Unsave),
            "REMOVE_ANSWER" => Ok(Self::RemoveAnswer),
            _ => Err(PrayerError::InvalidAction(s.to_string())),
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Prayer {
    pub id: ID,
    pub text: String,
    pub answer: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub flag_count: i32,
    pub prayer_count: i32,
    pub is_anonymous: bool,
    pub is_public: bool,
    #[graphql(skip)]
    pub record_id: i64,
    #[graphql(skip)]
    pub campus_id: Option<i64>,
    #[graphql(skip)]
    pub requestor_alias_id: Option<i64>,
    /// Person the record was projected for; drives `isSaved`.
    #[graphql(skip)]
    pub viewer_id: Option<i64>,
}

impl Prayer {
    fn from_view(view: PrayerView, viewer_id: Option<i64>, state: &AppState) -> Self {
        Self {
            id: ID(state.node_ids().encode(PRAYER_TYPE, view.id)),
            text: view.text,
            answer: view.answer,
            first_name: view.first_name,
            last_name: view.last_name,
            start_time: view.start_time,
            flag_count: view.flag_count,
            prayer_count: view.prayer_count,
            is_anonymous: view.is_anonymous,
            is_public: view.is_public,
            record_id: view.id,
            campus_id: view.campus_id,
            requestor_alias_id: view.requestor_alias_id,
            viewer_id,
        }
    }

    /// Project a stored record for `viewer`.
    pub fn project(record: &PrayerRequestRow, viewer: &Viewer, state: &AppState) -> Self {
        let view = project_fields(record, viewer, record.is_anonymous);
        Self::from_view(view, viewer.person_id(), state)
    }

    async fn load_requestor(&self, ctx: &Context<'_>) -> Result<Option<Person>> {
        let Some(alias_id) = self.requestor_alias_id else {
            return Ok(None);
        };
        let state = ctx.data::<AppState>()?;
        let loader = ctx.data::<DataLoader<PersonLoader>>()?;
        let person = loader.load_one(alias_id).await.map_err(GqlError::from)?;
        Ok(person.map(|row| Person::from_row(row, state)))
    }
}

#[ComplexObject]
impl Prayer {
    async fn campus(&self, ctx: &Context<'_>) -> Result<Option<Campus>> {
        let Some(campus_id) = self.campus_id else {
            return Ok(None);
        };
        let state = ctx.data::<AppState>()?;
        let loader = ctx.data::<DataLoader<CampusLoader>>()?;
        let campus = loader.load_one(campus_id).await.map_err(GqlError::from)?;
        Ok(campus.map(|row| Campus::from_row(row, state)))
    }

    /// The person who submitted the request. Hidden on anonymous requests.
    async fn requestor(&self, ctx: &Context<'_>) -> Result<Option<Person>> {
        self.load_requestor(ctx).await
    }

    #[graphql(deprecation = "Use requestor")]
    async fn person(&self, ctx: &Context<'_>) -> Result<Option<Person>> {
        self.load_requestor(ctx).await
    }

    /// Whether the current viewer has saved this request.
    async fn is_saved(&self, ctx: &Context<'_>) -> Result<bool> {
        let Some(person_id) = self.viewer_id else {
            return Ok(false);
        };
        let loader = ctx.data::<DataLoader<SavedLoader>>()?;
        let saved = loader
            .load_one(SavedKey {
                person_id,
                prayer_id: self.record_id,
            })
            .await
            .map_err(GqlError::from)?;
        Ok(saved.unwrap_or(false))
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct PrayerCategory {
    pub id: ID,
    pub key: String,
    pub requires_campus_membership: bool,
}

impl From<PrayerCategoryRow> for PrayerCategory {
    fn from(row: PrayerCategoryRow) -> Self {
        Self {
            id: row.id.into(),
            key: row.key,
            requires_campus_membership: row.requires_campus_membership,
        }
    }
}
