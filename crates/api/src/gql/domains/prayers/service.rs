use chrono::Utc;
use infra::models::{PersonRow, PrayerRequestRow};
use infra::sources::{
    CreatePrayerRequest, DataSources, InteractionOperation, PrayerFilter, PRAYER_NODE_TYPE,
};

use super::error::PrayerError;
use super::policy::{select_feed, FeedScope, Viewer};
use super::types::PrayerAction;
use crate::config::PrayerSettings;

pub type PrayerResult<T> = Result<T, PrayerError>;

/// Which feed a query asks for. Scoped kinds need a signed-in viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Public,
    Campus,
    Group,
    User,
    Saved,
}

/// Parameters for submitting a prayer request (parsed by the resolver).
#[derive(Debug, Clone)]
pub struct NewPrayer {
    pub text: String,
    pub is_anonymous: bool,
    pub is_public: Option<bool>,
    pub category_id: Option<i64>,
}

fn signed_in(viewer: &Viewer) -> PrayerResult<&PersonRow> {
    viewer.person.as_ref().ok_or_else(|| {
        PrayerError::Unauthorized("You must be logged in to perform this action".into())
    })
}

fn ensure_can_manage(viewer: &Viewer, record: &PrayerRequestRow) -> PrayerResult<()> {
    if viewer.can_manage(record) {
        Ok(())
    } else {
        Err(PrayerError::Unauthorized(
            "Only the requester or a moderator can change this prayer request".into(),
        ))
    }
}

fn updated(row: Option<PrayerRequestRow>) -> PrayerResult<PrayerRequestRow> {
    row.ok_or(PrayerError::NotFound)
}

/// Resolve the external predicate for `kind`, fetch candidates and hand them
/// to the feed policy.
pub async fn load_feed(
    sources: &DataSources,
    viewer: &Viewer,
    kind: FeedKind,
) -> PrayerResult<Vec<PrayerRequestRow>> {
    let (filter, scope) = match kind {
        FeedKind::Public => (PrayerFilter::default(), FeedScope::Public),
        FeedKind::Campus => {
            let Some(campus_id) = signed_in(viewer)?.campus_id else {
                return Ok(Vec::new());
            };
            (
                PrayerFilter {
                    campus_id: Some(campus_id),
                    ..Default::default()
                },
                FeedScope::Campus(campus_id),
            )
        }
        FeedKind::Group => {
            let person = signed_in(viewer)?;
            let alias_ids = sources.groups.fellow_member_alias_ids(person.id).await?;
            if alias_ids.is_empty() {
                return Ok(Vec::new());
            }
            (
                PrayerFilter {
                    requested_by_alias_ids: Some(alias_ids.clone()),
                    ..Default::default()
                },
                FeedScope::Group(alias_ids),
            )
        }
        FeedKind::User => {
            let alias_id = signed_in(viewer)?.primary_alias_id;
            (
                PrayerFilter {
                    requested_by_alias_ids: Some(vec![alias_id]),
                    ..Default::default()
                },
                FeedScope::User(alias_id),
            )
        }
        FeedKind::Saved => {
            let person = signed_in(viewer)?;
            let ids = sources
                .followings
                .followed_node_ids(person.id, PRAYER_NODE_TYPE)
                .await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            (
                PrayerFilter {
                    ids: Some(ids.clone()),
                    ..Default::default()
                },
                FeedScope::Saved(ids),
            )
        }
    };

    let records = sources.prayers.list(filter).await?;
    Ok(select_feed(records, viewer, &scope))
}

/// Fetch one active record the viewer is allowed to read.
pub async fn get_prayer(
    sources: &DataSources,
    viewer: &Viewer,
    id: i64,
) -> PrayerResult<PrayerRequestRow> {
    let record = sources
        .prayers
        .get_by_id(id)
        .await?
        .filter(|r| r.is_active)
        .ok_or(PrayerError::NotFound)?;

    if !viewer.can_view(&record) {
        return Err(PrayerError::Unauthorized("This prayer request is private".into()));
    }
    Ok(record)
}

/// Single dispatch point for every prayer interaction, including the
/// deprecated single-purpose mutations.
///
/// Repeating an action is safe: SAVE/UNSAVE/REMOVE_ANSWER/DELETE return the
/// current state instead of failing when there is nothing left to do.
pub async fn interact(
    sources: &DataSources,
    settings: &PrayerSettings,
    viewer: &Viewer,
    id: i64,
    action: PrayerAction,
) -> PrayerResult<PrayerRequestRow> {
    if !settings.allows(action) {
        return Err(PrayerError::InvalidAction(format!("{} is disabled", action.as_str())));
    }

    let person_id = signed_in(viewer)?.id;
    let record = sources
        .prayers
        .get_by_id(id)
        .await?
        .ok_or(PrayerError::NotFound)?;

    if !record.is_active {
        if action == PrayerAction::Delete && viewer.can_manage(&record) {
            return Ok(record);
        }
        return Err(PrayerError::NotFound);
    }

    if !viewer.can_view(&record) {
        return Err(PrayerError::Unauthorized("This prayer request is private".into()));
    }

    tracing::info!(
        prayer_id = id,
        person_id,
        action = action.as_str(),
        "prayer interaction"
    );

    match action {
        PrayerAction::Increment => {
            let row = updated(sources.prayers.increment_prayed(id).await?)?;
            sources
                .prayers
                .record_interaction(id, person_id, InteractionOperation::Prayed)
                .await?;
            Ok(row)
        }
        PrayerAction::Flag => {
            let row = updated(sources.prayers.flag(id).await?)?;
            sources
                .prayers
                .record_interaction(id, person_id, InteractionOperation::Flagged)
                .await?;
            Ok(row)
        }
        PrayerAction::Delete => {
            ensure_can_manage(viewer, &record)?;
            updated(sources.prayers.deactivate(id).await?)
        }
        PrayerAction::Save => {
            sources
                .followings
                .follow_node(person_id, PRAYER_NODE_TYPE, id)
                .await?;
            Ok(record)
        }
        PrayerAction::Unsave => {
            sources
                .followings
                .unfollow_node(person_id, PRAYER_NODE_TYPE, id)
                .await?;
            Ok(record)
        }
        PrayerAction::RemoveAnswer => {
            ensure_can_manage(viewer, &record)?;
            if record.answer.is_none() {
                return Ok(record);
            }
            updated(sources.prayers.set_answer(id, None).await?)
        }
    }
}

/// Set the answer on a record. Blank text clears it.
pub async fn answer(
    sources: &DataSources,
    viewer: &Viewer,
    id: i64,
    answer: &str,
) -> PrayerResult<PrayerRequestRow> {
    signed_in(viewer)?;
    let record = sources
        .prayers
        .get_by_id(id)
        .await?
        .filter(|r| r.is_active)
        .ok_or(PrayerError::NotFound)?;
    ensure_can_manage(viewer, &record)?;

    let answer = answer.trim();
    let next = (!answer.is_empty()).then(|| answer.to_string());
    if record.answer == next {
        return Ok(record);
    }

    tracing::info!(prayer_id = id, answered = next.is_some(), "prayer answer updated");
    updated(sources.prayers.set_answer(id, next).await?)
}

pub async fn add_prayer(
    sources: &DataSources,
    viewer: &Viewer,
    input: NewPrayer,
) -> PrayerResult<PrayerRequestRow> {
    let person = signed_in(viewer)?;

    let text = input.text.trim();
    if text.is_empty() {
        return Err(PrayerError::Validation("Prayer text is required".into()));
    }

    if let Some(category_id) = input.category_id {
        let category = sources
            .categories
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| {
                PrayerError::Validation(format!("Unknown prayer category {category_id}"))
            })?;
        if category.requires_campus_membership && person.campus_id.is_none() {
            return Err(PrayerError::Validation(format!(
                "The {} category requires campus membership",
                category.key
            )));
        }
    }

    let row = sources
        .prayers
        .create(CreatePrayerRequest {
            first_name: Some(person.first_name.clone()),
            last_name: person.last_name.clone(),
            text: text.to_string(),
            requested_by_person_alias_id: Some(person.primary_alias_id),
            entered_date_time: Utc::now(),
            campus_id: person.campus_id,
            category_id: input.category_id,
            is_public: input.is_public.unwrap_or(true),
            is_anonymous: input.is_anonymous,
        })
        .await?;

    tracing::info!(
        prayer_id = row.id,
        person_id = person.id,
        is_anonymous = row.is_anonymous,
        "prayer request submitted"
    );
    Ok(row)
}
