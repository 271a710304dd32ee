//! Feed visibility, ordering and field projection for prayer requests.
//!
//! Everything here is synchronous and pure: collaborators resolve campus,
//! group and saved-node lookups beforehand and hand the results in through
//! [`FeedScope`].

use chrono::{DateTime, Utc};
use infra::models::{PersonRow, PrayerRequestRow};

use crate::gql::common::types::Role;

/// Who is looking at the feed.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub person: Option<PersonRow>,
    pub role: Role,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self {
            person: None,
            role: Role::Member,
        }
    }

    pub fn new(person: PersonRow, role: Role) -> Self {
        Self {
            person: Some(person),
            role,
        }
    }

    pub fn person_id(&self) -> Option<i64> {
        self.person.as_ref().map(|p| p.id)
    }

    pub fn person_alias_id(&self) -> Option<i64> {
        self.person.as_ref().map(|p| p.primary_alias_id)
    }

    pub fn is_moderator(&self) -> bool {
        self.role.is_moderator()
    }

    pub fn owns(&self, record: &PrayerRequestRow) -> bool {
        self.person_alias_id()
            .is_some_and(|alias| record.is_requested_by(alias))
    }

    /// Owners and moderators may edit a record.
    pub fn can_manage(&self, record: &PrayerRequestRow) -> bool {
        self.is_moderator() || self.owns(record)
    }

    /// Public records are readable by anyone; private ones only by their
    /// owner or a moderator.
    pub fn can_view(&self, record: &PrayerRequestRow) -> bool {
        record.is_public || self.can_manage(record)
    }
}

/// Which feed is being assembled, carrying any externally resolved predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    Public,
    Campus(i64),
    /// Alias ids of the viewer's fellow group members.
    Group(Vec<i64>),
    /// Alias id of the owner.
    User(i64),
    /// Record ids in the viewer's followed-node set.
    Saved(Vec<i64>),
}

impl FeedScope {
    fn admits(&self, record: &PrayerRequestRow, viewer: &Viewer) -> bool {
        match self {
            FeedScope::Public => record.is_public,
            FeedScope::Campus(campus_id) => {
                record.is_public && record.campus_id == Some(*campus_id)
            }
            FeedScope::Group(alias_ids) => {
                record.is_public
                    && record
                        .requested_by_person_alias_id
                        .is_some_and(|alias| alias_ids.contains(&alias))
            }
            FeedScope::User(alias_id) => record.is_requested_by(*alias_id),
            FeedScope::Saved(ids) => {
                ids.contains(&record.id) && (record.is_public || viewer.owns(record))
            }
        }
    }
}

/// Filter `records` down to `scope` and order them for display.
///
/// Soft-deleted records never appear. The result holds the input records
/// unmodified.
pub fn select_feed(
    records: Vec<PrayerRequestRow>,
    viewer: &Viewer,
    scope: &FeedScope,
) -> Vec<PrayerRequestRow> {
    let mut feed: Vec<PrayerRequestRow> = records
        .into_iter()
        .filter(|r| r.is_active && scope.admits(r, viewer))
        .collect();
    sort_feed(&mut feed);
    feed
}

/// Fewest prayers first, then oldest first. `sort_by` is stable, so full ties
/// keep their input order.
pub fn sort_feed(records: &mut [PrayerRequestRow]) {
    records.sort_by(|a, b| {
        a.prayer_count
            .cmp(&b.prayer_count)
            .then_with(|| a.entered_date_time.cmp(&b.entered_date_time))
    });
}

/// Caller-facing shape of a record after redaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerView {
    pub id: i64,
    pub text: String,
    pub answer: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub requestor_alias_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub flag_count: i32,
    pub prayer_count: i32,
    pub campus_id: Option<i64>,
    pub is_public: bool,
    pub is_anonymous: bool,
}

/// Project `record` for `viewer`. Requestor identity is hidden on anonymous
/// requests from everyone except moderators.
pub fn project_fields(
    record: &PrayerRequestRow,
    viewer: &Viewer,
    is_anonymous: bool,
) -> PrayerView {
    let show_identity = !is_anonymous || viewer.is_moderator();

    PrayerView {
        id: record.id,
        text: record.text.clone(),
        answer: record.answer.clone().filter(|a| !a.is_empty()),
        first_name: record.first_name.clone().filter(|_| show_identity),
        last_name: record.last_name.clone().filter(|_| show_identity),
        requestor_alias_id: record.requested_by_person_alias_id.filter(|_| show_identity),
        start_time: record.entered_date_time,
        flag_count: record.flag_count,
        prayer_count: record.prayer_count,
        campus_id: record.campus_id,
        is_public: record.is_public,
        is_anonymous,
    }
}
