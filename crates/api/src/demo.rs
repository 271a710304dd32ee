//! Seed data for running the API without a database.

use chrono::{Duration, Utc};
use infra::models::{CampusRow, PersonRow, PrayerCategoryRow, PrayerRequestRow};
use infra::sources::memory::MemoryStore;

/// Person the startup demo token is issued for.
pub const DEMO_PERSON_ID: i64 = 1;

fn demo_prayer(
    id: i64,
    author: &PersonRow,
    text: &str,
    days_ago: i64,
    prayer_count: i32,
    is_public: bool,
    is_anonymous: bool,
) -> PrayerRequestRow {
    PrayerRequestRow {
        id,
        first_name: Some(author.first_name.clone()),
        last_name: author.last_name.clone(),
        text: text.to_string(),
        answer: None,
        requested_by_person_alias_id: Some(author.primary_alias_id),
        entered_date_time: Utc::now() - Duration::days(days_ago),
        campus_id: author.campus_id,
        category_id: Some(2),
        flag_count: 0,
        prayer_count,
        is_public,
        is_anonymous,
        is_active: true,
    }
}

/// A small church: one campus, three people sharing a small group, and a
/// handful of requests covering the public, private and anonymous cases.
pub fn seed_store() -> MemoryStore {
    let isaac = PersonRow {
        id: DEMO_PERSON_ID,
        primary_alias_id: 101,
        first_name: "Isaac".into(),
        last_name: Some("Hardy".into()),
        campus_id: Some(1),
    };
    let rich = PersonRow {
        id: 2,
        primary_alias_id: 102,
        first_name: "Rich".into(),
        last_name: Some("Dubee".into()),
        campus_id: Some(1),
    };
    let dana = PersonRow {
        id: 3,
        primary_alias_id: 103,
        first_name: "Dana".into(),
        last_name: None,
        campus_id: None,
    };

    let prayers = vec![
        demo_prayer(1, &isaac, "Pray for my new job.", 3, 4, true, false),
        demo_prayer(2, &rich, "Healing for my mom.", 2, 0, true, true),
        demo_prayer(3, &rich, "Wisdom with a hard decision.", 1, 1, false, false),
        demo_prayer(4, &dana, "Safe travels this weekend.", 0, 2, true, false),
    ];

    MemoryStore::new()
        .with_campus(CampusRow {
            id: 1,
            name: "Main Campus".into(),
        })
        .with_category(PrayerCategoryRow {
            id: 1,
            key: "campus".into(),
            requires_campus_membership: true,
        })
        .with_category(PrayerCategoryRow {
            id: 2,
            key: "community".into(),
            requires_campus_membership: false,
        })
        .with_person(isaac)
        .with_person(rich)
        .with_person(dana)
        .with_group_member(1, 1)
        .with_group_member(1, 2)
        .with_group_member(1, 3)
        .with_prayers(prayers)
}
