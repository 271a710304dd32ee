use api::auth::{Claims, ViewerCache};
use api::config::AppConfig;
use api::gql::domains::prayers::PRAYER_TYPE;
use api::gql::PrayerSchema;
use api::AppState;
use async_graphql::{Request, Variables};
use chrono::{DateTime, Duration, TimeZone, Utc};
use infra::models::{CampusRow, PersonRow, PrayerCategoryRow, PrayerRequestRow};
use infra::sources::memory::MemoryStore;
use infra::sources::DataSources;
use sqlx::postgres::{PgPool, PgPoolOptions};

pub const ISAAC: i64 = 51;
pub const RICH: i64 = 52;
pub const MODERATOR: i64 = 53;

pub const ISAAC_ALIAS: i64 = 447217;
pub const RICH_ALIAS: i64 = 447218;

pub fn entered_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 7, 2, 13, 8, 2).unwrap() + Duration::milliseconds(35)
}

fn person(id: i64, alias: i64, first: &str, last: &str, campus_id: Option<i64>) -> PersonRow {
    PersonRow {
        id,
        primary_alias_id: alias,
        first_name: first.into(),
        last_name: Some(last.into()),
        campus_id,
    }
}

/// Isaac's public, answered request.
pub fn rock_prayer() -> PrayerRequestRow {
    PrayerRequestRow {
        id: 1,
        first_name: Some("Isaac".into()),
        last_name: Some("Hardy".into()),
        text: "Pray this works.".into(),
        answer: Some("It worked.".into()),
        requested_by_person_alias_id: Some(ISAAC_ALIAS),
        entered_date_time: entered_at(),
        campus_id: Some(16),
        category_id: Some(2),
        flag_count: 0,
        prayer_count: 4,
        is_public: true,
        is_anonymous: false,
        is_active: true,
    }
}

/// Rich's private request with no campus.
pub fn private_prayer() -> PrayerRequestRow {
    PrayerRequestRow {
        id: 2,
        first_name: Some("Rich".into()),
        last_name: Some("Dubee".into()),
        text: "Help me".into(),
        answer: None,
        requested_by_person_alias_id: Some(RICH_ALIAS),
        entered_date_time: entered_at(),
        campus_id: None,
        category_id: None,
        flag_count: 1,
        prayer_count: 0,
        is_public: false,
        is_anonymous: false,
        is_active: true,
    }
}

/// Rich's public request submitted anonymously.
pub fn anonymous_prayer() -> PrayerRequestRow {
    PrayerRequestRow {
        id: 3,
        text: "Please pray for my family.".into(),
        entered_date_time: entered_at() + Duration::days(1),
        campus_id: Some(16),
        category_id: Some(2),
        flag_count: 0,
        prayer_count: 2,
        is_public: true,
        is_anonymous: true,
        ..private_prayer()
    }
}

pub fn seeded_store() -> MemoryStore {
    MemoryStore::new()
        .with_campus(CampusRow {
            id: 16,
            name: "Rock Campus".into(),
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
        .with_person(person(ISAAC, ISAAC_ALIAS, "Isaac", "Hardy", Some(16)))
        .with_person(person(RICH, RICH_ALIAS, "Rich", "Dubee", None))
        .with_person(person(MODERATOR, 447219, "Mo", "Derator", Some(16)))
        .with_group_member(7, ISAAC)
        .with_group_member(7, RICH)
        .with_prayers([rock_prayer(), private_prayer(), anonymous_prayer()])
}

pub fn config_with(extra: &[(&str, &str)]) -> AppConfig {
    let extra: Vec<(String, String)> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(move |key| match key {
        "JWT_SECRET" => Some("test-jwt-secret".into()),
        "NODE_ID_SECRET" => Some("test-node-ids".into()),
        _ => extra.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone()),
    })
    .expect("Failed to build test config")
}

/// Memory-backed state over the fixtures above. The store handle shares the
/// state's data, so tests can inspect writes made through the schema.
pub fn setup_test_state() -> (MemoryStore, AppState) {
    setup_test_state_with(config_with(&[]))
}

pub fn setup_test_state_with(config: AppConfig) -> (MemoryStore, AppState) {
    let store = seeded_store();
    let state = AppState::new(DataSources::memory(store.clone()), config);
    (store, state)
}

pub fn claims_for(person_id: i64, role: &str) -> Claims {
    Claims::new(person_id, role.to_string(), 15)
}

pub fn prayer_node_id(state: &AppState, id: i64) -> String {
    state.node_ids().encode(PRAYER_TYPE, id)
}

/// Connect to `TEST_DATABASE_URL` and run the migrations. Returns `None`
/// when the variable is unset so database tests skip on machines without
/// Postgres.
#[allow(dead_code)]
pub async fn setup_test_db() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Helper function to execute GraphQL queries and mutations
pub async fn execute_graphql(
    schema: &PrayerSchema,
    query: &str,
    variables: Option<Variables>,
    auth_claims: Option<Claims>,
) -> async_graphql::Response {
    let mut request = Request::new(query).data(ViewerCache::default());

    if let Some(vars) = variables {
        request = request.variables(vars);
    }

    if let Some(claims) = auth_claims {
        request = request.data(claims);
    }

    schema.execute(request).await
}

/// The `code` extension of the first error, if any.
#[allow(dead_code)]
pub fn error_code(response: &async_graphql::Response) -> Option<String> {
    let json = serde_json::to_value(response).ok()?;
    json["errors"][0]["extensions"]["code"]
        .as_str()
        .map(str::to_string)
}
