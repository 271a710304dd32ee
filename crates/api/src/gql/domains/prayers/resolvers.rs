use async_graphql::connection::{Connection, Edge};
use async_graphql::{Context, ErrorExtensions, Object, Result, ID};
use base64::{engine::general_purpose, Engine as _};
use infra::models::PrayerRequestRow;
use infra::pagination::LimitOffset;

use super::error::PrayerError;
use super::policy::Viewer;
use super::service::{self, FeedKind, NewPrayer};
use super::types::{Prayer, PrayerAction, PrayerCategory, PRAYER_TYPE};
use crate::auth::current_viewer;
use crate::state::AppState;

fn prayer_id(state: &AppState, id: &ID) -> Result<i64, PrayerError> {
    match state.node_ids().decode(PRAYER_TYPE, id.as_str()) {
        Ok(record_id) => Ok(record_id),
        Err(e) => id.as_str().parse::<i64>().map_err(|_| PrayerError::from(e)),
    }
}

/// Node ids only; bare integers are accepted by `prayer(id)` alone.
fn prayer_node_id(state: &AppState, id: &ID) -> Result<i64, PrayerError> {
    Ok(state.node_ids().decode(PRAYER_TYPE, id.as_str())?)
}

fn encode_cursor(offset: usize) -> String {
    general_purpose::STANDARD.encode(offset.to_string())
}

fn decode_cursor(cursor: &str) -> Result<i64, PrayerError> {
    general_purpose::STANDARD
        .decode(cursor)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|offset| *offset >= 0)
        .ok_or_else(|| PrayerError::Validation(format!("Invalid cursor: {cursor}")))
}

/// Offset of the first item after `cursor`, or 0 without one.
fn offset_after(cursor: Option<&str>) -> Result<i64, PrayerError> {
    let Some(cursor) = cursor else {
        return Ok(0);
    };
    decode_cursor(cursor)?
        .checked_add(1)
        .ok_or_else(|| PrayerError::Validation(format!("Invalid cursor: {cursor}")))
}

fn project_all(rows: Vec<PrayerRequestRow>, viewer: &Viewer, state: &AppState) -> Vec<Prayer> {
    rows.iter()
        .map(|row| Prayer::project(row, viewer, state))
        .collect()
}

async fn feed(ctx: &Context<'_>, kind: FeedKind) -> Result<Vec<Prayer>> {
    let state = ctx.data::<AppState>()?;
    let viewer = current_viewer(ctx).await?;
    let rows = service::load_feed(&state.sources, &viewer, kind)
        .await
        .map_err(|e| e.extend())?;
    Ok(project_all(rows, &viewer, state))
}

#[derive(Default)]
pub struct PrayerQuery;

#[Object]
impl PrayerQuery {
    /// A single prayer request by node id (or bare record id).
    async fn prayer(&self, ctx: &Context<'_>, id: ID) -> Result<Prayer> {
        let state = ctx.data::<AppState>()?;
        let viewer = current_viewer(ctx).await?;
        let record_id = prayer_id(state, &id).map_err(|e| e.extend())?;

        let row = service::get_prayer(&state.sources, &viewer, record_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(Prayer::project(&row, &viewer, state))
    }

    /// Public feed as a Relay connection. Cursors are opaque offsets.
    async fn prayer_feed(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<Connection<String, Prayer>> {
        let state = ctx.data::<AppState>()?;
        let viewer = current_viewer(ctx).await?;

        let offset = offset_after(after.as_deref()).map_err(|e| e.extend())?;
        let page = LimitOffset::new(first.map(i64::from), Some(offset));

        let rows = service::load_feed(&state.sources, &viewer, FeedKind::Public)
            .await
            .map_err(|e| e.extend())?;
        let window = page.slice(&rows);
        let start = page.offset as usize;

        let has_previous = start > 0 && !rows.is_empty();
        let has_next = start + window.len() < rows.len();
        let mut connection = Connection::new(has_previous, has_next);
        connection.edges.extend(window.iter().enumerate().map(|(i, row)| {
            Edge::new(
                encode_cursor(start + i),
                Prayer::project(row, &viewer, state),
            )
        }));
        Ok(connection)
    }

    /// Every public, active prayer request.
    async fn prayers(&self, ctx: &Context<'_>) -> Result<Vec<Prayer>> {
        feed(ctx, FeedKind::Public).await
    }

    /// Public requests from the viewer's campus.
    async fn campus_prayers(&self, ctx: &Context<'_>) -> Result<Vec<Prayer>> {
        feed(ctx, FeedKind::Campus).await
    }

    /// The viewer's own requests, private ones included.
    async fn user_prayers(&self, ctx: &Context<'_>) -> Result<Vec<Prayer>> {
        feed(ctx, FeedKind::User).await
    }

    /// Public requests from people sharing a group with the viewer.
    async fn group_prayers(&self, ctx: &Context<'_>) -> Result<Vec<Prayer>> {
        feed(ctx, FeedKind::Group).await
    }

    async fn saved_prayers(&self, ctx: &Context<'_>) -> Result<Vec<Prayer>> {
        feed(ctx, FeedKind::Saved).await
    }

    async fn prayer_categories(&self, ctx: &Context<'_>) -> Result<Vec<PrayerCategory>> {
        let state = ctx.data::<AppState>()?;
        let rows = state
            .sources
            .categories
            .list()
            .await
            .map_err(|e| PrayerError::from(e).extend())?;
        Ok(rows.into_iter().map(PrayerCategory::from).collect())
    }
}

#[derive(Default)]
pub struct PrayerMutation;

impl PrayerMutation {
    async fn dispatch(
        &self,
        ctx: &Context<'_>,
        id: &ID,
        action: PrayerAction,
    ) -> Result<Prayer> {
        let state = ctx.data::<AppState>()?;
        let viewer = current_viewer(ctx).await?;
        let record_id = prayer_node_id(state, id).map_err(|e| e.extend())?;

        let row = service::interact(
            &state.sources,
            state.prayer_settings(),
            &viewer,
            record_id,
            action,
        )
        .await
        .map_err(|e| e.extend())?;
        Ok(Prayer::project(&row, &viewer, state))
    }
}

#[Object]
impl PrayerMutation {
    async fn add_prayer(
        &self,
        ctx: &Context<'_>,
        text: String,
        #[graphql(default = false)] is_anonymous: bool,
        category_id: Option<ID>,
        is_public: Option<bool>,
    ) -> Result<Prayer> {
        let state = ctx.data::<AppState>()?;
        let viewer = current_viewer(ctx).await?;

        let category_id = category_id
            .map(|id| {
                id.parse::<i64>().map_err(|_| {
                    PrayerError::Validation(format!("Invalid category id: {}", id.as_str()))
                })
            })
            .transpose()
            .map_err(|e| e.extend())?;

        let row = service::add_prayer(
            &state.sources,
            &viewer,
            NewPrayer {
                text,
                is_anonymous,
                is_public,
                category_id,
            },
        )
        .await
        .map_err(|e| e.extend())?;
        Ok(Prayer::project(&row, &viewer, state))
    }

    async fn answer_prayer(&self, ctx: &Context<'_>, id: ID, answer: String) -> Result<Prayer> {
        let state = ctx.data::<AppState>()?;
        let viewer = current_viewer(ctx).await?;
        let record_id = prayer_node_id(state, &id).map_err(|e| e.extend())?;

        let row = service::answer(&state.sources, &viewer, record_id, &answer)
            .await
            .map_err(|e| e.extend())?;
        Ok(Prayer::project(&row, &viewer, state))
    }

    async fn interact_with_prayer(
        &self,
        ctx: &Context<'_>,
        id: ID,
        action: PrayerAction,
    ) -> Result<Prayer> {
        self.dispatch(ctx, &id, action).await
    }

    #[graphql(deprecation = "Use interactWithPrayer with action DELETE")]
    async fn delete_prayer(&self, ctx: &Context<'_>, node_id: ID) -> Result<Prayer> {
        self.dispatch(ctx, &node_id, PrayerAction::Delete).await
    }

    #[graphql(deprecation = "Use interactWithPrayer with action FLAG")]
    async fn flag_prayer(&self, ctx: &Context<'_>, node_id: ID) -> Result<Prayer> {
        self.dispatch(ctx, &node_id, PrayerAction::Flag).await
    }

    #[graphql(deprecation = "Use interactWithPrayer with action SAVE")]
    async fn save_prayer(&self, ctx: &Context<'_>, node_id: ID) -> Result<Prayer> {
        self.dispatch(ctx, &node_id, PrayerAction::Save).await
    }

    #[graphql(deprecation = "Use interactWithPrayer with action UNSAVE")]
    async fn un_save_prayer(&self, ctx: &Context<'_>, node_id: ID) -> Result<Prayer> {
        self.dispatch(ctx, &node_id, PrayerAction::Unsave).await
    }

    #[graphql(deprecation = "Use interactWithPrayer with action INCREMENT")]
    async fn increment_prayer_count(&self, ctx: &Context<'_>, node_id: ID) -> Result<Prayer> {
        self.dispatch(ctx, &node_id, PrayerAction::Increment).await
    }
}
