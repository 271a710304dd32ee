use async_graphql::{Context, ErrorExtensions, Result};
use tokio::sync::OnceCell;

use crate::auth::Claims;
use crate::gql::common::types::Role;
use crate::gql::domains::prayers::policy::Viewer;
use crate::gql::domains::prayers::PrayerError;
use crate::gql::error::GqlError;
use crate::state::AppState;

/// Per-request slot holding the resolved viewer. Insert a fresh one into
/// every GraphQL request so the person lookup runs once per request.
#[derive(Default)]
pub struct ViewerCache(OnceCell<Viewer>);

/// Resolve the viewer for the current request.
///
/// Requests without claims get an anonymous viewer. A token naming a person
/// the data source does not know is rejected.
pub async fn current_viewer(ctx: &Context<'_>) -> Result<Viewer> {
    match ctx.data_opt::<ViewerCache>() {
        Some(cache) => cache.0.get_or_try_init(|| load_viewer(ctx)).await.cloned(),
        None => load_viewer(ctx).await,
    }
}

async fn load_viewer(ctx: &Context<'_>) -> Result<Viewer> {
    let Ok(claims) = ctx.data::<Claims>() else {
        return Ok(Viewer::anonymous());
    };

    let person_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| PrayerError::Unauthorized("Invalid person id in token".into()).extend())?;

    let state = ctx.data::<AppState>()?;
    let person = state
        .sources
        .people
        .get_by_id(person_id)
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| PrayerError::Unauthorized("Unknown person".into()).extend())?;

    Ok(Viewer::new(person, Role::from(claims.role.clone())))
}
