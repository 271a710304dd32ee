use async_graphql::{Context, Object, Result};

use super::types::Person;
use crate::auth::current_viewer;
use crate::state::AppState;

#[derive(Default)]
pub struct PersonQuery;

#[Object]
impl PersonQuery {
    /// The signed-in person, or null for anonymous requests.
    async fn current_person(&self, ctx: &Context<'_>) -> Result<Option<Person>> {
        let state = ctx.data::<AppState>()?;
        let viewer = current_viewer(ctx).await?;
        Ok(viewer.person.map(|row| Person::from_row(row, state)))
    }
}
