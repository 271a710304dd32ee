use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, Schema};

use super::loaders::{CampusLoader, PersonLoader, SavedLoader};
use super::{MutationRoot, QueryRoot};
use crate::state::AppState;

pub type PrayerSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema and inject shared state (AppState) into the context.
pub fn build_schema(state: AppState) -> PrayerSchema {
    let person_loader =
        DataLoader::new(PersonLoader::new(state.sources.people.clone()), tokio::spawn);
    let campus_loader =
        DataLoader::new(CampusLoader::new(state.sources.campuses.clone()), tokio::spawn);
    let saved_loader =
        DataLoader::new(SavedLoader::new(state.sources.followings.clone()), tokio::spawn);

    let introspection_enabled = state.config().gql_introspection;

    let mut builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(state) // resolvers read it via ctx.data::<AppState>()
    .data(person_loader)
    .data(campus_loader)
    .data(saved_loader)
    .limit_depth(10)
    .limit_complexity(200);

    if !introspection_enabled {
        builder = builder.disable_introspection();
    }

    builder.finish()
}
