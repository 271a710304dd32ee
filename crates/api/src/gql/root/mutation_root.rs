use async_graphql::MergedObject;

use crate::gql::domains::prayers::PrayerMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(PrayerMutation);
