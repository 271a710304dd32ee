use async_graphql::MergedObject;

use crate::gql::domains::people::PersonQuery;
use crate::gql::domains::prayers::PrayerQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(PersonQuery, PrayerQuery);
