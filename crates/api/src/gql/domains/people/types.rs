use async_graphql::{SimpleObject, ID};
use infra::models::PersonRow;

use crate::state::AppState;

pub const PERSON_TYPE: &str = "Person";

#[derive(SimpleObject, Clone, Debug)]
pub struct Person {
    pub id: ID,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl Person {
    pub fn from_row(row: PersonRow, state: &AppState) -> Self {
        Self {
            id: ID(state.node_ids().encode(PERSON_TYPE, row.id)),
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}
