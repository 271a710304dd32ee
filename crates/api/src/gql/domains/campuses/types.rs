use async_graphql::{SimpleObject, ID};
use infra::models::CampusRow;

use crate::state::AppState;

pub const CAMPUS_TYPE: &str = "Campus";

#[derive(SimpleObject, Clone, Debug)]
pub struct Campus {
    pub id: ID,
    pub name: String,
}

impl Campus {
    pub fn from_row(row: CampusRow, state: &AppState) -> Self {
        Self {
            id: ID(state.node_ids().encode(CAMPUS_TYPE, row.id)),
            name: row.name,
        }
    }
}
