pub mod resolvers;
pub mod types;

pub use resolvers::PersonQuery;
pub use types::{Person, PERSON_TYPE};
