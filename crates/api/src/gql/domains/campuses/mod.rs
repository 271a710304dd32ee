pub mod types;

pub use types::{Campus, CAMPUS_TYPE};
