// Each domain contains: mod.rs, resolvers.rs, types.rs

pub mod campuses;
pub mod people;
pub mod prayers;
