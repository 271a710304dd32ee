pub mod db;
pub mod models;
pub mod pagination;
pub mod repos;
pub mod sources;
