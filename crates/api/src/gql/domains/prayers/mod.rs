pub mod error;
pub mod policy;
pub mod resolvers;
pub mod service;
pub mod types;

pub use error::PrayerError;
pub use resolvers::{PrayerMutation, PrayerQuery};
pub use types::{Prayer, PrayerAction, PRAYER_TYPE};
