pub mod campuses;
pub mod followings;
pub mod groups;
pub mod people;
pub mod prayer_categories;
pub mod prayer_requests;

pub use campuses::CampusRepo;
pub use followings::FollowingRepo;
pub use groups::GroupRepo;
pub use people::PersonRepo;
pub use prayer_categories::PrayerCategoryRepo;
pub use prayer_requests::PrayerRequestRepo;
