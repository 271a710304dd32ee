pub mod config;
pub mod jwt;
pub mod permissions;

pub use config::AuthConfig;
pub use jwt::{Claims, JwtService};
pub use permissions::{current_viewer, ViewerCache};
