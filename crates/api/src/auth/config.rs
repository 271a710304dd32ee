use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_expiration_minutes: u64,
}

impl AuthConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            jwt_secret: lookup("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_token_expiration_minutes: lookup("ACCESS_TOKEN_EXPIRATION_MINUTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(15),
        })
    }
}
