use std::env;

use anyhow::{Context, Result};

use crate::auth::AuthConfig;
use crate::gql::domains::prayers::PrayerAction;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Runtime switches for the prayer interaction handler.
#[derive(Clone, Debug, Default)]
pub struct PrayerSettings {
    pub disabled_actions: Vec<PrayerAction>,
}

impl PrayerSettings {
    pub fn allows(&self, action: PrayerAction) -> bool {
        !self.disabled_actions.contains(&action)
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// `None` selects the in-memory backend.
    pub database: Option<DatabaseConfig>,
    pub skip_migrations: bool,
    pub gql_introspection: bool,
    pub allowed_origins: Vec<String>,
    pub node_id_secret: String,
    pub prayer: PrayerSettings,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("invalid PORT: {raw}"))?,
            None => 8080,
        };

        let database = lookup("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        });

        let disabled_actions = lookup("PRAYER_DISABLED_ACTIONS")
            .map(|raw| parse_action_list(&raw))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            port,
            database,
            skip_migrations: flag(lookup("SKIP_MIGRATIONS")),
            gql_introspection: flag(lookup("GQL_INTROSPECTION")),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            node_id_secret: lookup("NODE_ID_SECRET")
                .unwrap_or_else(|| "prayer-node-ids".to_string()),
            prayer: PrayerSettings { disabled_actions },
            auth: AuthConfig::from_lookup(&lookup)?,
        })
    }
}

fn flag(value: Option<String>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn parse_action_list(raw: &str) -> Result<Vec<PrayerAction>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<PrayerAction>()
                .with_context(|| "invalid PRAYER_DISABLED_ACTIONS")
        })
        .collect()
}
