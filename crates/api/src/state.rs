use std::sync::Arc;

use infra::sources::DataSources;

use crate::auth::JwtService;
use crate::config::{AppConfig, PrayerSettings};
use crate::gql::node_id::NodeIdCodec;

#[derive(Clone)]
pub struct AppState {
    pub sources: DataSources,
    config: Arc<AppConfig>,
    jwt_service: JwtService,
    node_ids: NodeIdCodec,
}

impl AppState {
    pub fn new(sources: DataSources, config: AppConfig) -> Self {
        let jwt_service = JwtService::new(&config.auth);
        let node_ids = NodeIdCodec::new(&config.node_id_secret);

        Self {
            sources,
            config: Arc::new(config),
            jwt_service,
            node_ids,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn prayer_settings(&self) -> &PrayerSettings {
        &self.config.prayer
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn node_ids(&self) -> &NodeIdCodec {
        &self.node_ids
    }
}
