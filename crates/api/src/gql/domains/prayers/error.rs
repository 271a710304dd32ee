use async_graphql::{ErrorExtensions, FieldError};
use infra::sources::SourceError;
use thiserror::Error;

use crate::gql::node_id::NodeIdError;

#[derive(Debug, Error)]
pub enum PrayerError {
    #[error("Prayer request not found")]
    NotFound,

    #[error("Access denied: {0}")]
    Unauthorized(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal data source error")]
    Source(#[from] SourceError),
}

impl PrayerError {
    pub fn code(&self) -> &'static str {
        match self {
            PrayerError::NotFound => "NOT_FOUND",
            PrayerError::Unauthorized(_) => "UNAUTHORIZED",
            PrayerError::InvalidAction(_) => "INVALID_ACTION",
            PrayerError::Validation(_) => "VALIDATION_ERROR",
            PrayerError::Source(_) => "INTERNAL",
        }
    }
}

impl From<NodeIdError> for PrayerError {
    fn from(e: NodeIdError) -> Self {
        match e {
            // Well-formed but not an id we issued
            NodeIdError::Checksum => PrayerError::NotFound,
            other => PrayerError::Validation(format!("Invalid ID: {other}")),
        }
    }
}

impl ErrorExtensions for PrayerError {
    fn extend(&self) -> FieldError {
        if let PrayerError::Source(e) = self {
            tracing::error!("Data source error: {e:?}");
        }
        let code = self.code();
        FieldError::new(self.to_string()).extend_with(|_, ext| ext.set("code", code))
    }
}
