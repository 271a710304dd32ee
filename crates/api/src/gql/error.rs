use std::sync::Arc;

use infra::sources::SourceError;

/// Error type for collaborator failures reaching a resolver.
///
/// async-graphql has a blanket `impl<T: Display + Send + Sync + 'static> From<T> for Error`,
/// so any type implementing `Display` auto-converts via `?`. The detail is
/// logged server-side and clients only see a sanitized message.
#[derive(Debug)]
pub struct GqlError(Arc<SourceError>);

impl std::fmt::Display for GqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        tracing::error!("Data source error: {:?}", self.0);
        write!(f, "Internal data source error")
    }
}

impl std::error::Error for GqlError {}

impl From<SourceError> for GqlError {
    fn from(e: SourceError) -> Self {
        GqlError(Arc::new(e))
    }
}

// Data loaders share one error value across every waiting key.
impl From<Arc<SourceError>> for GqlError {
    fn from(e: Arc<SourceError>) -> Self {
        GqlError(e)
    }
}
