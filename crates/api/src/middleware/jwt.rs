use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Verify an optional bearer token and stash its claims in the request
/// extensions. Requests without a token pass through as anonymous viewers.
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).map(str::to_owned);
    if let Some(token) = token {
        let claims = state.jwt_service().verify_token(&token)?;
        tracing::debug!(person_id = %claims.sub, "authenticated request");
        request.extensions_mut().insert::<Claims>(claims);
    }

    Ok(next.run(request).await)
}
