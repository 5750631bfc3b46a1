use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    models::user::User,
    repositories::{auth as token_repo, user as user_repo},
    state::AppState,
    utils::jwt::{verify_access_token, Claims},
};

const UNAUTHENTICATED: &str = "Authentication credentials were not provided or are invalid";

/// Requires a valid, non-blacklisted bearer token for an existing user.
/// Inserts the [`User`] and its [`Claims`] into request extensions.
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (claims, user) = authenticate_request(request.headers(), &state).await?;
    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Auth + require the admin role.
pub async fn auth_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (claims, user) = authenticate_request(request.headers(), &state).await?;
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "You do not have permission to perform this action".into(),
        ));
    }
    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

async fn authenticate_request(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<(Claims, User), AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
        .ok_or_else(unauthorized)?;

    let claims = verify_access_token(token, &state.config.jwt_secret).map_err(|err| {
        tracing::debug!(error = %err, "access token rejected");
        unauthorized()
    })?;

    if token_repo::is_access_token_blacklisted(&state.pool, &claims.jti).await? {
        tracing::debug!(jti = %claims.jti, "blacklisted access token presented");
        return Err(unauthorized());
    }

    let user_id = claims.user_id().map_err(|_| unauthorized())?;
    let user = user_repo::find_user_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(unauthorized)?;

    Ok((claims, user))
}

fn unauthorized() -> AppError {
    AppError::Unauthorized(UNAUTHENTICATED.into())
}
