use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    error::AppError,
    models::{Profile, UserRole},
    utils::{
        access::{Access, resolve_access},
        extractors::{bearer_token, extract_user_id},
        jwt::{self, Claims},
    },
};

/// Verifies the bearer token and rejects signed-out sessions.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Claims, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let token = bearer_token(auth_header)?;
    let claims = jwt::verify_token(&state.auth.jwt_secret, token)?;

    if state.sessions.is_revoked(&claims.jti)? {
        return Err(AppError::Unauthorized(
            "Session has been signed out".to_string(),
        ));
    }

    Ok(claims)
}

fn authorize(claims: &Claims, required: UserRole) -> Result<(), AppError> {
    let profile = Profile {
        id: extract_user_id(claims)?,
        name: claims.name.clone(),
        role: claims.role,
        class: None,
    };

    match resolve_access(Some(&profile), Some(required)) {
        Access::Granted => Ok(()),
        Access::Redirect(path) => Err(AppError::WrongRole(path)),
        Access::Login => Err(AppError::Unauthorized(
            "Authentication required".to_string(),
        )),
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = authenticate(&state, req.headers())?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

pub async fn admin_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = authenticate(&state, req.headers())?;
    authorize(&claims, UserRole::Admin)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

pub async fn user_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = authenticate(&state, req.headers())?;
    authorize(&claims, UserRole::User)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
