use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::{
    AppState,
    error::{AppError, Result},
    middleware::authenticate,
    models::{
        AuthResponse, LandingResponse, LoginRequest, Profile, RegisterRequest, SessionResponse,
        SessionUser, UserRole,
    },
    queries::user_queries,
    utils::{access::landing_path, extractors::extract_user_id, jwt, validation},
};

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    validate_registration(&payload)?;

    let role = payload.role.unwrap_or(UserRole::User);
    if role == UserRole::Admin && !state.auth.allow_admin_signup {
        return Err(AppError::Forbidden(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }

    let class = validation::normalize_optional(payload.class);
    validation::validate_class(class.as_deref())?;

    let email = payload.email.trim().to_lowercase();

    if user_queries::find_by_email(&state.db, &email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = user_queries::create_user(
        &state.db,
        &email,
        payload.name.trim(),
        &password_hash,
        role,
        class.as_deref(),
    )
    .await?;

    let token = jwt::generate_token(&state.auth, &user)?;

    tracing::info!("Registered {:?} account {}", user.role, user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            profile: Profile::from(&user),
        }),
    ))
}

fn validate_registration(payload: &RegisterRequest) -> Result<()> {
    validation::validate_email(&payload.email)?;
    validation::validate_name(&payload.name)?;
    validation::validate_password(&payload.password)?;
    Ok(())
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email = payload.email.trim().to_lowercase();

    let user = user_queries::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let is_valid = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = jwt::generate_token(&state.auth, &user)?;

    Ok(Json(AuthResponse {
        token,
        profile: Profile::from(&user),
    }))
}

/// Current account and profile. A token whose profile row is gone counts
/// as signed out.
pub async fn current_session(
    State(state): State<AppState>,
    Extension(claims): Extension<jwt::Claims>,
) -> Result<Json<SessionResponse>> {
    let user_id = extract_user_id(&claims)?;

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Profile not found".to_string()))?;

    Ok(Json(SessionResponse {
        user: SessionUser {
            id: user.id,
            email: user.email.clone(),
        },
        profile: Profile::from(&user),
    }))
}

pub async fn logout_user(
    State(state): State<AppState>,
    Extension(claims): Extension<jwt::Claims>,
) -> Result<StatusCode> {
    state.sessions.revoke(claims.jti, claims.exp)?;

    tracing::info!("Session {} signed out", claims.jti);

    Ok(StatusCode::NO_CONTENT)
}

/// Dashboard for the presented session. A valid token whose profile row is
/// gone lands on the login screen, same as `current_session` rejecting it.
pub async fn landing(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LandingResponse>> {
    let role = match authenticate(&state, &headers) {
        Ok(claims) => {
            let user_id = extract_user_id(&claims)?;
            user_queries::find_by_id(&state.db, user_id)
                .await?
                .map(|user| user.role)
        }
        Err(_) => None,
    };

    Ok(Json(LandingResponse {
        redirect: landing_path(role).to_string(),
    }))
}
