use axum::{
    extract::State,
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{error, instrument};

use crate::{
    auth::{
        dto::{LoginForm, MeResponse, RegisterRequest, TokenResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        services,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn sign(keys: &JwtKeys, username: &str) -> Result<Json<TokenResponse>, AppError> {
    let token = keys.issue_default(username).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e)
    })?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user =
        services::register(state.users.as_ref(), &payload.username, &payload.password).await?;
    sign(&state.keys, &user.username)
}

#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let user =
        services::authenticate(state.users.as_ref(), &form.username, &form.password).await?;
    sign(&state.keys, &user.username)
}

#[instrument]
pub async fn get_me(AuthUser(username): AuthUser) -> Json<MeResponse> {
    Json(MeResponse { username })
}
