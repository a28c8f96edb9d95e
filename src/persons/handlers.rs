use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{AddPersonRequest, PersonResponse},
    repo_types::NewPerson,
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn person_routes() -> Router<AppState> {
    Router::new()
        .route("/add-person", post(add_person))
        .route("/get-person/:national_code", get(get_person))
}

#[instrument(skip(state, payload), fields(national_code = %payload.national_code))]
pub async fn add_person(
    State(state): State<AppState>,
    Json(payload): Json<AddPersonRequest>,
) -> Result<Json<PersonResponse>, AppError> {
    let person = state.persons.create(&NewPerson::from(payload)).await?;
    info!(person_id = %person.id, "person added");
    Ok(Json(person.into()))
}

#[instrument(skip(state))]
pub async fn get_person(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(national_code): Path<String>,
) -> Result<Json<PersonResponse>, AppError> {
    let person = state.persons.get_by_national_code(&national_code).await?;
    Ok(Json(person.into()))
}
