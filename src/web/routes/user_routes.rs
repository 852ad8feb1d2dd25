use axum::{Json, Router, body::Bytes, extract::State, routing::get};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::models::{NewUser, UserWithTagLinks};
use crate::services::user_service;
use crate::web::validation::{FieldKind, FieldRule, RequestSchema, Schema, decode_request};
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl RequestSchema for CreateUserRequest {
    const SCHEMA: Schema = Schema {
        fields: &[
            FieldRule::required("name", FieldKind::Text),
            FieldRule::required("email", FieldKind::Text),
        ],
    };
    const DECODE_MESSAGE: &'static str = "Can't parse the body";
    const VALIDATION_MESSAGE: &'static str = "validation failed";
}

pub fn create_user_router() -> Router<Arc<AppState>> {
    Router::new().route("/users", get(list_users).post(create_user))
}

async fn list_users(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserWithTagLinks>>, AppError> {
    let users = user_service::list_users(app_state.store.as_ref()).await?;
    Ok(Json(users))
}

// Responds with an acknowledgement only, never the created record.
async fn create_user(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let payload: CreateUserRequest = decode_request(app_state.validator.as_ref(), &body)?;
    user_service::register_user(
        app_state.store.as_ref(),
        NewUser {
            name: payload.name,
            email: payload.email,
        },
    )
    .await?;

    Ok(Json(serde_json::json!({ "message": "Success" })))
}
