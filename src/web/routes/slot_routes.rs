use axum::{Json, Router, body::Bytes, extract::State, routing::get};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::models::{NewSlot, Slot};
use crate::services::slot_service;
use crate::web::validation::{FieldKind, FieldRule, RequestSchema, Schema, decode_request};
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct CreateSlotRequest {
    pub name: String,
    pub link: String,
    pub tag_link_id: i32,
}

impl RequestSchema for CreateSlotRequest {
    const SCHEMA: Schema = Schema {
        fields: &[
            FieldRule::required("name", FieldKind::Text),
            FieldRule::required("link", FieldKind::Text),
            FieldRule::required("tag_link_id", FieldKind::Integer),
        ],
    };
}

pub fn create_slot_router() -> Router<Arc<AppState>> {
    Router::new().route("/slots", get(list_slots).post(create_slot))
}

async fn create_slot(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Slot>, AppError> {
    let payload: CreateSlotRequest = decode_request(app_state.validator.as_ref(), &body)?;
    let slot = slot_service::create_slot(
        app_state.store.as_ref(),
        NewSlot {
            name: payload.name,
            link: payload.link,
            tag_link_id: payload.tag_link_id,
        },
    )
    .await?;
    Ok(Json(slot))
}

async fn list_slots(State(app_state): State<Arc<AppState>>) -> Result<Json<Vec<Slot>>, AppError> {
    let slots = slot_service::list_slots(app_state.store.as_ref()).await?;
    Ok(Json(slots))
}
