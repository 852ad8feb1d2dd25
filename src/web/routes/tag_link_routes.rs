use axum::{Json, Router, body::Bytes, extract::State, routing::{get, post}};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::models::{NewTagLink, TagLink, TagLinkWithSlots};
use crate::services::tag_link_service;
use crate::web::validation::{FieldKind, FieldRule, RequestSchema, Schema, decode_request};
use crate::web::{AppError, AppState};

// --- Request Structs ---

#[derive(Deserialize)]
pub struct CreateTagLinkRequest {
    pub user_id: i32,
    pub tag_id: String,
}

impl RequestSchema for CreateTagLinkRequest {
    const SCHEMA: Schema = Schema {
        fields: &[
            FieldRule::required("user_id", FieldKind::Integer),
            FieldRule::required("tag_id", FieldKind::Text),
        ],
    };
}

#[derive(Deserialize)]
pub struct SetActiveSlotRequest {
    pub tag_link_id: i32,
    pub slot_id: i32,
}

impl RequestSchema for SetActiveSlotRequest {
    const SCHEMA: Schema = Schema {
        fields: &[
            FieldRule::required("tag_link_id", FieldKind::Integer),
            FieldRule::required("slot_id", FieldKind::Integer),
        ],
    };
}

// --- Route Handlers ---

async fn create_tag_link(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TagLink>, AppError> {
    let payload: CreateTagLinkRequest = decode_request(app_state.validator.as_ref(), &body)?;
    let tag_link = tag_link_service::claim_tag(
        app_state.store.as_ref(),
        NewTagLink {
            user_id: payload.user_id,
            tag_id: payload.tag_id,
        },
    )
    .await?;
    Ok(Json(tag_link))
}

async fn list_tag_links(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TagLinkWithSlots>>, AppError> {
    let tag_links = tag_link_service::list_tag_links(app_state.store.as_ref()).await?;
    Ok(Json(tag_links))
}

async fn set_active_slot(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TagLinkWithSlots>, AppError> {
    let payload: SetActiveSlotRequest = decode_request(app_state.validator.as_ref(), &body)?;
    let tag_link = tag_link_service::set_active_slot(
        app_state.store.as_ref(),
        payload.tag_link_id,
        payload.slot_id,
    )
    .await?;
    Ok(Json(tag_link))
}

// --- Router ---

pub fn create_tag_link_router() -> Router<Arc<AppState>> {
    Router::new().route("/taglinks", get(list_tag_links).post(create_tag_link))
}

pub fn create_active_slot_router() -> Router<Arc<AppState>> {
    Router::new().route("/set-active-slot", post(set_active_slot))
}
