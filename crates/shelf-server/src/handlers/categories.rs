//! Category and item listing handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{AppError, AppState};
use shelf_core::models::{Category, Item};

/// GET /api/categories - Categories owned by the configured user
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.db.list_owned_categories(state.owner())?))
}

/// GET /api/categories/templates
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.db.list_templates()?))
}

/// GET /api/categories/:id/items - Items in an owned category, newest first
pub async fn list_category_items(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Item>>, AppError> {
    state
        .db
        .get_category(id)?
        .filter(|c| c.owner == state.owner() && !c.is_template)
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(Json(state.db.list_items(id)?))
}
