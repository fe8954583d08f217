use crate::models::{Category, CategoryKind};
use crate::service::{CategoryError, CategoryService};
use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use common::AppState;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            CategoryError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            CategoryError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            CategoryError::NotFound => (StatusCode::NOT_FOUND, "Category not found".to_string()),
            CategoryError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

#[derive(Template)]
#[template(path = "manage_categories.html")]
pub struct ManageCategoriesTemplate {
    pub categories: Vec<CategoryRowView>,
}

pub struct CategoryRowView {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub is_income: bool,
}

impl From<Category> for CategoryRowView {
    fn from(c: Category) -> Self {
        CategoryRowView {
            id: c.id,
            name: c.name,
            color: c.color,
            icon: c.icon.unwrap_or_default(),
            is_income: c.kind.is_income(),
        }
    }
}

pub fn categories_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(manage_categories_view).post(create_category))
        .route("/api", get(list_categories_api))
        .route("/{id}", axum::routing::delete(delete_category))
        .with_state(state)
}

pub fn budgets_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(set_budget))
        .with_state(state)
}

async fn manage_categories_view(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, CategoryError> {
    let categories = CategoryService::list_categories(&state.db)
        .await?
        .into_iter()
        .map(CategoryRowView::from)
        .collect();

    let template = ManageCategoriesTemplate { categories };
    Ok(Html(template.render().map_err(|e| {
        CategoryError::Infrastructure(e.to_string())
    })?))
}

async fn list_categories_api(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, CategoryError> {
    let categories = CategoryService::list_categories(&state.db).await?;
    Ok(Json(categories))
}

#[derive(Deserialize)]
pub struct CreateCategoryForm {
    pub name: String,
    pub icon: Option<String>,
    pub kind: Option<CategoryKind>,
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<CreateCategoryForm>,
) -> Result<impl IntoResponse, CategoryError> {
    let icon = payload
        .icon
        .and_then(|i| {
            let i = i.trim().to_string();
            if i.is_empty() { None } else { Some(i) }
        });

    CategoryService::create_category(&state.db, payload.name, icon, payload.kind).await?;

    Ok(Redirect::to("/categories"))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, CategoryError> {
    CategoryService::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct SetBudgetForm {
    pub category_id: i64,
    pub amount_dollars: f64,
    pub month: u32,
    pub year: i32,
}

async fn set_budget(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<SetBudgetForm>,
) -> Result<impl IntoResponse, CategoryError> {
    CategoryService::set_budget(
        &state.db,
        payload.category_id,
        payload.amount_dollars,
        payload.month,
        payload.year,
    )
    .await
    .map_err(|e| {
        tracing::error!("set_budget error: {:?}", e);
        e
    })?;

    Ok(Redirect::to("/"))
}
