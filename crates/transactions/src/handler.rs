use crate::models::{Transaction, TransactionKind};
use crate::service::{TransactionError, TransactionService};
use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, post},
};
use categories::models::DEFAULT_COLOR;
use common::AppState;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for TransactionError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            TransactionError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            TransactionError::NotFound => {
                (StatusCode::NOT_FOUND, "Transaction not found".to_string())
            }
            TransactionError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

#[derive(Template)]
#[template(path = "transaction_row.html")]
pub struct TransactionRowTemplate {
    pub t: TransactionRowView,
}

pub struct TransactionRowView {
    pub id: i64,
    pub description: String,
    pub amount_dollars: String,
    pub date: String,
    pub date_display: String,
    pub is_income: bool,
    pub kind: String,
    pub category_id: i64,
    pub category_name: String,
    pub category_color: String,
    pub category_icon: String,
}

impl From<&Transaction> for TransactionRowView {
    fn from(t: &Transaction) -> Self {
        let (category_name, category_color, category_icon) = match &t.category {
            Some(c) => (
                c.name.clone(),
                c.color.clone(),
                c.icon.clone().unwrap_or_default(),
            ),
            None => ("Uncategorized".to_string(), DEFAULT_COLOR.to_string(), String::new()),
        };

        TransactionRowView {
            id: t.id,
            description: t.description.clone(),
            amount_dollars: format!("{:.2}", t.amount.abs() as f64 / 100.0),
            date: t.date.format("%Y-%m-%d").to_string(),
            date_display: t.date.format("%e %b %Y").to_string(),
            is_income: t.kind.is_income(),
            kind: if t.kind.is_income() { "income" } else { "expense" }.to_string(),
            category_id: t.category_id.unwrap_or(0),
            category_name,
            category_color,
            category_icon,
        }
    }
}

#[derive(Deserialize)]
pub struct RawCreateTransactionRequest {
    pub amount_dollars: f64,
    pub description: String,
    pub date: String,
    pub kind: TransactionKind,
    pub category_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTransactionRequest {
    pub amount_dollars: f64,
    pub description: String,
    pub date: String,
    pub kind: TransactionKind,
    pub category_id: Option<i64>,
}

pub fn transactions_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_transaction))
        .route("/{id}", delete(delete_transaction).put(update_transaction))
        .with_state(state)
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<RawCreateTransactionRequest>,
) -> Result<impl IntoResponse, TransactionError> {
    // Empty select value means uncategorized.
    let category_id = payload
        .category_id
        .as_ref()
        .and_then(|s| if s.is_empty() { None } else { s.parse::<i64>().ok() });

    TransactionService::create_transaction(
        &state.db,
        payload.amount_dollars,
        payload.description,
        payload.date,
        payload.kind,
        category_id,
    )
    .await
    .map_err(|e| {
        tracing::error!("create_transaction error: {:?}", e);
        e
    })?;

    Ok(Redirect::to("/"))
}

async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> Result<impl IntoResponse, TransactionError> {
    let transaction = TransactionService::update_transaction(
        &state.db,
        id,
        payload.amount_dollars,
        payload.description,
        payload.date,
        payload.kind,
        payload.category_id,
    )
    .await?;

    let template = TransactionRowTemplate {
        t: TransactionRowView::from(&transaction),
    };
    Ok(Html(template.render().map_err(|e| {
        TransactionError::Infrastructure(e.to_string())
    })?))
}

async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TransactionError> {
    TransactionService::delete_transaction(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
