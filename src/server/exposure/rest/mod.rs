//! REST API exposure for the ledger
//!
//! Routes are nested under the owning user:
//!
//! - `GET    /health`
//! - `POST   /users/{user_id}/transactions`
//! - `GET    /users/{user_id}/transactions`
//! - `GET    /users/{user_id}/transactions/timeframe?start_date=&end_date=`
//! - `GET    /users/{user_id}/transactions/{id}`
//! - `PATCH  /users/{user_id}/transactions/{id}`
//! - `DELETE /users/{user_id}/transactions/{id}`
//!
//! Errors are rendered through [`LedgerError`]'s `IntoResponse`.

use crate::core::datetime::format_date_time;
use crate::core::{
    DateRange, LedgerError, NewTransaction, Transaction, TransactionPatch, TransactionService,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Transaction as rendered in JSON responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub name: String,
    pub cost: f64,
    /// `YYYY-MM-DDTHH:MM:SS`, UTC
    pub date: String,
}

impl From<Transaction> for TransactionView {
    fn from(tx: Transaction) -> Self {
        Self {
            date: format_date_time(&tx.date),
            id: tx.id,
            user_id: tx.user_id,
            category: tx.category,
            name: tx.name,
            cost: tx.cost,
        }
    }
}

/// Body of `POST /users/{user_id}/transactions`
#[derive(Debug, Deserialize)]
pub struct CreateTransactionBody {
    #[serde(default)]
    pub category: Option<String>,
    pub name: String,
    pub cost: f64,
    #[serde(default)]
    pub date: Option<String>,
}

/// Body of `PATCH /users/{user_id}/transactions/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionBody {
    pub category: Option<String>,
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router around a transaction service
    pub fn build_router(service: TransactionService) -> Router {
        let transaction_routes = Router::new()
            .route(
                "/users/{user_id}/transactions",
                get(list_transactions).post(create_transaction),
            )
            .route(
                "/users/{user_id}/transactions/timeframe",
                get(list_transactions_in_range),
            )
            .route(
                "/users/{user_id}/transactions/{id}",
                get(get_transaction)
                    .patch(update_transaction)
                    .delete(delete_transaction),
            )
            .with_state(service);

        Self::health_routes().merge(transaction_routes)
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "tx-ledger"
        }))
    }
}

async fn create_transaction(
    State(service): State<TransactionService>,
    Path(user_id): Path<String>,
    Json(body): Json<CreateTransactionBody>,
) -> Result<impl IntoResponse, LedgerError> {
    let input = NewTransaction {
        category: body.category.unwrap_or_default(),
        user_id,
        name: body.name,
        cost: body.cost,
        date: body.date,
    };

    let id = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn list_transactions(
    State(service): State<TransactionService>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<TransactionView>>, LedgerError> {
    let transactions = service.list(&user_id).await?;
    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

async fn list_transactions_in_range(
    State(service): State<TransactionService>,
    Path(user_id): Path<String>,
    Query(range): Query<DateRange>,
) -> Result<Json<Vec<TransactionView>>, LedgerError> {
    // `?start_date=` behaves like an absent bound
    let range = DateRange {
        start_date: range.start_date.filter(|s| !s.is_empty()),
        end_date: range.end_date.filter(|s| !s.is_empty()),
    };

    let transactions = service.list_in_range(&user_id, &range).await?;
    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

async fn get_transaction(
    State(service): State<TransactionService>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Json<TransactionView>, LedgerError> {
    match service.get(&id, &user_id).await? {
        Some(tx) => Ok(Json(tx.into())),
        None => Err(LedgerError::transaction_not_found(id, user_id)),
    }
}

async fn update_transaction(
    State(service): State<TransactionService>,
    Path((user_id, id)): Path<(String, String)>,
    Json(body): Json<UpdateTransactionBody>,
) -> Result<Json<TransactionView>, LedgerError> {
    let patch = TransactionPatch {
        id,
        user_id,
        category: body.category,
        name: body.name,
        cost: body.cost,
        date: body.date,
        time: body.time,
    };

    let updated = service.update(patch).await?;
    Ok(Json(updated.into()))
}

async fn delete_transaction(
    State(service): State<TransactionService>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<StatusCode, LedgerError> {
    service.delete(&user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
