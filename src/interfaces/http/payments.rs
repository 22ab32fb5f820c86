use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    domain::payment::{INVALID_AMOUNT, INVALID_NAME, Payment, PaymentDraft, PaymentPatch},
    error::{AppError, Result},
    state::AppState,
};

/// Bodies that are not a JSON object (wrong content type, bad syntax, a bare
/// scalar) are reported like any other invalid payload.
type Body<T> = std::result::Result<Json<T>, JsonRejection>;

/// Ids that are not UUIDs can never match a stored payment.
fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::PaymentNotFound)
}

pub async fn list_payments(State(state): State<AppState>) -> Result<Json<Vec<Payment>>> {
    Ok(Json(state.payments.all().await?))
}

pub async fn create_payment(
    State(state): State<AppState>,
    body: Body<PaymentDraft>,
) -> Result<impl IntoResponse> {
    let draft = match body {
        Ok(Json(draft)) => draft,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable payment body");
            PaymentDraft::default()
        }
    };
    let payment = state.payments.create(draft.validate()?).await?;
    info!(payment = %payment.id, "payment created");

    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Payment>> {
    state
        .payments
        .get(parse_id(&id)?)
        .await?
        .map(Json)
        .ok_or(AppError::PaymentNotFound)
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body<PaymentPatch>,
) -> Result<Json<Payment>> {
    let id = parse_id(&id)?;
    let update = match body {
        Ok(Json(patch)) => patch.validate()?,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable payment update body");
            return Err(AppError::Validation(vec![
                INVALID_NAME.to_string(),
                INVALID_AMOUNT.to_string(),
            ]));
        }
    };

    state
        .payments
        .update(id, update)
        .await?
        .map(Json)
        .ok_or(AppError::PaymentNotFound)
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&id)?;

    if state.payments.delete(id).await? {
        info!(payment = %id, "payment deleted");
        Ok(Json(json!({ "success": true })))
    } else {
        Err(AppError::PaymentNotFound)
    }
}
