use std::time::Duration;

use axum::{
    Json, Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use crate::{interfaces::ws::ws_handler, state::AppState};

pub mod grid;
pub mod payments;

use grid::grid_handler;
use payments::{create_payment, delete_payment, get_payment, list_payments, update_payment};

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(hello_handler))
        .route("/grid", get(grid_handler))
        .route("/payments", get(list_payments).post(create_payment))
        .route(
            "/payments/{id}",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

async fn hello_handler() -> Json<Value> {
    Json(json!({ "message": "Hello from the backend!" }))
}
