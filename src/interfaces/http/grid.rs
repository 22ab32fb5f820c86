use std::time::Instant;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    domain::grid::{GridData, Letter},
    error::{AppError, Result},
    state::AppState,
};

pub const INVALID_BIAS: &str = "Invalid bias";

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub bias: Option<String>,
}

impl GridQuery {
    /// An absent or empty `bias` means an unbiased request.
    fn bias(&self) -> Result<Option<Letter>> {
        match self.bias.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => Letter::parse(raw)
                .map(Some)
                .ok_or_else(|| AppError::Validation(vec![INVALID_BIAS.to_string()])),
        }
    }
}

pub async fn grid_handler(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> Result<Json<GridData>> {
    let bias = query.bias()?;
    Ok(Json(state.generator.request(bias, Instant::now())?))
}
