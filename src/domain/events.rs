//! Messages exchanged over the real-time channel.
//!
//! Both directions use the `{ "type": ..., "payload": ... }` envelope.

use super::grid::{GridData, Letter};
use super::payment::{Payment, PaymentDraft};
use crate::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Commands a client may send.
#[derive(Debug, Clone)]
pub enum ClientCommand {
    StartGenerator { bias: Option<Letter> },
    AddPayment(PaymentDraft),
    GetPayments,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratorPayload {
    #[serde(default)]
    bias_char: Option<String>,
}

impl ClientCommand {
    /// Parses a text frame.
    ///
    /// Returns `Ok(None)` for a well-formed envelope with an unknown type, and
    /// `MalformedMessage` when the frame or a known payload cannot be decoded.
    pub fn parse(text: &str) -> Result<Option<Self>> {
        let envelope: Envelope = serde_json::from_str(text)
            .map_err(|e| AppError::MalformedMessage(e.to_string()))?;

        let command = match envelope.kind.as_str() {
            "START_GENERATOR" => {
                let payload: GeneratorPayload = decode_payload(envelope.payload)?;
                let bias = match payload.bias_char.as_deref() {
                    None | Some("") => None,
                    Some(raw) => Some(Letter::parse(raw).ok_or_else(|| {
                        AppError::MalformedMessage(format!("invalid bias letter: {raw:?}"))
                    })?),
                };
                ClientCommand::StartGenerator { bias }
            }
            "ADD_PAYMENT" => ClientCommand::AddPayment(decode_payload(envelope.payload)?),
            "GET_PAYMENTS" => ClientCommand::GetPayments,
            _ => return Ok(None),
        };

        Ok(Some(command))
    }
}

fn decode_payload<T: DeserializeOwned + Default>(payload: Value) -> Result<T> {
    if payload.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(payload).map_err(|e| AppError::MalformedMessage(e.to_string()))
}

/// Events the server pushes to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    GridUpdate(GridData),
    PaymentAdded(Payment),
    PaymentsList(Vec<Payment>),
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
