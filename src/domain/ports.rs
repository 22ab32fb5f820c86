use super::payment::{NewPayment, Payment, PaymentUpdate};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Ordered collection of payments keyed by id.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn create(&self, input: NewPayment) -> Result<Payment>;
    async fn all(&self) -> Result<Vec<Payment>>;
    async fn get(&self, id: Uuid) -> Result<Option<Payment>>;
    /// Returns the merged payment, or `None` if the id is unknown.
    async fn update(&self, id: Uuid, update: PaymentUpdate) -> Result<Option<Payment>>;
    /// Returns whether a payment was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub type PaymentStoreRef = Arc<dyn PaymentStore>;
