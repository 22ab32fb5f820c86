use crate::domain::payment::{NewPayment, Payment, PaymentUpdate};
use crate::domain::ports::PaymentStore;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory payment store.
///
/// Payments are kept in insertion order in an `Arc<RwLock<Vec<Payment>>>`.
/// Contents live as long as the process.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<Vec<Payment>>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn create(&self, input: NewPayment) -> Result<Payment> {
        let payment = Payment::new(input);
        self.payments.write().await.push(payment.clone());
        Ok(payment)
    }

    async fn all(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: Uuid, update: PaymentUpdate) -> Result<Option<Payment>> {
        let mut payments = self.payments.write().await;
        Ok(payments.iter_mut().find(|p| p.id == id).map(|payment| {
            payment.apply(update);
            payment.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut payments = self.payments.write().await;
        let before = payments.len();
        payments.retain(|p| p.id != id);
        Ok(payments.len() < before)
    }
}
