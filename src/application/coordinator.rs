use super::registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};
use crate::domain::events::{ClientCommand, ServerEvent};
use crate::domain::grid::{GridData, Letter};
use crate::domain::payment::{Payment, PaymentDraft};
use crate::domain::ports::PaymentStoreRef;
use crate::error::{AppError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Routes real-time commands to the grid engine and payment store and fans
/// the results out through the connection registry.
///
/// Grid generation on this path is never rate limited.
#[derive(Clone)]
pub struct SessionCoordinator {
    registry: Arc<ConnectionRegistry>,
    payments: PaymentStoreRef,
}

impl SessionCoordinator {
    pub fn new(registry: Arc<ConnectionRegistry>, payments: PaymentStoreRef) -> Self {
        Self { registry, payments }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Registers a new connection. It stays connected until the returned
    /// [`Session`] is dropped.
    pub fn open_session(&self, handle: ConnectionHandle) -> Session {
        let id = self.registry.register(handle);
        info!(connection = id, clients = self.registry.len(), "client connected");
        Session {
            id,
            coordinator: self.clone(),
        }
    }

    pub async fn handle_command(&self, origin: ConnectionId, command: ClientCommand) -> Result<()> {
        match command {
            ClientCommand::StartGenerator { bias } => {
                self.start_generator(bias)?;
            }
            ClientCommand::AddPayment(draft) => {
                self.add_payment(draft).await?;
            }
            ClientCommand::GetPayments => self.list_payments(origin).await?,
        }
        Ok(())
    }

    /// Generates a grid and broadcasts it as `GRID_UPDATE`.
    pub fn start_generator(&self, bias: Option<Letter>) -> Result<GridData> {
        let data = GridData::generate(bias);
        let message = ServerEvent::GridUpdate(data.clone()).to_json()?;
        let delivered = self.registry.broadcast(&message);
        debug!(delivered, code = %data.code, "grid update broadcast");
        Ok(data)
    }

    /// Validates and stores a payment, then broadcasts it as `PAYMENT_ADDED`.
    pub async fn add_payment(&self, draft: PaymentDraft) -> Result<Payment> {
        let payment = self.payments.create(draft.validate()?).await?;
        info!(payment = %payment.id, "payment added");

        self.registry
            .broadcast(&ServerEvent::PaymentAdded(payment.clone()).to_json()?);
        Ok(payment)
    }

    /// Sends the current payment list to `origin` only.
    pub async fn list_payments(&self, origin: ConnectionId) -> Result<()> {
        let payments = self.payments.all().await?;
        let message = ServerEvent::PaymentsList(payments).to_json()?;
        if !self.registry.send_to(origin, &message) {
            debug!(connection = origin, "requester gone before payments list");
        }
        Ok(())
    }
}

/// One connected client. Dropping it moves the connection to the terminal
/// disconnected state.
pub struct Session {
    id: ConnectionId,
    coordinator: SessionCoordinator,
}

impl Session {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Handles one text frame. Nothing is sent back on failure.
    pub async fn handle_text(&self, text: &str) {
        let command = match ClientCommand::parse(text) {
            Ok(Some(command)) => command,
            Ok(None) => {
                debug!(connection = self.id, "ignoring unknown command");
                return;
            }
            Err(e) => {
                debug!(connection = self.id, error = %e, "ignoring malformed message");
                return;
            }
        };

        match self.coordinator.handle_command(self.id, command).await {
            Ok(()) => {}
            Err(AppError::Validation(errors)) => {
                warn!(connection = self.id, ?errors, "rejected payment");
            }
            Err(e) => warn!(connection = self.id, error = %e, "command failed"),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.coordinator.registry.unregister(self.id);
        info!(connection = self.id, "client disconnected");
    }
}
