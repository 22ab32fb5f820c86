use std::sync::Arc;

use crate::{
    application::{
        coordinator::SessionCoordinator, generator::GridGenerator, registry::ConnectionRegistry,
    },
    config::ServerConfig,
    domain::ports::PaymentStoreRef,
    infrastructure::in_memory::InMemoryPaymentStore,
};

/// Everything a running server shares between handlers.
///
/// Built once at startup and handed to the router; tests build a fresh one
/// each so rate-limit and connection state never leaks between them.
pub struct ServerContext {
    pub config: ServerConfig,
    pub generator: GridGenerator,
    pub payments: PaymentStoreRef,
    pub coordinator: SessionCoordinator,
}

pub type AppState = Arc<ServerContext>;

impl ServerContext {
    pub fn new(config: ServerConfig) -> AppState {
        Self::with_store(config, Arc::new(InMemoryPaymentStore::new()))
    }

    pub fn with_store(config: ServerConfig, payments: PaymentStoreRef) -> AppState {
        let registry = Arc::new(ConnectionRegistry::new());

        Arc::new(Self {
            generator: GridGenerator::new(config.bias_window),
            coordinator: SessionCoordinator::new(registry, payments.clone()),
            payments,
            config,
        })
    }

    /// Disconnects every live client.
    pub fn shutdown(&self) {
        self.coordinator.registry().close_all();
    }
}
