//! Transport adapters: the JSON HTTP API and the WebSocket channel.

pub mod http;
pub mod ws;
