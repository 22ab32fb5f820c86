#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use futures_util::{SinkExt, StreamExt};
use gridpay::config::ServerConfig;
use gridpay::interfaces::http::router;
use gridpay::state::{AppState, ServerContext};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tower::ServiceExt;

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A router backed by a fresh context.
pub fn app() -> Router {
    router(ServerContext::new(ServerConfig::ephemeral()))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    send_request(app, builder.body(body).unwrap()).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub fn flatten(grid: &Value) -> Vec<String> {
    grid.as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap().iter())
        .map(|cell| cell.as_str().unwrap().to_string())
        .collect()
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    stop: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<gridpay::error::Result<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = ServerContext::new(ServerConfig::ephemeral());
        let (stop, stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(gridpay::serve(listener, state.clone(), async move {
            let _ = stopped.await;
        }));

        Self {
            addr,
            state,
            stop: Some(stop),
            handle,
        }
    }

    /// Opens a WebSocket and waits until the server has registered it.
    pub async fn connect(&self) -> Client {
        let (mut ws, _) = connect_async(format!("ws://{}/ws", self.addr)).await.unwrap();
        send_json(&mut ws, serde_json::json!({"type": "GET_PAYMENTS", "payload": {}})).await;
        let reply = next_json(&mut ws).await;
        assert_eq!(reply["type"], "PAYMENTS_LIST");
        ws
    }

    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop")
            .unwrap()
            .unwrap();
    }
}

pub async fn send_json(ws: &mut Client, value: Value) {
    ws.send(Message::Text(value.to_string().into())).await.unwrap();
}

/// Next text frame as JSON, failing after five seconds.
pub async fn next_json(ws: &mut Client) -> Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Asserts that no text frame arrives within `wait`.
pub async fn assert_silent(ws: &mut Client, wait: Duration) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(wait, ws.next()).await {
        panic!("unexpected message: {text}");
    }
}

/// Polls until the registry holds `expected` connections.
pub async fn wait_for_clients(state: &AppState, expected: usize) {
    let registry = state.coordinator.registry();
    for _ in 0..100 {
        if registry.len() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("expected {expected} clients, found {}", registry.len());
}
