//! Per-connection task
//!
//! Runs after the WebSocket upgrade: a reader loop feeds text frames into
//! the shared handler and a writer task drains the connection's outbound
//! queue. Close and transport errors both end in the same `on_close`
//! teardown.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::Mutex;

use super::handler::ConnectionHandler;
use crate::board::now_ms;
use crate::error::Result;
use crate::session::{self, ConnectionId};

/// A single upgraded WebSocket connection
pub struct Connection<H: ConnectionHandler> {
    id: ConnectionId,
    handler: Arc<Mutex<H>>,
}

impl<H: ConnectionHandler> Connection<H> {
    /// Create a new connection
    pub fn new(id: ConnectionId, handler: Arc<Mutex<H>>) -> Self {
        Self { id, handler }
    }

    /// Run the connection to completion
    pub async fn run(self, socket: WebSocket) -> Result<()> {
        let (mut sink, mut stream) = socket.split();
        let (tx, mut rx) = session::channel();

        self.handler.lock().await.on_open(self.id, tx, now_ms());

        let id = self.id;
        let writer = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                if let Err(e) = sink.send(Message::Text(frame.as_str().to_owned())).await {
                    tracing::debug!(conn = id, error = %e, "Send failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let result = self.read_loop(&mut stream).await;

        // Same teardown for clean close and transport error
        self.handler.lock().await.on_close(self.id);
        writer.abort();

        result
    }

    async fn read_loop(&self, stream: &mut SplitStream<WebSocket>) -> Result<()> {
        while let Some(message) = stream.next().await {
            match message? {
                Message::Text(text) => {
                    let mut handler = self.handler.lock().await;
                    handler.on_frame(self.id, &text, now_ms());
                }
                Message::Binary(data) => {
                    let text = String::from_utf8_lossy(&data);
                    let mut handler = self.handler.lock().await;
                    handler.on_frame(self.id, &text, now_ms());
                }
                Message::Close(_) => break,
                // Pings are answered by the WebSocket layer
                _ => {}
            }
        }
        Ok(())
    }
}
