//! WebSocket Handler
//!
//! `/ws/events` 推送调用方自己的章节生成事件

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::infrastructure::http::auth::Caller;
use crate::infrastructure::http::state::AppState;

/// 事件 WebSocket 连接处理，握手前完成身份校验
pub async fn events_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_events_socket(socket, user.id, state))
}

async fn handle_events_socket(socket: WebSocket, owner_id: Uuid, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut event_rx = state.event_publisher.subscribe(owner_id);

    tracing::info!(owner_id = %owner_id, "Events WebSocket connected");

    // 事件转发任务
    let mut forward_task = tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(owner_id = %owner_id, skipped, "WebSocket subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let msg = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize event");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(owner_id = %owner_id, error = %e, "Failed to send WebSocket message");
                break;
            }
        }
    });

    // 接收客户端消息（心跳）
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!(owner_id = %owner_id, "Events WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(owner_id = %owner_id, error = %e, "Events WebSocket error");
                    break;
                }
                // ping 由 axum 自动回复 pong
                _ => {}
            }
        }
    });

    // 任一任务结束后停止另一个，确保订阅者已释放再回收通道
    tokio::select! {
        _ = &mut forward_task => {
            receive_task.abort();
            let _ = receive_task.await;
        }
        _ = &mut receive_task => {
            forward_task.abort();
            let _ = forward_task.await;
        }
    }

    state.event_publisher.release(owner_id);
    tracing::info!(owner_id = %owner_id, "Events WebSocket disconnected");
}
