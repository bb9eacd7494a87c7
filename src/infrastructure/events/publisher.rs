//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现，按小说所有者划分广播通道

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 100;

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    /// 章节已被占用，开始生成
    ChapterGenerationStarted {
        chapter_id: Uuid,
        novel_id: Uuid,
        progress: u8,
    },
    /// 生成进度检查点
    ChapterGenerationProgress {
        chapter_id: Uuid,
        novel_id: Uuid,
        progress: u8,
    },
    /// 生成完成
    ChapterGenerationCompleted {
        chapter_id: Uuid,
        novel_id: Uuid,
        task_id: Uuid,
        content_chars: usize,
    },
    /// 生成失败
    ChapterGenerationFailed {
        chapter_id: Uuid,
        novel_id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        task_id: Option<Uuid>,
        error: String,
    },
}

/// 事件发布器
pub struct EventPublisher {
    /// owner_id -> broadcast sender
    owner_channels: DashMap<Uuid, broadcast::Sender<WsEvent>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            owner_channels: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅某个用户的事件，通道不存在时创建
    pub fn subscribe(&self, owner_id: Uuid) -> broadcast::Receiver<WsEvent> {
        self.owner_channels
            .entry(owner_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// 订阅者全部断开后回收通道
    pub fn release(&self, owner_id: Uuid) {
        self.owner_channels
            .remove_if(&owner_id, |_, sender| sender.receiver_count() == 0);
    }

    pub fn publish_generation_started(&self, owner_id: Uuid, chapter_id: Uuid, novel_id: Uuid, progress: u8) {
        self.publish_to_owner(
            owner_id,
            WsEvent::ChapterGenerationStarted {
                chapter_id,
                novel_id,
                progress,
            },
        );
    }

    pub fn publish_generation_progress(&self, owner_id: Uuid, chapter_id: Uuid, novel_id: Uuid, progress: u8) {
        self.publish_to_owner(
            owner_id,
            WsEvent::ChapterGenerationProgress {
                chapter_id,
                novel_id,
                progress,
            },
        );
    }

    pub fn publish_generation_completed(
        &self,
        owner_id: Uuid,
        chapter_id: Uuid,
        novel_id: Uuid,
        task_id: Uuid,
        content_chars: usize,
    ) {
        self.publish_to_owner(
            owner_id,
            WsEvent::ChapterGenerationCompleted {
                chapter_id,
                novel_id,
                task_id,
                content_chars,
            },
        );
    }

    pub fn publish_generation_failed(
        &self,
        owner_id: Uuid,
        chapter_id: Uuid,
        novel_id: Uuid,
        task_id: Option<Uuid>,
        error: &str,
    ) {
        self.publish_to_owner(
            owner_id,
            WsEvent::ChapterGenerationFailed {
                chapter_id,
                novel_id,
                task_id,
                error: error.to_string(),
            },
        );
    }

    fn publish_to_owner(&self, owner_id: Uuid, event: WsEvent) {
        if let Some(sender) = self.owner_channels.get(&owner_id) {
            if let Err(e) = sender.send(event) {
                tracing::debug!(
                    owner_id = %owner_id,
                    error = %e,
                    "Failed to publish event (no receivers)"
                );
            }
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
