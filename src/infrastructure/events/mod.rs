//! Events - 生成事件推送

mod publisher;

pub use publisher::{EventPublisher, WsEvent};
