//! Novel Context - 小说限界上下文
//!
//! 职责:
//! - 标题、类型、风格等值对象
//! - 小说生命周期状态

mod value_objects;

pub use value_objects::{Genre, NovelStatus, Style, Title};
