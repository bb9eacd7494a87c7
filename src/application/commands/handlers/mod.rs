//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod caller_handlers;
mod chapter_handlers;
mod generation_handlers;
mod novel_handlers;

pub use caller_handlers::*;
pub use chapter_handlers::*;
pub use generation_handlers::*;
pub use novel_handlers::{CreateNovelHandler, DeleteNovelHandler, UpdateNovelHandler};
