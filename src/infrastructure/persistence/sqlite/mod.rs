//! SQLite Persistence - SQLite 数据库持久化实现

mod chapter_repo;
mod database;
mod novel_repo;
mod task_repo;
mod user_repo;

#[cfg(test)]
pub(crate) mod test_support;

pub use chapter_repo::*;
pub use database::*;
pub use novel_repo::SqliteNovelRepository;
pub use task_repo::*;
pub use user_repo::*;
