//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod identity;
pub mod llm;

pub use identity::*;
pub use llm::*;
