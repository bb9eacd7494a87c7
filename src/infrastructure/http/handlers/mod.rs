//! HTTP Handlers

mod chapter;
mod generation;
mod novel;
mod ping;
mod websocket;

pub use chapter::*;
pub use generation::*;
pub use novel::*;
pub use ping::*;
pub use websocket::*;
