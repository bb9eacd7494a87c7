//! Identity Adapter - 调用方身份校验实现

mod static_token;

pub use static_token::StaticTokenIdentityProvider;
