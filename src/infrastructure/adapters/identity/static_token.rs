//! Static Token Identity Provider
//!
//! 用配置中的 token -> 外部身份映射表校验 bearer 凭证，适用于单机部署和测试

use async_trait::async_trait;
use std::collections::HashMap;

use crate::application::ports::{ExternalIdentity, IdentityProviderPort};

/// 静态 token 身份提供者
pub struct StaticTokenIdentityProvider {
    /// token -> subject
    tokens: HashMap<String, String>,
}

impl StaticTokenIdentityProvider {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        if tokens.is_empty() {
            tracing::warn!("No auth tokens configured, every request will be rejected");
        }
        Self { tokens }
    }
}

#[async_trait]
impl IdentityProviderPort for StaticTokenIdentityProvider {
    async fn verify(&self, token: &str) -> Option<ExternalIdentity> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        self.tokens.get(token).map(|subject| ExternalIdentity {
            subject: subject.clone(),
            display_name: subject.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StaticTokenIdentityProvider {
        let mut tokens = HashMap::new();
        tokens.insert("secret-alice".to_string(), "alice".to_string());
        StaticTokenIdentityProvider::new(tokens)
    }

    #[tokio::test]
    async fn test_known_token_resolves() {
        let identity = provider().verify("secret-alice").await.unwrap();
        assert_eq!(identity.subject, "alice");
    }

    #[tokio::test]
    async fn test_unknown_or_blank_token_rejected() {
        assert!(provider().verify("nope").await.is_none());
        assert!(provider().verify("  ").await.is_none());
    }
}
