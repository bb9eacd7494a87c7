//! Identity Provider Port - 外部身份校验
//!
//! 调用方身份由外部访问控制服务签发，这里只负责把凭证解析为外部身份

use async_trait::async_trait;

/// 外部身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// 外部身份服务中的唯一标识
    pub subject: String,
    /// 展示名称
    pub display_name: String,
}

/// Identity Provider Port
#[async_trait]
pub trait IdentityProviderPort: Send + Sync {
    /// 校验 bearer 凭证，无效时返回 None
    async fn verify(&self, token: &str) -> Option<ExternalIdentity>;
}
