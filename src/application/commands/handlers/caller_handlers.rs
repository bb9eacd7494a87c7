//! Caller Command Handlers - 调用方身份解析

use std::sync::Arc;

use crate::application::commands::ResolveCaller;
use crate::application::error::ApplicationError;
use crate::application::ports::{IdentityProviderPort, UserRecord, UserRepositoryPort};

/// ResolveCaller Handler
///
/// 校验凭证，并把外部身份映射为本地用户（首次访问时创建）
pub struct ResolveCallerHandler {
    identity_provider: Arc<dyn IdentityProviderPort>,
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl ResolveCallerHandler {
    pub fn new(
        identity_provider: Arc<dyn IdentityProviderPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
    ) -> Self {
        Self {
            identity_provider,
            user_repo,
        }
    }

    pub async fn handle(&self, command: ResolveCaller) -> Result<UserRecord, ApplicationError> {
        let token = command
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ApplicationError::Unauthorized)?;

        let identity = self
            .identity_provider
            .verify(&token)
            .await
            .ok_or(ApplicationError::Unauthorized)?;

        let user = self
            .user_repo
            .find_or_create(&identity.subject, &identity.display_name)
            .await?;

        tracing::debug!(user_id = %user.id, subject = %identity.subject, "Caller resolved");

        Ok(user)
    }
}
