//! 调用方身份提取
//!
//! 优先读取 `Authorization: Bearer <token>`，WebSocket 握手无法设置请求头时退回 `?token=`

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Uri},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::{ResolveCaller, UserRecord};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 已认证的调用方
#[derive(Debug, Clone)]
pub struct Caller(pub UserRecord);

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim().to_string())
}

fn query_token(uri: &Uri) -> Option<String> {
    Query::<TokenQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(q)| q.token)
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).or_else(|| query_token(&parts.uri));

        let user = state
            .resolve_caller_handler
            .handle(ResolveCaller { token })
            .await?;

        Ok(Caller(user))
    }
}
