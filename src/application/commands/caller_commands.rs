//! Caller Commands - 调用方身份

/// 解析调用方身份命令（首次访问时创建本地用户）
#[derive(Debug, Clone)]
pub struct ResolveCaller {
    pub token: Option<String>,
}
