// ============================================================================
// SheetLoc - 错误类型
// ============================================================================
//
// 文件: src/models/error.rs
// 职责: 同步流程的错误分类定义
// 边界:
//   - ✅ 配置错误、未找到、解析错误、远程写入错误
//   - ✅ 标准库与序列化错误的转换
//   - ❌ 不应包含错误恢复逻辑
//   - ❌ 不应包含日志输出
//
// ============================================================================

use thiserror::Error;

/// 同步流程错误
#[derive(Debug, Error)]
pub enum SyncError {
    /// 缺少凭据环境变量，在任何远程调用前抛出
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    /// 文档中不存在请求的工作表
    #[error("sheet \"{0}\" not found in the document")]
    SheetNotFound(String),

    /// 远程表格调用失败
    #[error("remote {operation} failed: {message}")]
    Remote { operation: String, message: String },

    /// 本地缓存结构不符合持久化数组格式
    #[error("invalid language data layout: {0}")]
    InvalidCache(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// 构造远程调用错误
    pub fn remote(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        SyncError::Remote {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

/// 库内统一的 Result 类型
pub type Result<T> = std::result::Result<T, SyncError>;
