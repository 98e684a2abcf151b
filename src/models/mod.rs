// ============================================================================
// SheetLoc - 数据模型模块
// ============================================================================
//
// 文件: src/models/mod.rs
// 职责: 数据模型模块导出
// 边界:
//   - ✅ 翻译数据、配置、错误类型导出
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

pub mod config;
pub mod error;
pub mod translation;
