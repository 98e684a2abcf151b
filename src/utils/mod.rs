// ============================================================================
// SheetLoc - 工具模块
// ============================================================================
//
// 文件: src/utils/mod.rs
// 职责: 通用工具模块导出
// 边界:
//   - ✅ 日志、颜色、延迟工具导出
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

pub mod colors;
pub mod delay;
pub mod logger;
