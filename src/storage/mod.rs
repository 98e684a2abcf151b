// ============================================================================
// SheetLoc - 本地存储模块
// ============================================================================
//
// 文件: src/storage/mod.rs
// 职责: 本地文件系统交互模块导出
// 边界:
//   - ✅ 缓存读取、新旧判断、输出文件写入
//   - ❌ 不应包含远程表格访问
//   - ❌ 不应包含差异计算
//
// ============================================================================

pub mod cache;
pub mod freshness;
pub mod writer;
