// ============================================================================
// SheetLoc - 库入口
// ============================================================================
//
// 文件: src/lib.rs
// 职责: 模块声明与公共接口导出
// 边界:
//   - ✅ 模块树声明
//   - ✅ 常用类型重新导出
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

pub mod cli;
pub mod core;
pub mod i18n;
pub mod models;
pub mod remote;
pub mod storage;
pub mod utils;

pub use crate::core::{collect_changes, get_spreadsheet_data, FetchOutcome};
pub use models::config::{Config, Credentials, SyncOptions};
pub use models::error::{Result, SyncError};
pub use models::translation::{LocaleMapping, Snapshot};
pub use remote::{SpreadsheetDocument, Worksheet};
