// ============================================================================
// SheetLoc - Core 核心模块
// ============================================================================
//
// 文件: src/core/mod.rs
// 职责: 同步核心模块入口和导出
// 边界:
//   - ✅ 核心子模块导出
//   - ✅ 常用类型重新导出
//   - ❌ 不应包含具体业务实现
//   - ❌ 不应包含 CLI 相关逻辑
//
// ============================================================================

pub mod changes;
pub mod converter;
pub mod extractor;
pub mod fetcher;
pub mod locale;
pub mod scheduler;
pub mod sync;
pub mod updater;

// 重新导出常用类型
pub use changes::find_local_changes;
pub use converter::{from_persisted, to_persisted};
pub use extractor::{process_sheet, SheetProcessingResult};
pub use fetcher::{collect_changes, get_spreadsheet_data, FetchOutcome};
pub use scheduler::{AsyncTaskScheduler, SchedulerConfig, TaskResult as SchedulerTaskResult};
pub use sync::{handle_bidirectional_sync, SyncResult, SyncState};
pub use updater::{apply_changes, UpdateReport};
