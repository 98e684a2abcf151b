// ============================================================================
// SheetLoc - 双向同步管理
// ============================================================================
//
// 文件: src/core/sync.rs
// 职责: 决定是否把本地缓存的新增内容推送到远程表格
// 边界:
//   - ✅ 本地缓存新旧判断与读取
//   - ✅ 变更检测与远程更新调用
//   - ✅ 刷新信号（至多一次）
//   - ❌ 不应包含重新拉取逻辑
//   - ❌ 不应包含输出文件写入
//
// ============================================================================

use std::fmt;

use crate::core::changes::find_local_changes;
use crate::core::updater::apply_changes;
use crate::models::config::SyncOptions;
use crate::models::error::Result;
use crate::models::translation::{count_entries, snapshot_is_empty, LocaleMapping, Snapshot};
use crate::remote::SpreadsheetDocument;
use crate::storage::cache::read_data_json;
use crate::storage::freshness::is_data_json_newer;
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 同步状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// 没有本地缓存或未启用同步
    Idle,
    /// 正在对比本地缓存与远程数据
    Comparing,
    /// 正在写回远程
    Applying,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncState::Idle => "idle",
            SyncState::Comparing => "comparing",
            SyncState::Applying => "applying",
        };
        f.write_str(name)
    }
}

/// 同步结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// 调用方需要以关闭同步的方式重新拉取一次
    pub should_refresh: bool,
    pub has_changes: bool,
}

fn transition(state: &mut SyncState, next: SyncState) {
    tracing::debug!(from = %state, to = %next, "sync state");
    *state = next;
}

/// 处理本地到远程的同步
///
/// 只有启用同步、本地缓存存在且比翻译输出文件更新时才会对比。
/// 对比出非空变更集时写回远程并要求调用方刷新。
pub async fn handle_bidirectional_sync(
    doc: &dyn SpreadsheetDocument,
    options: &SyncOptions,
    remote_snapshot: &Snapshot,
    mapping: &LocaleMapping,
) -> Result<SyncResult> {
    let mut state = SyncState::Idle;
    let result = SyncResult::default();

    if !options.sync_local_changes {
        tracing::debug!("local sync disabled");
        return Ok(result);
    }
    if !is_data_json_newer(&options.data_json_path, &options.translations_output_dir) {
        tracing::debug!(path = %options.data_json_path.display(), "local cache is not newer");
        return Ok(result);
    }
    let Some(local) = read_data_json(&options.data_json_path) else {
        return Ok(result);
    };

    transition(&mut state, SyncState::Comparing);
    Logger::info(t!("sync.local_newer"));

    let changes = find_local_changes(&local, remote_snapshot);
    if snapshot_is_empty(&changes) {
        Logger::info(t!("sync.no_changes"));
        transition(&mut state, SyncState::Idle);
        return Ok(result);
    }

    transition(&mut state, SyncState::Applying);
    Logger::info(tf!("sync.changes_found", count_entries(&changes)));
    if let Ok(pretty) = serde_json::to_string_pretty(&changes) {
        tracing::debug!(changes = %pretty, "changeset");
    }

    apply_changes(
        doc,
        &changes,
        options.wait_seconds,
        options.auto_translate,
        mapping,
    )
    .await?;

    transition(&mut state, SyncState::Idle);
    Ok(SyncResult {
        should_refresh: true,
        has_changes: true,
    })
}
