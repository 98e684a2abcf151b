// ============================================================================
// SheetLoc - CLI Diff 命令
// ============================================================================
//
// 文件: src/cli/diff.rs
// 职责: 预览本地待推送内容的 CLI 接口层
// 边界:
//   - ✅ 命令行参数定义和解析
//   - ✅ 变更集输出（JSON）
//   - ❌ 不应修改远程表格
//   - ❌ 不应写入本地文件
//
// ============================================================================

use anyhow::{Context, Result};
use clap::Args;

use crate::core::collect_changes;
use crate::models::config::Config;
use crate::models::translation::{count_entries, snapshot_is_empty};
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 差异预览命令
#[derive(Debug, Args)]
pub struct DiffArgs {
    /// 要对比的工作表（可重复；不指定时使用配置文件）
    #[arg(short = 's', long = "sheet")]
    pub sheets: Vec<String>,
}

pub async fn handle_diff(_args: DiffArgs) -> Result<()> {
    let config = Config::current()?;
    let options = config.sync_options();
    let doc = super::connect()?;

    let changes = collect_changes(doc, &config.spreadsheet.sheets, &options)
        .await
        .context(t!("diff.failed"))?;

    if snapshot_is_empty(&changes) {
        Logger::success(t!("diff.clean"));
        return Ok(());
    }

    Logger::info(tf!("diff.pending", count_entries(&changes)));
    println!("{}", serde_json::to_string_pretty(&changes)?);
    Ok(())
}
