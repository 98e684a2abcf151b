// ============================================================================
// SheetLoc - CLI Sync 命令
// ============================================================================
//
// 文件: src/cli/sync.rs
// 职责: 同步命令的 CLI 接口层
// 边界:
//   - ✅ 命令行参数定义和解析
//   - ✅ 调用核心拉取流程并输出摘要
//   - ❌ 不应包含同步算法
//   - ❌ 不应包含文件写入细节
//
// ============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::core::get_spreadsheet_data;
use crate::models::config::{Config, RuntimeArgs};
use crate::models::translation::count_entries;
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 同步命令
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// 要处理的工作表（可重复；不指定时使用配置文件）
    #[arg(short = 's', long = "sheet")]
    pub sheets: Vec<String>,

    /// 每个工作表读取的最大行数
    #[arg(long)]
    pub row_limit: Option<usize>,

    /// 远程调用之间的等待秒数
    #[arg(long)]
    pub wait: Option<f64>,

    /// 聚合 JSON 文件路径
    #[arg(long)]
    pub data_json: Option<PathBuf>,

    /// 语言列表文件路径
    #[arg(long)]
    pub locales_output: Option<PathBuf>,

    /// 单语言 JSON 输出目录
    #[arg(long)]
    pub translations_dir: Option<PathBuf>,

    /// 不把本地新增内容推送到表格
    #[arg(long)]
    pub no_sync: bool,

    /// 为新行缺失的语言生成翻译公式
    #[arg(long)]
    pub auto_translate: bool,
}

impl SyncArgs {
    /// 把命令参数写入运行时覆盖项
    pub fn apply_to(&self, args: &mut RuntimeArgs) {
        if !self.sheets.is_empty() {
            args.sheets = Some(self.sheets.clone());
        }
        args.row_limit = self.row_limit;
        args.wait_seconds = self.wait;
        args.data_json_path = self.data_json.clone();
        args.locales_output_path = self.locales_output.clone();
        args.translations_output_dir = self.translations_dir.clone();
        if self.no_sync {
            args.sync_local_changes = Some(false);
        }
        if self.auto_translate {
            args.auto_translate = Some(true);
        }
    }
}

pub async fn handle_sync(_args: SyncArgs) -> Result<()> {
    let config = Config::current()?;
    let options = config.sync_options();
    let sheets = config.spreadsheet.sheets.clone();

    Logger::info(tf!("sync.start", sheets.len()));
    let doc = super::connect()?;

    let outcome = get_spreadsheet_data(doc, &sheets, &options)
        .await
        .context(t!("sync.failed"))?;

    if outcome.synced {
        Logger::success(t!("sync.pushed"));
    }
    Logger::success(tf!(
        "sync.summary",
        outcome.locales.len(),
        count_entries(&outcome.translations),
        options.translations_output_dir.display()
    ));
    Ok(())
}
