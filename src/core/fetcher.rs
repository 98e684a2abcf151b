// ============================================================================
// SheetLoc - 表格数据拉取
// ============================================================================
//
// 文件: src/core/fetcher.rs
// 职责: 拉取全部目标工作表、同步本地新增内容并写出本地文件
// 边界:
//   - ✅ 按工作表并发读取与提取
//   - ✅ 读取结果的顺序合并
//   - ✅ 同步后的一次性刷新
//   - ✅ 输出文件写入调度
//   - ❌ 不应包含变更检测细节
//   - ❌ 不应包含远程写入细节
//   - ❌ 不应包含 CLI 参数处理
//
// ============================================================================

use std::sync::Arc;

use crate::core::changes::find_local_changes;
use crate::core::extractor::{process_sheet, SheetProcessingResult};
use crate::core::scheduler::{AsyncTaskScheduler, SchedulerConfig, TaskResult};
use crate::core::sync::{handle_bidirectional_sync, SyncResult};
use crate::models::config::{Config, SyncOptions};
use crate::models::error::{Result, SyncError};
use crate::models::translation::{Changeset, LocaleMapping, Snapshot};
use crate::remote::SpreadsheetDocument;
use crate::storage::cache::read_data_json;
use crate::storage::writer::{write_language_data_file, write_locales_file, write_translation_files};
use crate::utils::delay::wait;
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 一次拉取的最终结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub translations: Snapshot,
    /// 所有工作表的规范语言（按首次出现顺序）
    pub locales: Vec<String>,
    pub locale_mapping: LocaleMapping,
    /// 本次调用是否把本地新增内容写回了远程
    pub synced: bool,
}

/// 一轮读取合并后的数据
#[derive(Debug, Default)]
struct FetchedSheets {
    translations: Snapshot,
    locale_mapping: LocaleMapping,
    succeeded: usize,
    /// 读取失败的工作表，其远程内容不在快照中
    unreadable: Vec<String>,
}

/// 读取单个工作表
///
/// 工作表不存在时返回失败的处理结果而不是错误。
async fn read_sheet(
    doc: Arc<dyn SpreadsheetDocument>,
    title: String,
    row_limit: usize,
    wait_seconds: f64,
) -> Result<SheetProcessingResult> {
    wait(wait_seconds, &format!("before get cells for sheet: {title}")).await;

    let Some(sheet) = doc.sheets_by_title().get(&title).cloned() else {
        return Ok(SheetProcessingResult {
            diagnostic: Some(SyncError::SheetNotFound(title).to_string()),
            ..Default::default()
        });
    };

    let rows = sheet.get_rows(Some(row_limit)).await?;
    let result = process_sheet(&rows, &title, row_limit);
    if result.success {
        wait(wait_seconds, &format!("after processing sheet: {title}")).await;
    }
    Ok(result)
}

/// 并发读取全部工作表并按提交顺序合并
async fn fetch_sheets(
    doc: &Arc<dyn SpreadsheetDocument>,
    sheet_titles: &[String],
    options: &SyncOptions,
) -> FetchedSheets {
    Logger::info(tf!(
        "fetch.processing_sheets",
        sheet_titles.len(),
        sheet_titles.join(", ")
    ));

    let scheduler = AsyncTaskScheduler::new(SchedulerConfig {
        max_concurrency: options.max_concurrency,
        verbose: Config::get_verbose(),
    });

    let tasks: Vec<_> = sheet_titles
        .iter()
        .map(|title| {
            let doc = Arc::clone(doc);
            let task_title = title.clone();
            let row_limit = options.row_limit;
            let wait_seconds = options.wait_seconds;
            let task = async move {
                let result = read_sheet(doc, task_title, row_limit, wait_seconds).await?;
                Ok::<_, anyhow::Error>(result)
            };
            (title.clone(), task)
        })
        .collect();

    let mut fetched = FetchedSheets::default();
    for (title, result) in scheduler.execute_batch(tasks).await {
        match result {
            TaskResult::Success(sheet) if sheet.success => {
                let mapping = sheet.mapping();
                for (locale, sheets) in sheet.translations {
                    let target = fetched.translations.entry(locale).or_default();
                    for (sheet_title, keys) in sheets {
                        target.entry(sheet_title).or_default().extend(keys);
                    }
                }
                fetched.locale_mapping.merge_from(&mapping);
                fetched.succeeded += 1;
            }
            TaskResult::Success(sheet) => {
                let diagnostic = sheet.diagnostic.unwrap_or_else(|| title.clone());
                Logger::warn(tf!("fetch.sheet_skipped", &title, diagnostic));
            }
            TaskResult::Failed(_) => {
                Logger::warn(tf!("fetch.sheet_read_failed", &title));
                fetched.unreadable.push(title);
            }
        }
    }

    tracing::debug!(
        succeeded = fetched.succeeded,
        locales = ?fetched.locale_mapping.locales,
        "merged sheet results"
    );
    fetched
}

/// 拉取表格数据、同步本地新增内容并写出文件
///
/// 同步写回远程后以关闭同步的方式重新拉取一次，不会再次触发同步。
pub async fn get_spreadsheet_data(
    doc: Arc<dyn SpreadsheetDocument>,
    sheet_titles: &[String],
    options: &SyncOptions,
) -> Result<FetchOutcome> {
    doc.load_info().await?;

    if sheet_titles.is_empty() {
        Logger::warn(t!("fetch.no_sheet_titles"));
        return Ok(FetchOutcome::default());
    }

    let data_json_exists = options.data_json_path.exists();

    let mut fetched = fetch_sheets(&doc, sheet_titles, options).await;
    // 快照不完整时对比会把远程已有的内容当成本地新增
    let sync = if fetched.unreadable.is_empty() {
        handle_bidirectional_sync(
            doc.as_ref(),
            options,
            &fetched.translations,
            &fetched.locale_mapping,
        )
        .await?
    } else {
        if options.sync_local_changes {
            Logger::warn(tf!("fetch.sync_skipped", fetched.unreadable.join(", ")));
        }
        SyncResult::default()
    };

    if sync.should_refresh {
        Logger::info(t!("fetch.refreshing"));
        let refresh_options = SyncOptions {
            sync_local_changes: false,
            ..options.clone()
        };
        fetched = fetch_sheets(&doc, sheet_titles, &refresh_options).await;
    }

    let locales = fetched.locale_mapping.locales.clone();
    write_translation_files(&fetched.translations, &locales, &options.translations_output_dir)?;
    write_locales_file(&locales, &options.locales_output_path)?;
    if fetched.succeeded > 0 || !data_json_exists {
        write_language_data_file(&fetched.translations, &locales, &options.data_json_path)?;
    }

    Ok(FetchOutcome {
        translations: fetched.translations,
        locales,
        locale_mapping: fetched.locale_mapping,
        synced: sync.has_changes,
    })
}

/// 计算本地缓存中尚未出现在远程的条目，不修改远程也不写文件
pub async fn collect_changes(
    doc: Arc<dyn SpreadsheetDocument>,
    sheet_titles: &[String],
    options: &SyncOptions,
) -> Result<Changeset> {
    doc.load_info().await?;

    if sheet_titles.is_empty() {
        Logger::warn(t!("fetch.no_sheet_titles"));
        return Ok(Changeset::new());
    }

    let fetched = fetch_sheets(&doc, sheet_titles, options).await;
    let Some(local) = read_data_json(&options.data_json_path) else {
        Logger::info(tf!("diff.no_local_cache", options.data_json_path.display()));
        return Ok(Changeset::new());
    };

    Ok(find_local_changes(&local, &fetched.translations))
}
