// ============================================================================
// SheetLoc - 远程表格更新
// ============================================================================
//
// 文件: src/core/updater.rs
// 职责: 把变更集转换为具体的远程行操作
// 边界:
//   - ✅ 已存在 key 的单元格更新（逐行保存）
//   - ✅ 新 key 的追加（分批写入）
//   - ✅ 自动翻译公式生成
//   - ✅ 调用之间的固定间隔
//   - ❌ 不应包含重试和回滚
//   - ❌ 不应包含差异计算
//   - ❌ 不应跨工作表并发
//
// ============================================================================

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::core::locale::{
    is_valid_locale, normalize_locale, normalized_for_header, resolve_original_header,
};
use crate::models::error::Result;
use crate::models::translation::{cell_text, count_entries, Changeset, LocaleMapping};
use crate::remote::{column_letter, RowRecord, SheetRow, SpreadsheetDocument, Worksheet};
use crate::tf;
use crate::utils::delay::wait;
use crate::utils::logger::Logger;

/// 每次追加的最大行数
pub const APPEND_CHUNK_SIZE: usize = 5;

/// 一次更新的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// 原位更新并保存的单元格数
    pub updated_cells: usize,
    /// 追加的新行数
    pub appended_rows: usize,
    /// 因不存在或没有数据而跳过的工作表
    pub skipped_sheets: Vec<String>,
}

/// 待追加的新行
#[derive(Debug)]
struct PendingRow {
    record: RowRecord,
    /// 按写入顺序记录有值的表头，第一个作为翻译来源
    filled_headers: Vec<String>,
}

/// 生成自动翻译公式
///
/// `row` 为表格中从 1 开始的行号，语言代码引用来源列和目标列的第一行表头。
pub fn translate_formula(source_column: usize, target_column: usize, row: usize) -> String {
    let source = column_letter(source_column);
    let target = column_letter(target_column);
    format!("=GOOGLETRANSLATE({source}{row};${source}$1;{target}$1)")
}

/// 在当前工作表的表头中定位语言列
///
/// 优先使用合并映射给出的原始表头（需在本表存在），
/// 然后按规范代码和表头规范化结果做大小写不敏感匹配。
fn resolve_locale_header(locale: &str, headers: &[String], mapping: &LocaleMapping) -> Option<String> {
    let find_ci = |wanted: &str| {
        let wanted = wanted.to_lowercase();
        headers
            .iter()
            .skip(1)
            .find(|header| header.to_lowercase() == wanted)
            .cloned()
    };

    if let Some(header) = resolve_original_header(locale, &mapping.normalized_to_original)
        .and_then(|original| find_ci(&original))
    {
        return Some(header);
    }

    if let Some(header) = find_ci(locale) {
        return Some(header);
    }

    let locale_lower = locale.to_lowercase();
    headers
        .iter()
        .skip(1)
        .find(|header| {
            normalized_for_header(header, &mapping.original_to_normalized)
                .unwrap_or_else(|| normalize_locale(header))
                .to_lowercase()
                == locale_lower
        })
        .cloned()
}

/// 把变更集写回远程表格
///
/// 工作表依次处理。任何保存或追加失败都会立即返回错误，已完成的写入不会回滚。
pub async fn apply_changes(
    doc: &dyn SpreadsheetDocument,
    changes: &Changeset,
    delay_seconds: f64,
    auto_translate: bool,
    mapping: &LocaleMapping,
) -> Result<UpdateReport> {
    Logger::info(tf!("updater.start", count_entries(changes)));

    let sheet_titles: BTreeSet<&String> = changes.values().flat_map(|sheets| sheets.keys()).collect();
    let sheets = doc.sheets_by_title();
    let mut report = UpdateReport::default();

    for title in sheet_titles {
        Logger::detail(tf!("updater.processing_sheet", title));

        let Some(sheet) = sheets.get(title) else {
            Logger::warn(tf!("updater.sheet_not_found", title));
            report.skipped_sheets.push(title.clone());
            continue;
        };

        wait(delay_seconds, &format!("before getting rows for sheet: {title}")).await;
        let rows = sheet.get_rows(None).await?;
        if rows.is_empty() {
            Logger::warn(tf!("updater.no_rows", title));
            report.skipped_sheets.push(title.clone());
            continue;
        }

        update_sheet(
            sheet,
            title,
            rows,
            changes,
            delay_seconds,
            auto_translate,
            mapping,
            &mut report,
        )
        .await?;

        wait(delay_seconds, &format!("after updating sheet: {title}")).await;
    }

    Logger::success(tf!(
        "updater.finished",
        report.updated_cells,
        report.appended_rows
    ));
    Ok(report)
}

#[allow(clippy::too_many_arguments)]
async fn update_sheet(
    sheet: &Arc<dyn Worksheet>,
    title: &str,
    mut rows: Vec<SheetRow>,
    changes: &Changeset,
    delay_seconds: f64,
    auto_translate: bool,
    mapping: &LocaleMapping,
    report: &mut UpdateReport,
) -> Result<()> {
    let headers: Vec<String> = rows[0].to_object().headers().map(str::to_string).collect();
    let Some(key_header) = headers.first().cloned() else {
        return Ok(());
    };

    let existing: HashMap<String, usize> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            row.to_object()
                .get_ci(&key_header)
                .filter(|key| !key.is_empty())
                .map(|key| (key.to_lowercase(), index))
        })
        .collect();

    let mut pending: Vec<PendingRow> = Vec::new();
    let mut pending_index: HashMap<String, usize> = HashMap::new();

    for (locale, sheets) in changes {
        let Some(keys) = sheets.get(title) else {
            continue;
        };
        let header = resolve_locale_header(locale, &headers, mapping);
        if header.is_none() {
            Logger::warn(tf!("updater.locale_column_missing", locale, title));
        }

        for (key, value) in keys {
            let key_lower = key.to_lowercase();
            let text = cell_text(value);

            if let Some(&index) = existing.get(&key_lower) {
                let Some(header) = header.as_deref() else {
                    continue;
                };
                let row = &mut rows[index];
                let current = row.to_object().get(header).unwrap_or_default();
                if !current.is_empty() {
                    tracing::debug!(
                        sheet = title,
                        row = row.row_number,
                        header,
                        "remote cell already has a value, keeping it"
                    );
                    continue;
                }
                row.set(header, text);
                wait(
                    delay_seconds / 2.0,
                    &format!("before updating row {}", row.row_number),
                )
                .await;
                sheet.save_row(row).await?;
                row.clear_changes();
                report.updated_cells += 1;
                continue;
            }

            let position = *pending_index.entry(key_lower).or_insert_with(|| {
                let mut record = RowRecord::new();
                record.insert(key_header.clone(), key.clone());
                pending.push(PendingRow {
                    record,
                    filled_headers: Vec::new(),
                });
                pending.len() - 1
            });
            if let Some(header) = header.as_deref() {
                let entry = &mut pending[position];
                entry.record.insert(header, text);
                if !entry.filled_headers.iter().any(|h| h == header) {
                    entry.filled_headers.push(header.to_string());
                }
            }
        }
    }

    if pending.is_empty() {
        return Ok(());
    }

    Logger::info(tf!("updater.adding_rows", pending.len(), title));

    if auto_translate {
        let first_new_row = rows.len() + 2;
        for (offset, entry) in pending.iter_mut().enumerate() {
            add_translate_formulas(entry, &headers, first_new_row + offset);
        }
    }

    let records: Vec<RowRecord> = pending.into_iter().map(|entry| entry.record).collect();
    wait(
        delay_seconds,
        &format!("before adding {} new rows", records.len()),
    )
    .await;

    for (chunk_index, chunk) in records.chunks(APPEND_CHUNK_SIZE).enumerate() {
        if chunk_index > 0 {
            wait(
                delay_seconds,
                &format!("between row chunks ({chunk_index} written)"),
            )
            .await;
        }
        sheet.add_rows(chunk.to_vec()).await?;
        report.appended_rows += chunk.len();
    }

    Ok(())
}

/// 为新行中缺失的语言列填入翻译公式
fn add_translate_formulas(entry: &mut PendingRow, headers: &[String], row_number: usize) {
    let Some(source_header) = entry.filled_headers.first() else {
        return;
    };
    let Some(source_column) = headers.iter().position(|h| h == source_header) else {
        return;
    };

    for (target_column, header) in headers.iter().enumerate().skip(1) {
        if !is_valid_locale(Some(header)) {
            continue;
        }
        let has_value = entry
            .record
            .get(header)
            .is_some_and(|value| !value.is_empty());
        if has_value {
            continue;
        }
        entry.record.insert(
            header.clone(),
            translate_formula(source_column, target_column, row_number),
        );
    }
}
