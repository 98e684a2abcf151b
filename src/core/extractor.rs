// ============================================================================
// SheetLoc - 工作表数据提取
// ============================================================================
//
// 文件: src/core/extractor.rs
// 职责: 把单个工作表的行数据转换为按语言组织的翻译映射
// 边界:
//   - ✅ 表头识别与 key 列确定
//   - ✅ 语言映射构建（规范化 + 原始表头回查）
//   - ✅ 按语言收集 key -> value
//   - ❌ 不应包含远程读取和等待
//   - ❌ 不应包含跨工作表的合并
//   - ❌ 不应包含文件写入
//
// ============================================================================

use std::collections::BTreeMap;

use crate::core::locale::{build_locale_mapping, resolve_original_header};
use crate::models::translation::{LocaleMapping, SheetTranslations, Snapshot, TranslationValue};
use crate::remote::SheetRow;

/// 单个工作表的处理结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetProcessingResult {
    /// locale -> { sheet_title -> { key -> value } }
    pub translations: Snapshot,
    /// 本表发现的规范语言
    pub locales: Vec<String>,
    /// 规范语言 -> 原始表头
    pub locale_mapping: BTreeMap<String, String>,
    /// 小写原始表头 -> 规范语言
    pub original_mapping: BTreeMap<String, String>,
    pub success: bool,
    /// 失败原因，由调用方输出
    pub diagnostic: Option<String>,
}

impl SheetProcessingResult {
    fn failed(diagnostic: String) -> Self {
        Self {
            diagnostic: Some(diagnostic),
            ..Default::default()
        }
    }

    /// 本表的语言映射
    pub fn mapping(&self) -> LocaleMapping {
        LocaleMapping {
            locales: self.locales.clone(),
            normalized_to_original: self.locale_mapping.clone(),
            original_to_normalized: self.original_mapping.clone(),
        }
    }
}

/// 处理单个工作表
///
/// 第一列为 key 列。没有任何有效语言列时返回 `success = false`。
pub fn process_sheet(rows: &[SheetRow], sheet_title: &str, row_limit: usize) -> SheetProcessingResult {
    let rows = &rows[..rows.len().min(row_limit)];

    let Some(first) = rows.first() else {
        return SheetProcessingResult::failed(format!("no rows found in sheet \"{sheet_title}\""));
    };

    let headers: Vec<String> = first.to_object().headers().map(str::to_string).collect();
    let header_row: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    tracing::debug!(sheet = sheet_title, headers = ?header_row, "header row");

    let Some(key_column) = header_row.first().cloned() else {
        return SheetProcessingResult::failed(format!(
            "sheet \"{sheet_title}\" has no header columns"
        ));
    };

    let mapping = build_locale_mapping(&headers, &key_column);
    if mapping.is_empty() {
        return SheetProcessingResult::failed(format!(
            "no valid locale columns found in sheet \"{sheet_title}\""
        ));
    }

    let mut translations = Snapshot::new();
    for locale in &mapping.locales {
        let Some(original_header) = resolve_original_header(locale, &mapping.normalized_to_original)
        else {
            continue;
        };

        let mut keys = SheetTranslations::new();
        for row in rows {
            let record = row.to_object();
            let key = record.get_ci(&key_column).filter(|key| !key.is_empty());
            let value = record.get_ci(&original_header).filter(|value| !value.is_empty());
            if let (Some(key), Some(value)) = (key, value) {
                keys.insert(
                    key.to_lowercase(),
                    TranslationValue::String(value.to_string()),
                );
            }
        }

        tracing::trace!(
            sheet = sheet_title,
            locale = %locale,
            keys = keys.len(),
            "extracted locale column"
        );
        translations
            .entry(locale.clone())
            .or_default()
            .entry(sheet_title.to_string())
            .or_default()
            .extend(keys);
    }

    SheetProcessingResult {
        translations,
        locales: mapping.locales,
        locale_mapping: mapping.normalized_to_original,
        original_mapping: mapping.original_to_normalized,
        success: true,
        diagnostic: None,
    }
}
