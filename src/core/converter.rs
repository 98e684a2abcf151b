// ============================================================================
// SheetLoc - 数据格式转换
// ============================================================================
//
// 文件: src/core/converter.rs
// 职责: 运行时快照与持久化数组之间的双向转换
// 边界:
//   - ✅ 快照 -> 持久化数组 (按工作表分组)
//   - ✅ 持久化数组 -> 快照 (多条记录合并)
//   - ✅ 持久化 JSON 结构校验
//   - ❌ 不应包含文件读写
//   - ❌ 不应包含语言规范化
//
// ============================================================================

use std::collections::{BTreeMap, BTreeSet};

use crate::models::error::{Result, SyncError};
use crate::models::translation::{PersistedArray, PersistedRecord, SheetTranslations, Snapshot};

/// 把快照转换为持久化数组
///
/// 语言按 `locales` 给出的大小写精确查找。某个工作表只要有一个语言存在非空内容就会输出，
/// 同时保留该表下其它语言的空映射，用来表达“表存在但尚未翻译”。
pub fn to_persisted(snapshot: &Snapshot, locales: &[String]) -> PersistedArray {
    let sheet_titles: BTreeSet<&String> = snapshot
        .values()
        .flat_map(|sheets| sheets.keys())
        .collect();

    tracing::debug!(sheets = sheet_titles.len(), "converting snapshot to persisted form");

    let mut persisted = PersistedArray::new();
    for sheet_title in sheet_titles {
        let mut per_locale: BTreeMap<String, SheetTranslations> = BTreeMap::new();
        let mut has_content = false;

        for locale in locales {
            let Some(translations) = snapshot
                .get(locale)
                .and_then(|sheets| sheets.get(sheet_title))
            else {
                continue;
            };

            has_content |= !translations.is_empty();
            tracing::trace!(
                locale = %locale,
                sheet = %sheet_title,
                keys = translations.len(),
                "collected locale keys"
            );
            per_locale.insert(locale.clone(), translations.clone());
        }

        if has_content {
            let mut record = PersistedRecord::new();
            record.insert(sheet_title.clone(), per_locale);
            persisted.push(record);
        }
    }

    persisted
}

/// 把持久化数组还原为快照
///
/// 多条记录指向同一工作表时合并而不是覆盖。
pub fn from_persisted(persisted: &PersistedArray) -> Snapshot {
    let mut snapshot = Snapshot::new();

    for record in persisted {
        for (sheet_title, per_locale) in record {
            for (locale, translations) in per_locale {
                let target = snapshot
                    .entry(locale.clone())
                    .or_default()
                    .entry(sheet_title.clone())
                    .or_default();
                for (key, value) in translations {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
    }

    snapshot
}

/// 解析持久化 JSON 文本
pub fn parse_persisted(content: &str) -> Result<PersistedArray> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if !value.is_array() {
        return Err(SyncError::InvalidCache(
            "expected a top-level array of sheet records".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|err| SyncError::InvalidCache(err.to_string()))
}
