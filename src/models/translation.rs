// ============================================================================
// SheetLoc - 翻译数据模型
// ============================================================================
//
// 文件: src/models/translation.rs
// 职责: 翻译快照、持久化数组和语言映射的数据结构定义
// 边界:
//   - ✅ 运行时嵌套结构 (locale -> sheet -> key -> value)
//   - ✅ 持久化数组结构 (sheet -> locale -> key -> value)
//   - ✅ 语言映射结构及合并规则
//   - ✅ 基础数据操作方法
//   - ❌ 不应包含语言规范化算法
//   - ❌ 不应包含差异计算逻辑
//   - ❌ 不应包含文件读写操作
//   - ❌ 不应包含远程表格访问
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 翻译值，可以是任意 JSON 值（字符串、数字、布尔、对象、数组）
pub type TranslationValue = serde_json::Value;

/// 单个工作表内的 key -> value
pub type SheetTranslations = BTreeMap<String, TranslationValue>;

/// 单个语言下的 sheet -> key -> value
pub type LocaleTranslations = BTreeMap<String, SheetTranslations>;

/// 翻译快照: locale -> sheet -> key -> value
pub type Snapshot = BTreeMap<String, LocaleTranslations>;

/// 变更集，结构与快照一致，仅包含需要推送到远程的条目
pub type Changeset = Snapshot;

/// 持久化记录: { sheet: { locale: { key: value } } }
pub type PersistedRecord = BTreeMap<String, BTreeMap<String, SheetTranslations>>;

/// 持久化数组，每个工作表一条记录
pub type PersistedArray = Vec<PersistedRecord>;

/// 语言映射
///
/// 同一份表头在一次处理过程中生成，`normalized_to_original` 用于写回时定位
/// 人工创建的原始列名，`original_to_normalized` 的键为小写原始表头。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleMapping {
    /// 规范化后的语言列表（去重，保持首次出现顺序）
    pub locales: Vec<String>,
    /// 规范化语言 -> 原始表头（首次出现优先）
    pub normalized_to_original: BTreeMap<String, String>,
    /// 小写原始表头 -> 规范化语言
    pub original_to_normalized: BTreeMap<String, String>,
}

impl LocaleMapping {
    /// 是否没有任何有效语言
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// 合并另一份映射，已有条目保持不变
    pub fn merge_from(&mut self, other: &LocaleMapping) {
        for locale in &other.locales {
            if !self.locales.contains(locale) {
                self.locales.push(locale.clone());
            }
        }
        for (normalized, original) in &other.normalized_to_original {
            self.normalized_to_original
                .entry(normalized.clone())
                .or_insert_with(|| original.clone());
        }
        for (original, normalized) in &other.original_to_normalized {
            self.original_to_normalized
                .entry(original.clone())
                .or_insert_with(|| normalized.clone());
        }
    }
}

/// 快照中是否不存在任何非空工作表
pub fn snapshot_is_empty(snapshot: &Snapshot) -> bool {
    snapshot.values().all(|sheets| sheets.is_empty())
}

/// 统计快照中 (locale, sheet, key) 三元组数量
pub fn count_entries(snapshot: &Snapshot) -> usize {
    snapshot
        .values()
        .flat_map(|sheets| sheets.values())
        .map(|keys| keys.len())
        .sum()
}

/// 把翻译值转换为单元格文本
pub fn cell_text(value: &TranslationValue) -> String {
    match value {
        TranslationValue::String(text) => text.clone(),
        TranslationValue::Null => String::new(),
        other => other.to_string(),
    }
}
