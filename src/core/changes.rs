// ============================================================================
// SheetLoc - 本地变更检测
// ============================================================================
//
// 文件: src/core/changes.rs
// 职责: 对比本地快照与远程快照，找出本地新增的条目
// 边界:
//   - ✅ 按 (locale, sheet, key) 判断存在性
//   - ❌ 不比较已存在条目的值
//   - ❌ 不产生删除操作
//   - ❌ 不应包含远程写入
//
// ============================================================================

use crate::models::translation::{Changeset, Snapshot, TranslationValue};

fn is_present(value: Option<&TranslationValue>) -> bool {
    match value {
        None | Some(TranslationValue::Null) => false,
        Some(TranslationValue::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}

/// 找出本地存在、远程缺失的条目
///
/// 远程已有的 key 即使值不同也不会出现在结果中。
pub fn find_local_changes(local: &Snapshot, remote: &Snapshot) -> Changeset {
    let mut changes = Changeset::new();

    for (locale, sheets) in local {
        for (sheet, keys) in sheets {
            let remote_keys = remote.get(locale).and_then(|sheets| sheets.get(sheet));

            for (key, value) in keys {
                let remote_value = remote_keys.and_then(|keys| keys.get(key));
                if is_present(remote_value) {
                    continue;
                }

                changes
                    .entry(locale.clone())
                    .or_default()
                    .entry(sheet.clone())
                    .or_default()
                    .insert(key.clone(), value.clone());
            }
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::translation::snapshot_is_empty;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn snapshot(value: serde_json::Value) -> Snapshot {
        serde_json::from_value(value).unwrap()
    }

    fn triples(snapshot: &Snapshot) -> BTreeSet<(String, String, String)> {
        snapshot
            .iter()
            .flat_map(|(locale, sheets)| {
                sheets.iter().flat_map(move |(sheet, keys)| {
                    keys.keys()
                        .map(move |key| (locale.clone(), sheet.clone(), key.clone()))
                })
            })
            .collect()
    }

    #[test]
    fn subset_of_remote_yields_nothing() {
        let local = snapshot(json!({ "en-GB": { "home": { "a": "A" } } }));
        let remote = snapshot(json!({
            "en-GB": { "home": { "a": "A", "b": "B" }, "common": { "x": "X" } },
            "de-DE": { "home": { "a": "Ä" } }
        }));
        assert!(find_local_changes(&local, &remote).is_empty());
    }

    #[test]
    fn empty_local_is_always_empty() {
        let remote = snapshot(json!({ "en-GB": { "home": { "a": "A" } } }));
        assert!(find_local_changes(&Snapshot::new(), &remote).is_empty());
        assert!(find_local_changes(&Snapshot::new(), &Snapshot::new()).is_empty());
    }

    #[test]
    fn empty_remote_returns_local_without_empty_sheets() {
        let local = snapshot(json!({
            "en": { "home": { "welcome": "Hi" }, "empty": {} },
            "de-DE": {}
        }));
        let changes = find_local_changes(&local, &Snapshot::new());
        assert_eq!(changes, snapshot(json!({ "en": { "home": { "welcome": "Hi" } } })));
    }

    #[test]
    fn detects_missing_locale_sheet_and_key() {
        let local = snapshot(json!({
            "en-GB": { "home": { "a": "A", "b": "B" }, "about": { "t": "T" } },
            "pl-PL": { "home": { "a": "Aa" } }
        }));
        let remote = snapshot(json!({ "en-GB": { "home": { "a": "A" } } }));

        let expected: BTreeSet<_> = [
            ("en-GB", "home", "b"),
            ("en-GB", "about", "t"),
            ("pl-PL", "home", "a"),
        ]
        .into_iter()
        .map(|(l, s, k)| (l.to_string(), s.to_string(), k.to_string()))
        .collect();
        assert_eq!(triples(&find_local_changes(&local, &remote)), expected);
    }

    #[test]
    fn differing_values_for_existing_keys_are_not_changes() {
        let local = snapshot(json!({ "en-GB": { "home": { "a": "local edit" } } }));
        let remote = snapshot(json!({ "en-GB": { "home": { "a": "remote" } } }));
        assert!(snapshot_is_empty(&find_local_changes(&local, &remote)));
    }

    #[test]
    fn blank_remote_values_count_as_missing() {
        let local = snapshot(json!({ "en-GB": { "home": { "a": "A", "b": "B", "c": 0 } } }));
        let remote = snapshot(json!({ "en-GB": { "home": { "a": "", "b": null, "c": 0 } } }));
        let changes = find_local_changes(&local, &remote);
        assert_eq!(
            triples(&changes),
            [("en-GB", "home", "a"), ("en-GB", "home", "b")]
                .into_iter()
                .map(|(l, s, k)| (l.to_string(), s.to_string(), k.to_string()))
                .collect()
        );
    }
}
