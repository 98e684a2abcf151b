// ============================================================================
// SheetLoc - 缓存新旧判断
// ============================================================================
//
// 文件: src/storage/freshness.rs
// 职责: 比较聚合缓存与翻译输出文件的修改时间
// 边界:
//   - ✅ 文件修改时间读取
//   - ✅ 翻译目录 *.json 扫描
//   - ❌ 不应包含文件内容解析
//
// ============================================================================

use std::path::Path;
use std::time::SystemTime;

use glob::Pattern;

use crate::tf;
use crate::utils::logger::Logger;

/// 文件最后修改时间，文件不存在或无法读取时返回 None
pub fn file_last_modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
}

/// 聚合缓存是否比翻译目录中最新的 JSON 文件更新
///
/// 缓存不存在时返回 false；目录中还没有任何 JSON 文件时视为缓存更新。
pub fn is_data_json_newer(data_json_path: &Path, translations_dir: &Path) -> bool {
    let Some(data_json_mtime) = file_last_modified(data_json_path) else {
        return false;
    };

    let pattern = format!(
        "{}/*.json",
        Pattern::escape(&translations_dir.to_string_lossy())
    );
    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(err) => {
            Logger::warn(tf!("freshness.compare_failed", err));
            return false;
        }
    };

    let newest_translation = entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter_map(|path| file_last_modified(&path))
        .max();

    match newest_translation {
        Some(newest) => {
            tracing::debug!(?data_json_mtime, ?newest, "comparing modification times");
            data_json_mtime > newest
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path, mtime: SystemTime) {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        file.set_modified(mtime).unwrap();
    }

    #[test]
    fn missing_cache_is_never_newer() {
        let dir = TempDir::new().unwrap();
        assert!(!is_data_json_newer(&dir.path().join("data.json"), dir.path()));
        assert!(file_last_modified(&dir.path().join("data.json")).is_none());
    }

    #[test]
    fn cache_is_newer_when_no_translation_files_exist() {
        let dir = TempDir::new().unwrap();
        let data_json = dir.path().join("data.json");
        let translations = dir.path().join("translations");
        std::fs::create_dir_all(&translations).unwrap();
        touch(&data_json, SystemTime::now());
        std::fs::write(translations.join("readme.txt"), "ignored").unwrap();

        assert!(is_data_json_newer(&data_json, &translations));
        assert!(is_data_json_newer(&data_json, &dir.path().join("absent")));
    }

    #[test]
    fn compares_against_the_newest_translation_file() {
        let dir = TempDir::new().unwrap();
        let data_json = dir.path().join("data.json");
        let translations = dir.path().join("translations");
        std::fs::create_dir_all(&translations).unwrap();

        let base = SystemTime::now() - Duration::from_secs(3600);
        touch(&translations.join("en-gb.json"), base);
        touch(&translations.join("de-de.json"), base + Duration::from_secs(120));

        touch(&data_json, base + Duration::from_secs(60));
        assert!(!is_data_json_newer(&data_json, &translations));

        touch(&data_json, base + Duration::from_secs(600));
        assert!(is_data_json_newer(&data_json, &translations));
    }
}
