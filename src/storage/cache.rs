// ============================================================================
// SheetLoc - 本地缓存读取
// ============================================================================
//
// 文件: src/storage/cache.rs
// 职责: 读取聚合 JSON 文件并还原为翻译快照
// 边界:
//   - ✅ 文件存在性检查与读取
//   - ✅ 解析失败降级为“无本地缓存”
//   - ❌ 不应包含文件写入
//   - ❌ 不应包含差异计算
//
// ============================================================================

use std::path::Path;

use crate::core::converter::{from_persisted, parse_persisted};
use crate::models::error::Result;
use crate::models::translation::Snapshot;
use crate::tf;
use crate::utils::logger::Logger;

/// 读取本地缓存，文件不存在或内容无效时返回 None
pub fn read_data_json(path: &Path) -> Option<Snapshot> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no local cache");
        return None;
    }

    match load(path) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            Logger::warn(tf!("cache.read_failed", path.display(), err));
            None
        }
    }
}

fn load(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)?;
    let persisted = parse_persisted(&content)?;
    Ok(from_persisted(&persisted))
}
