// ============================================================================
// SheetLoc - 输出文件写入
// ============================================================================
//
// 文件: src/storage/writer.rs
// 职责: 写入语言列表文件、单语言 JSON 文件和聚合 JSON 文件
// 边界:
//   - ✅ 目录递归创建
//   - ✅ 整文件写入
//   - ❌ 不保证原子写入
//   - ❌ 不应包含远程表格访问
//
// ============================================================================

use std::path::Path;

use crate::core::converter::to_persisted;
use crate::models::error::Result;
use crate::models::translation::Snapshot;
use crate::tf;
use crate::utils::logger::Logger;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// 每个语言写入 `<locale 小写>.json`，内容为空的语言跳过，返回写入的文件数
pub fn write_translation_files(
    translations: &Snapshot,
    locales: &[String],
    output_dir: &Path,
) -> Result<usize> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = 0;
    for locale in locales {
        let Some(content) = translations.get(locale).filter(|sheets| !sheets.is_empty()) else {
            Logger::warn(tf!("writer.locale_empty", locale));
            continue;
        };

        let path = output_dir.join(format!("{}.json", locale.to_lowercase()));
        std::fs::write(&path, serde_json::to_string_pretty(content)?)?;
        tracing::debug!(path = %path.display(), sheets = content.len(), "wrote locale file");
        Logger::detail(tf!("writer.locale_written", locale));
        written += 1;
    }

    Ok(written)
}

/// 写入语言列表模块，空白语言被忽略
pub fn write_locales_file(locales: &[String], path: &Path) -> Result<()> {
    ensure_parent(path)?;

    let valid: Vec<&str> = locales
        .iter()
        .map(String::as_str)
        .filter(|locale| !locale.trim().is_empty())
        .collect();
    let content = format!(
        "export const locales = {};\nexport default locales;",
        serde_json::to_string(&valid)?
    );
    std::fs::write(path, content)?;

    Logger::detail(tf!("writer.locales_written", valid.len(), valid.join(", ")));
    Ok(())
}

/// 以持久化数组格式写入聚合文件
pub fn write_language_data_file(
    translations: &Snapshot,
    locales: &[String],
    path: &Path,
) -> Result<()> {
    ensure_parent(path)?;

    let persisted = to_persisted(translations, locales);
    std::fs::write(path, serde_json::to_string_pretty(&persisted)?)?;

    Logger::detail(tf!("writer.data_written", path.display()));
    Ok(())
}
