// ============================================================================
// SheetLoc - 语言规范化与校验
// ============================================================================
//
// 文件: src/core/locale.rs
// 职责: 表头名称到规范语言代码的映射及反向查找
// 边界:
//   - ✅ 语言代码规范化 (en -> en-GB, pl -> pl-PL)
//   - ✅ 表头语言映射构建（规范化 <-> 原始表头）
//   - ✅ 语言列判定（排除 key/status 等元数据列）
//   - ❌ 不应包含表格读取逻辑
//   - ❌ 不应包含文件操作
//   - ❌ 不应包含日志输出
//
// 说明:
//   表格由人工维护，同一语言可能写成 en、EN、En-us。存储时统一为规范代码，
//   写回时通过映射找到人工创建的原始列。
//
// ============================================================================

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::translation::LocaleMapping;

/// 语言到默认地区的映射
const LANGUAGE_TO_REGION: &[(&str, &str)] = &[
    ("en", "en-GB"),
    ("de", "de-DE"),
    ("fr", "fr-FR"),
    ("es", "es-ES"),
    ("it", "it-IT"),
    ("pt", "pt-PT"),
    ("pl", "pl-PL"),
    ("ru", "ru-RU"),
    ("zh", "zh-CN"),
    ("ja", "ja-JP"),
    ("ko", "ko-KR"),
    ("ar", "ar-SA"),
    ("hi", "hi-IN"),
    ("th", "th-TH"),
    ("vi", "vi-VN"),
    ("tr", "tr-TR"),
    ("nl", "nl-NL"),
    ("sv", "sv-SE"),
    ("da", "da-DK"),
    ("no", "no-NO"),
    ("fi", "fi-FI"),
    ("cs", "cs-CZ"),
    ("sk", "sk-SK"),
    ("hu", "hu-HU"),
    ("ro", "ro-RO"),
    ("bg", "bg-BG"),
    ("hr", "hr-HR"),
    ("sl", "sl-SI"),
    ("et", "et-EE"),
    ("lv", "lv-LV"),
    ("lt", "lt-LT"),
    ("el", "el-GR"),
    ("he", "he-IL"),
    ("uk", "uk-UA"),
    ("be", "be-BY"),
];

/// 常见的非语言列名
const NON_LOCALE_KEYWORDS: &[&str] = &[
    "key",
    "keys",
    "id",
    "identifier",
    "name",
    "title",
    "label",
    "description",
    "comment",
    "note",
    "context",
    "category",
    "type",
    "status",
    "updated",
    "created",
    "modified",
    "version",
    "source",
    "i18n",
    "translation",
    "namespace",
    "section",
];

const HEADER_PATTERN: &str = r"^[a-z]{2}([_-][a-z]{2})?([_-][a-z]+)?$";

const LOCALE_PATTERNS: [&str; 4] = [
    r"^[a-z]{2}$",
    r"^[a-z]{2}-[a-z]{2}$",
    r"^[a-z]{2}_[a-z]{2}$",
    r"^[a-z]{2}-[a-z]{2}-[a-z]+$",
];

/// 表头形状: 语言[-地区][-后缀]
fn header_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(HEADER_PATTERN).ok()).as_ref()
}

/// 校验用的语言代码形状
fn locale_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        LOCALE_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    })
}

/// 规范化语言代码
///
/// 已带地区分隔符的代码只做小写处理；单独的语言代码优先查表，
/// 查不到的两字母代码补全为 `xx-XX`，其余输入原样（小写）返回。
pub fn normalize_locale(raw: &str) -> String {
    let normalized = raw.trim().to_lowercase();

    if normalized.contains('-') || normalized.contains('_') {
        return normalized;
    }

    if let Some((_, with_region)) = LANGUAGE_TO_REGION
        .iter()
        .find(|(language, _)| *language == normalized)
    {
        return (*with_region).to_string();
    }

    if normalized.len() == 2 && normalized.chars().all(|c| c.is_ascii_lowercase()) {
        return format!("{}-{}", normalized, normalized.to_uppercase());
    }

    normalized
}

/// 判断表头是否像语言代码
pub fn is_valid_locale(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() || NON_LOCALE_KEYWORDS.contains(&normalized.as_str()) {
        return false;
    }
    locale_patterns()
        .iter()
        .any(|pattern| pattern.is_match(&normalized))
}

/// 根据原始表头构建语言映射
///
/// 跳过 key 列（大小写不敏感）和不符合语言形状的表头；
/// 同一规范代码以首次出现的原始表头为准。
pub fn build_locale_mapping(headers: &[String], key_column: &str) -> LocaleMapping {
    let key_column = key_column.to_lowercase();
    let mut mapping = LocaleMapping::default();

    for header in headers {
        let header_lower = header.to_lowercase();
        let looks_like_locale =
            header_pattern().is_some_and(|pattern| pattern.is_match(&header_lower));
        if header_lower == key_column || !looks_like_locale {
            continue;
        }

        let normalized = normalize_locale(&header_lower);
        mapping
            .normalized_to_original
            .entry(normalized.clone())
            .or_insert_with(|| header.clone());
        mapping
            .original_to_normalized
            .entry(header_lower)
            .or_insert_with(|| normalized.clone());
        if !mapping.locales.contains(&normalized) {
            mapping.locales.push(normalized);
        }
    }

    mapping
}

/// 查找规范语言对应的原始表头
///
/// 先精确匹配，再做大小写不敏感的扫描。
pub fn resolve_original_header(
    locale: &str,
    normalized_to_original: &BTreeMap<String, String>,
) -> Option<String> {
    if let Some(original) = normalized_to_original.get(locale) {
        return Some(original.clone());
    }

    let locale_lower = locale.to_lowercase();
    normalized_to_original
        .iter()
        .find(|(normalized, _)| normalized.to_lowercase() == locale_lower)
        .map(|(_, original)| original.clone())
}

/// 查找原始表头对应的规范语言
pub fn normalized_for_header(
    header: &str,
    original_to_normalized: &BTreeMap<String, String>,
) -> Option<String> {
    original_to_normalized.get(&header.to_lowercase()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn every_shape_pattern_compiles() {
        assert!(header_pattern().is_some());
        assert_eq!(locale_patterns().len(), LOCALE_PATTERNS.len());
    }

    #[test]
    fn normalizes_plain_language_codes() {
        assert_eq!(normalize_locale("pl"), "pl-PL");
        assert_eq!(normalize_locale("fr"), "fr-FR");
        assert_eq!(normalize_locale("xx"), "xx-XX");
        assert_eq!(normalize_locale("PL"), "pl-PL");
        assert_eq!(normalize_locale("En"), "en-GB");
        assert_eq!(normalize_locale(" de "), "de-DE");
    }

    #[test]
    fn region_qualified_codes_are_only_lowercased() {
        assert_eq!(normalize_locale("en-US"), "en-us");
        assert_eq!(normalize_locale("pt-BR"), "pt-br");
        assert_eq!(normalize_locale("zh_TW"), "zh_tw");
    }

    #[test]
    fn unnormalizable_input_is_returned_lowercased() {
        assert_eq!(normalize_locale(""), "");
        assert_eq!(normalize_locale("123"), "123");
        assert_eq!(normalize_locale("TooLong"), "toolong");
    }

    #[test]
    fn normalize_is_idempotent_for_region_codes() {
        for raw in ["en-us", "DE-de", "pt_BR", "sr-latn-rs"] {
            let once = normalize_locale(raw);
            assert_eq!(normalize_locale(&once), once);
        }
    }

    #[test]
    fn mapping_keeps_original_spelling() {
        let mapping = build_locale_mapping(&headers(&["key", "en", "pl", "de-DE", "fr-FR"]), "key");

        assert_eq!(mapping.locales, vec!["en-GB", "pl-PL", "de-de", "fr-fr"]);
        assert_eq!(mapping.normalized_to_original["en-GB"], "en");
        assert_eq!(mapping.normalized_to_original["de-de"], "de-DE");
        assert_eq!(mapping.original_to_normalized["de-de"], "de-de");
        assert_eq!(mapping.original_to_normalized["pl"], "pl-PL");
    }

    #[test]
    fn mapping_handles_mixed_case_and_drops_metadata_columns() {
        let mapping = build_locale_mapping(&headers(&["Key", "en", "EN-us", "notes"]), "key");

        assert_eq!(mapping.locales, vec!["en-GB", "en-us"]);
        assert_eq!(mapping.normalized_to_original["en-GB"], "en");
        assert_eq!(mapping.normalized_to_original["en-us"], "EN-us");
        assert!(!mapping.locales.iter().any(|l| l == "notes" || l == "key"));
    }

    #[test]
    fn first_header_wins_for_duplicate_locales() {
        let mapping = build_locale_mapping(&headers(&["key", "EN", "en", "de"]), "KEY");

        assert_eq!(mapping.locales, vec!["en-GB", "de-DE"]);
        assert_eq!(mapping.normalized_to_original["en-GB"], "EN");
    }

    #[test]
    fn resolves_original_header_case_insensitively() {
        let mapping = build_locale_mapping(&headers(&["key", "en", "pl", "de-DE"]), "key");
        let table = &mapping.normalized_to_original;

        assert_eq!(resolve_original_header("en-GB", table).as_deref(), Some("en"));
        assert_eq!(resolve_original_header("PL-pl", table).as_deref(), Some("pl"));
        assert_eq!(resolve_original_header("DE-DE", table).as_deref(), Some("de-DE"));
        assert_eq!(resolve_original_header("es-ES", table), None);
    }

    #[test]
    fn single_header_round_trips_through_mapping() {
        for header in ["en", "PL", "De-At", "pt_br", "xx"] {
            let mapping = build_locale_mapping(&headers(&["key", header]), "key");
            let normalized = normalize_locale(header);
            assert_eq!(
                resolve_original_header(&normalized, &mapping.normalized_to_original).as_deref(),
                Some(header)
            );
            assert_eq!(
                normalized_for_header(header, &mapping.original_to_normalized),
                Some(normalized)
            );
        }
    }

    #[test]
    fn validates_locale_headers() {
        assert!(!is_valid_locale(Some("i18n")));
        assert!(!is_valid_locale(Some("Status")));
        assert!(!is_valid_locale(Some("")));
        assert!(!is_valid_locale(None));
        assert!(is_valid_locale(Some("pt-br")));
        assert!(is_valid_locale(Some("EN")));
        assert!(is_valid_locale(Some("en_us")));
        assert!(is_valid_locale(Some("en-us-traditional")));
        assert!(!is_valid_locale(Some("english")));
    }
}
