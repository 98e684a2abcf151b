// ============================================================================
// SheetLoc - 国际化模块
// ============================================================================
//
// 文件: src/i18n/mod.rs
// 职责: 界面消息的翻译管理
// 边界:
//   - ✅ 翻译表查找
//   - ✅ 翻译宏定义和实现
//   - ✅ 参数化翻译支持（顺序 `{}` 与位置 `{0}` 占位符）
//   - ❌ 不应包含具体翻译内容
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

pub mod en_us;
pub mod zh_cn;

/// 获取翻译文本
pub fn get_translation(key: &str) -> String {
    // 每次都从配置获取语言设置
    let language = get_language_from_config().unwrap_or_else(|| "en_us".to_string());
    lookup(&language, key)
}

fn lookup(language: &str, key: &str) -> String {
    let translation_data = match language {
        "zh_cn" => zh_cn::TRANSLATIONS,
        _ => en_us::TRANSLATIONS, // 默认使用英文
    };

    translation_data
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
        .unwrap_or_else(|| format!("Unknown translation key: {}", key))
}

/// 从配置获取语言设置
fn get_language_from_config() -> Option<String> {
    use crate::models::config::Config;

    // 配置未初始化时返回 None
    Config::get_language().ok()
}

/// 简单翻译宏
#[macro_export]
macro_rules! t {
    ($key:expr) => {
        $crate::i18n::get_translation($key)
    };
}

/// 带参数翻译的辅助函数
///
/// 先替换位置占位符 `{0}`、`{1}`，再按顺序替换剩余的 `{}`。
pub fn format_with_args(template: String, args: Vec<String>) -> String {
    let mut result = template;
    for (index, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", index), arg);
    }
    let mut search_from = 0;
    for arg in args.iter() {
        // 替换下一个 {} 占位符
        match result[search_from..].find("{}") {
            Some(offset) => {
                let pos = search_from + offset;
                result.replace_range(pos..pos + 2, arg);
                search_from = pos + arg.len();
            }
            None => break,
        }
    }
    result
}

/// 带参数的翻译宏
#[macro_export]
macro_rules! tf {
    ($key:expr, $($arg:expr),*) => {{
        let template = $crate::i18n::get_translation($key);
        let args = vec![$(format!("{}", $arg)),*];
        $crate::i18n::format_with_args(template, args)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn keys(table: &[(&str, &str)]) -> BTreeSet<String> {
        table.iter().map(|(k, _)| k.to_string()).collect()
    }

    #[test]
    fn both_tables_define_the_same_keys() {
        assert_eq!(keys(en_us::TRANSLATIONS), keys(zh_cn::TRANSLATIONS));
    }

    #[test]
    fn sequential_and_positional_placeholders() {
        assert_eq!(
            format_with_args("{} of {}".to_string(), vec!["1".into(), "2".into()]),
            "1 of 2"
        );
        assert_eq!(
            format_with_args("{1} <- {0}".to_string(), vec!["a".into(), "b".into()]),
            "b <- a"
        );
        // 参数本身包含 {} 时不会被再次替换
        assert_eq!(
            format_with_args("{}: {}".to_string(), vec!["{}".into(), "x".into()]),
            "{}: x"
        );
    }

    #[test]
    fn unknown_keys_and_languages_fall_back() {
        assert_eq!(lookup("en_us", "nope"), "Unknown translation key: nope");
        assert_eq!(lookup("fr_fr", "init.start"), lookup("en_us", "init.start"));
        assert_ne!(lookup("zh_cn", "init.start"), lookup("en_us", "init.start"));
    }
}
