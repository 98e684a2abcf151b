// ============================================================================
// SheetLoc - 配置数据模型
// ============================================================================
//
// 文件: src/models/config.rs
// 职责: 配置文件数据结构定义和操作
// 边界:
//   - ✅ 配置文件数据结构定义
//   - ✅ 配置序列化/反序列化
//   - ✅ 配置默认值与运行时参数合并
//   - ✅ 凭据环境变量校验
//   - ✅ 同步选项生成
//   - ❌ 不应包含同步逻辑
//   - ❌ 不应包含 CLI 参数解析
//   - ❌ 不应包含远程表格访问
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::models::error::SyncError;

/// 全局配置管理器
static GLOBAL_CONFIG: std::sync::OnceLock<Arc<RwLock<Config>>> = std::sync::OnceLock::new();

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "sheetloc.toml";

/// 凭据环境变量
pub const ENV_CLIENT_EMAIL: &str = "GOOGLE_CLIENT_EMAIL";
pub const ENV_PRIVATE_KEY: &str = "GOOGLE_PRIVATE_KEY";
pub const ENV_SPREADSHEET_ID: &str = "GOOGLE_SPREADSHEET_ID";
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_ACCESS_TOKEN";

/// SheetLoc 配置文件结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 表格配置
    #[serde(default)]
    pub spreadsheet: SpreadsheetConfig,
    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
    /// 同步配置
    #[serde(default)]
    pub sync: SyncConfig,
    /// 国际化配置
    #[serde(default)]
    pub i18n: I18nConfig,
}

/// 表格配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadsheetConfig {
    /// 需要处理的工作表标题
    #[serde(default)]
    pub sheets: Vec<String>,
    /// 每个工作表最多读取的行数
    #[serde(default = "Config::default_row_limit")]
    pub row_limit: usize,
    /// 远程调用之间的等待秒数
    #[serde(default = "Config::default_wait_seconds")]
    pub wait_seconds: f64,
    /// 并发读取工作表的最大数量
    #[serde(default = "Config::default_max_concurrency")]
    pub max_concurrency: usize,
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 聚合语言数据文件路径
    #[serde(default = "Config::default_data_json_path")]
    pub data_json_path: PathBuf,
    /// 语言列表文件路径
    #[serde(default = "Config::default_locales_output_path")]
    pub locales_output_path: PathBuf,
    /// 各语言 JSON 输出目录
    #[serde(default = "Config::default_translations_output_dir")]
    pub translations_output_dir: PathBuf,
    /// 是否详细输出
    #[serde(default)]
    pub verbose: bool,
    /// 是否彩色输出
    #[serde(default = "Config::default_colored")]
    pub colored: bool,
}

/// 同步配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// 是否把本地新增内容推送到表格
    #[serde(default = "Config::default_sync_local_changes")]
    pub sync_local_changes: bool,
    /// 是否为缺失翻译生成 GOOGLETRANSLATE 公式
    #[serde(default)]
    pub auto_translate: bool,
}

/// 国际化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// 界面语言
    #[serde(default = "Config::default_language")]
    pub language: String,
}

/// CLI 运行时参数（用于覆盖配置文件）
#[derive(Debug, Clone, Default)]
pub struct RuntimeArgs {
    pub sheets: Option<Vec<String>>,
    pub row_limit: Option<usize>,
    pub wait_seconds: Option<f64>,
    pub data_json_path: Option<PathBuf>,
    pub locales_output_path: Option<PathBuf>,
    pub translations_output_dir: Option<PathBuf>,
    pub sync_local_changes: Option<bool>,
    pub auto_translate: Option<bool>,
    pub verbose: Option<bool>,
    pub colored: Option<bool>,
    pub language: Option<String>,
}

/// 同步流程使用的选项（已应用默认值）
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    pub row_limit: usize,
    pub wait_seconds: f64,
    pub data_json_path: PathBuf,
    pub locales_output_path: PathBuf,
    pub translations_output_dir: PathBuf,
    pub sync_local_changes: bool,
    pub auto_translate: bool,
    pub max_concurrency: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Config::default().sync_options()
    }
}

/// 表格服务账号凭据
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_email: String,
    pub private_key: String,
    pub spreadsheet_id: String,
    /// 预先签发的 OAuth 访问令牌
    pub access_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("has_access_token", &self.access_token.is_some())
            .finish()
    }
}

impl Credentials {
    /// 从进程环境变量读取
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过查找函数读取，缺失或为空的变量全部列出
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let required = [ENV_CLIENT_EMAIL, ENV_PRIVATE_KEY, ENV_SPREADSHEET_ID];
        let missing: Vec<String> = required
            .into_iter()
            .filter(|&name| read(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SyncError::MissingCredentials(missing));
        }

        Ok(Self {
            client_email: read(ENV_CLIENT_EMAIL).unwrap_or_default(),
            // .env 文件中的私钥通常以 \n 转义保存
            private_key: read(ENV_PRIVATE_KEY)
                .unwrap_or_default()
                .replace("\\n", "\n"),
            spreadsheet_id: read(ENV_SPREADSHEET_ID).unwrap_or_default(),
            access_token: read(ENV_ACCESS_TOKEN),
        })
    }
}

/// 配置默认值 trait - 不依赖全局配置初始化
pub trait ConfigDefaults {
    /// 获取默认行数上限
    fn default_row_limit() -> usize {
        100
    }

    /// 获取默认等待秒数
    fn default_wait_seconds() -> f64 {
        1.0
    }

    /// 获取默认最大并发数
    fn default_max_concurrency() -> usize {
        num_cpus::get()
    }

    /// 获取默认聚合文件路径
    fn default_data_json_path() -> PathBuf {
        PathBuf::from("src/lib/languageData.json")
    }

    /// 获取默认语言列表文件路径
    fn default_locales_output_path() -> PathBuf {
        PathBuf::from("src/i18n/locales.ts")
    }

    /// 获取默认翻译输出目录
    fn default_translations_output_dir() -> PathBuf {
        PathBuf::from("translations")
    }

    /// 获取默认是否同步本地修改
    fn default_sync_local_changes() -> bool {
        true
    }

    /// 获取默认是否彩色输出
    fn default_colored() -> bool {
        true
    }

    /// 获取默认语言
    fn default_language() -> String {
        "en_us".to_string()
    }
}

impl ConfigDefaults for Config {}

impl Config {
    /// 初始化全局配置（程序启动时调用）
    pub fn initialize(config_path: &Path) -> anyhow::Result<()> {
        let config = Self::load_config(config_path)?;
        GLOBAL_CONFIG
            .set(Arc::new(RwLock::new(config)))
            .map_err(|_| anyhow::anyhow!("Global config already initialized"))?;
        Ok(())
    }

    /// 加载配置文件，不存在时使用默认配置
    pub fn load_config(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 把运行时参数应用到配置
    pub fn apply_runtime_args(&mut self, args: RuntimeArgs) {
        if let Some(sheets) = args.sheets {
            self.spreadsheet.sheets = sheets;
        }
        if let Some(row_limit) = args.row_limit {
            self.spreadsheet.row_limit = row_limit;
        }
        if let Some(wait_seconds) = args.wait_seconds {
            self.spreadsheet.wait_seconds = wait_seconds;
        }
        if let Some(path) = args.data_json_path {
            self.output.data_json_path = path;
        }
        if let Some(path) = args.locales_output_path {
            self.output.locales_output_path = path;
        }
        if let Some(dir) = args.translations_output_dir {
            self.output.translations_output_dir = dir;
        }
        if let Some(sync_local_changes) = args.sync_local_changes {
            self.sync.sync_local_changes = sync_local_changes;
        }
        if let Some(auto_translate) = args.auto_translate {
            self.sync.auto_translate = auto_translate;
        }
        if let Some(verbose) = args.verbose {
            self.output.verbose = verbose;
        }
        if let Some(colored) = args.colored {
            self.output.colored = colored;
        }
        if let Some(language) = args.language {
            self.i18n.language = language;
        }
    }

    /// 合并运行时参数到全局配置
    pub fn merge_runtime_args(args: RuntimeArgs) -> anyhow::Result<()> {
        let global_config = GLOBAL_CONFIG
            .get()
            .ok_or_else(|| anyhow::anyhow!("Global config not initialized"))?;

        let mut config = global_config
            .write()
            .map_err(|_| anyhow::anyhow!("Failed to acquire config write lock"))?;

        config.apply_runtime_args(args);
        Ok(())
    }

    /// 获取全局配置快照
    pub fn current() -> anyhow::Result<Self> {
        let global_config = GLOBAL_CONFIG
            .get()
            .ok_or_else(|| anyhow::anyhow!("Global config not initialized"))?;

        let config = global_config
            .read()
            .map_err(|_| anyhow::anyhow!("Failed to acquire config read lock"))?;

        Ok(config.clone())
    }

    /// 生成同步选项
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            row_limit: self.spreadsheet.row_limit,
            wait_seconds: self.spreadsheet.wait_seconds.max(0.0),
            data_json_path: self.output.data_json_path.clone(),
            locales_output_path: self.output.locales_output_path.clone(),
            translations_output_dir: self.output.translations_output_dir.clone(),
            sync_local_changes: self.sync.sync_local_changes,
            auto_translate: self.sync.auto_translate,
            max_concurrency: self.spreadsheet.max_concurrency.max(1),
        }
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// 生成默认配置模板
    pub fn generate_default_template() -> Self {
        let mut config = Self::default();
        config.spreadsheet.sheets = vec!["home".to_string(), "common".to_string()];
        config
    }

    /// 生成默认配置模板并保存到文件
    pub fn create_default_config_file(config_path: &Path) -> anyhow::Result<()> {
        Self::generate_default_template().save_to_file(config_path)
    }

    /// 获取界面语言
    pub fn get_language() -> anyhow::Result<String> {
        Ok(Self::current()?.i18n.language)
    }

    /// 获取详细输出设置（带默认值）
    pub fn get_verbose() -> bool {
        Self::current()
            .map(|config| config.output.verbose)
            .unwrap_or(false)
    }

    /// 获取是否彩色输出（带默认值）
    pub fn get_colored() -> bool {
        Self::current()
            .map(|config| config.output.colored)
            .unwrap_or_else(|_| Self::default_colored())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet: SpreadsheetConfig::default(),
            output: OutputConfig::default(),
            sync: SyncConfig::default(),
            i18n: I18nConfig::default(),
        }
    }
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            sheets: Vec::new(),
            row_limit: Config::default_row_limit(),
            wait_seconds: Config::default_wait_seconds(),
            max_concurrency: Config::default_max_concurrency(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_json_path: Config::default_data_json_path(),
            locales_output_path: Config::default_locales_output_path(),
            translations_output_dir: Config::default_translations_output_dir(),
            verbose: false,
            colored: Config::default_colored(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sync_local_changes: Config::default_sync_local_changes(),
            auto_translate: false,
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language: Config::default_language(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_match_documented_surface() {
        let options = Config::default().sync_options();
        assert_eq!(options.row_limit, 100);
        assert_eq!(options.wait_seconds, 1.0);
        assert!(options.sync_local_changes);
        assert!(!options.auto_translate);
        assert_eq!(options.translations_output_dir, PathBuf::from("translations"));
        assert_eq!(options.data_json_path, PathBuf::from("src/lib/languageData.json"));
        assert!(options.max_concurrency >= 1);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [spreadsheet]
            sheets = ["home"]
            wait_seconds = 0.5

            [sync]
            auto_translate = true
            "#,
        )
        .unwrap();

        assert_eq!(config.spreadsheet.sheets, vec!["home"]);
        assert_eq!(config.spreadsheet.row_limit, 100);
        assert_eq!(config.spreadsheet.wait_seconds, 0.5);
        assert!(config.sync.auto_translate);
        assert!(config.sync.sync_local_changes);
        assert_eq!(config.i18n.language, "en_us");
    }

    #[test]
    fn runtime_args_override_loaded_values() {
        let mut config = Config::default();
        config.apply_runtime_args(RuntimeArgs {
            sheets: Some(vec!["about".to_string()]),
            sync_local_changes: Some(false),
            row_limit: Some(10),
            ..Default::default()
        });

        let options = config.sync_options();
        assert_eq!(config.spreadsheet.sheets, vec!["about"]);
        assert!(!options.sync_local_changes);
        assert_eq!(options.row_limit, 10);
        assert_eq!(options.wait_seconds, 1.0);
    }

    #[test]
    fn template_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DEFAULT_CONFIG_FILE);
        Config::create_default_config_file(&path).unwrap();

        let loaded = Config::load_config(&path).unwrap();
        assert_eq!(loaded.spreadsheet.sheets, vec!["home", "common"]);
        assert_eq!(loaded.output.locales_output_path, PathBuf::from("src/i18n/locales.ts"));
    }

    #[test]
    fn missing_credentials_are_all_reported() {
        let vars = env(&[(ENV_PRIVATE_KEY, "key"), (ENV_CLIENT_EMAIL, "  ")]);
        let err = Credentials::from_lookup(|name| vars.get(name).cloned()).unwrap_err();
        match err {
            SyncError::MissingCredentials(missing) => {
                assert_eq!(missing, vec![ENV_CLIENT_EMAIL, ENV_SPREADSHEET_ID]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn credentials_unescape_private_key_newlines() {
        let vars = env(&[
            (ENV_CLIENT_EMAIL, "bot@example.iam.gserviceaccount.com"),
            (ENV_PRIVATE_KEY, "-----BEGIN-----\\nabc\\n-----END-----"),
            (ENV_SPREADSHEET_ID, "sheet-id"),
        ]);
        let credentials = Credentials::from_lookup(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(credentials.private_key, "-----BEGIN-----\nabc\n-----END-----");
        assert_eq!(credentials.access_token, None);
        assert!(!format!("{credentials:?}").contains("abc"));
    }
}
