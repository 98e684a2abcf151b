// ============================================================================
// SheetLoc - CLI 模块
// ============================================================================
//
// 文件: src/cli/mod.rs
// 职责: CLI 命令行接口模块入口和路由
// 边界:
//   - ✅ CLI 结构定义和命令枚举
//   - ✅ 命令行参数到运行时配置的转换
//   - ✅ 命令路由分发
//   - ❌ 不应包含具体命令实现逻辑
//   - ❌ 不应包含同步算法
//
// ============================================================================

pub mod diff;
pub mod init;
pub mod sync;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::models::config::{Config, Credentials, RuntimeArgs, DEFAULT_CONFIG_FILE};
use crate::remote::sheets_api::SheetsApiDocument;
use crate::remote::SpreadsheetDocument;
use diff::{handle_diff, DiffArgs};
use init::{handle_init, InitArgs};
use sync::{handle_sync, SyncArgs};

/// SheetLoc - Google Sheets translation sync
#[derive(Debug, Parser)]
#[command(name = "sheetloc")]
#[command(about = "Bidirectional sync between Google Sheets and local JSON translation files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path (default: sheetloc.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Global verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Interface language (zh_cn, en_us)
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Commands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 配置文件路径
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch sheets, push newer local keys and write translation files
    Sync(SyncArgs),
    /// Show local keys missing from the spreadsheet (dry run)
    Diff(DiffArgs),
    /// Initialize configuration file
    Init(InitArgs),
}

pub async fn run_cli(cli: Cli) -> Result<()> {
    // Build runtime args to override config
    let runtime_args = build_runtime_args(&cli);
    // Merge runtime args to global config
    Config::merge_runtime_args(runtime_args)?;

    let config_path = cli.config_path();
    match cli.command {
        Commands::Sync(args) => handle_sync(args).await,
        Commands::Diff(args) => handle_diff(args).await,
        Commands::Init(args) => handle_init(args, &config_path),
    }
}

/// Build runtime args from CLI arguments
fn build_runtime_args(cli: &Cli) -> RuntimeArgs {
    let mut args = RuntimeArgs {
        verbose: if cli.verbose { Some(true) } else { None },
        colored: if cli.no_color { Some(false) } else { None },
        language: cli.language.clone(),
        ..Default::default()
    };

    match &cli.command {
        Commands::Sync(sync) => sync.apply_to(&mut args),
        Commands::Diff(diff) => {
            if !diff.sheets.is_empty() {
                args.sheets = Some(diff.sheets.clone());
            }
        }
        Commands::Init(_) => {}
    }

    args
}

/// 校验凭据并连接远程表格
fn connect() -> Result<Arc<dyn SpreadsheetDocument>> {
    let credentials = Credentials::from_env()?;
    tracing::debug!(?credentials, "credentials loaded");
    let doc = SheetsApiDocument::from_credentials(&credentials)
        .context("failed to create spreadsheet client")?;
    Ok(Arc::new(doc))
}
