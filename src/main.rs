// ============================================================================
// SheetLoc - 程序入口
// ============================================================================
//
// 文件: src/main.rs
// 职责: 初始化诊断日志与全局配置，启动 CLI
// 边界:
//   - ✅ tracing 订阅器安装
//   - ✅ 全局配置初始化
//   - ❌ 不应包含命令实现
//
// ============================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use sheetloc::cli::{self, Cli};
use sheetloc::models::config::{Config, DEFAULT_CONFIG_FILE};
use sheetloc::utils::logger::Logger;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "sheetloc=debug" } else { "sheetloc=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if let Err(e) = Config::initialize(&config_path) {
        Logger::error(format!("{}: {:#}", config_path.display(), e));
        return ExitCode::FAILURE;
    }

    match cli::run_cli(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Logger::error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
