// ============================================================================
// SheetLoc - 日志工具
// ============================================================================
//
// 文件: src/utils/logger.rs
// 职责: 面向用户的控制台输出
// 边界:
//   - ✅ 日志级别前缀与着色
//   - ✅ 控制台输出（stdout / stderr）
//   - ❌ 不应包含诊断日志（使用 tracing）
//   - ❌ 不应包含文件日志写入
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

use super::colors::Colors;

/// 简单的日志工具
pub struct Logger;

impl Logger {
    pub fn info<S: AsRef<str>>(msg: S) {
        println!("{} {}", Colors::info("[SHEETLOC]"), msg.as_ref());
    }

    pub fn warn<S: AsRef<str>>(msg: S) {
        println!("{} {}", Colors::warn("[WARN]"), msg.as_ref());
    }

    pub fn error<S: AsRef<str>>(msg: S) {
        eprintln!("{} {}", Colors::error("[ERROR]"), msg.as_ref());
    }

    pub fn success<S: AsRef<str>>(msg: S) {
        println!("{} {}", Colors::success("[SHEETLOC]"), msg.as_ref());
    }

    /// 次要信息，仅在详细模式下输出
    pub fn detail<S: AsRef<str>>(msg: S) {
        if crate::models::config::Config::get_verbose() {
            println!("{} {}", Colors::dim("[SHEETLOC]"), msg.as_ref());
        }
    }
}
