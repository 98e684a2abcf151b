// ============================================================================
// SheetLoc - 延迟工具
// ============================================================================
//
// 文件: src/utils/delay.rs
// 职责: 远程调用之间的固定间隔等待
// 边界:
//   - ✅ 异步睡眠
//   - ✅ 等待原因的诊断日志
//   - ❌ 不应包含重试或退避
//
// ============================================================================

use std::time::Duration;

/// 等待指定秒数，非正数或非有限值立即返回
pub async fn wait(seconds: f64, reason: &str) {
    if !seconds.is_finite() || seconds <= 0.0 {
        return;
    }
    tracing::debug!(seconds, reason, "waiting");
    tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
}
