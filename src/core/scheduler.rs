// ============================================================================
// SheetLoc - 异步任务调度器
// ============================================================================
//
// 文件: src/core/scheduler.rs
// 职责: 通用异步任务调度和并发控制
// 边界:
//   - ✅ 异步任务并发执行（fan-out / join）
//   - ✅ 并发数量控制
//   - ✅ 单任务结果收集（失败与 panic 不影响其它任务）
//   - ❌ 不包含具体业务逻辑
//   - ❌ 不包含取消和超时
//   - ❌ 不包含结果合并
//
// ============================================================================

use crate::tf;
use crate::utils::logger::Logger;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// 任务执行结果枚举
#[derive(Debug, Clone, PartialEq)]
pub enum TaskResult<T> {
    /// 任务执行成功
    Success(T),
    /// 任务执行失败
    Failed(String),
}

impl<T> TaskResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success(_))
    }
}

/// 调度器配置
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// 最大并发任务数
    pub max_concurrency: usize,
    /// 是否显示详细日志
    pub verbose: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: num_cpus::get(),
            verbose: false,
        }
    }
}

/// 异步任务调度器
pub struct AsyncTaskScheduler {
    /// 调度器配置
    config: SchedulerConfig,
    /// 并发控制信号量
    semaphore: Arc<Semaphore>,
}

impl AsyncTaskScheduler {
    /// 创建新的调度器
    pub fn new(config: SchedulerConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        Self { config, semaphore }
    }

    /// 执行单个异步任务
    pub async fn execute_task<T, F>(&self, task_id: String, task: F) -> TaskResult<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        // 获取信号量许可
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(e) => return TaskResult::Failed(e.to_string()),
        };

        let start_time = Instant::now();
        if self.config.verbose {
            Logger::detail(tf!("scheduler.task_start", &task_id));
        }

        let result = match task.await {
            Ok(value) => TaskResult::Success(value),
            Err(e) => TaskResult::Failed(format!("{e:#}")),
        };

        let duration = start_time.elapsed();
        match &result {
            TaskResult::Success(_) => {
                tracing::debug!(task = %task_id, elapsed = ?duration, "task finished");
            }
            TaskResult::Failed(err) => {
                Logger::error(tf!(
                    "scheduler.task_failed",
                    &task_id,
                    format!("{:.2}", duration.as_secs_f64()),
                    err
                ));
            }
        }

        result
    }

    /// 并发执行多个任务，结果按提交顺序返回
    pub async fn execute_batch<T, F>(&self, tasks: Vec<(String, F)>) -> Vec<(String, TaskResult<T>)>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        if tasks.is_empty() {
            return Vec::new();
        }

        if self.config.verbose {
            Logger::detail(tf!("scheduler.batch_start", tasks.len()));
        }

        // 创建任务句柄
        let mut handles: Vec<(String, JoinHandle<TaskResult<T>>)> = Vec::new();

        for (task_id, task) in tasks {
            let scheduler = self.clone_for_task();
            let task_id_clone = task_id.clone();

            let handle =
                tokio::spawn(async move { scheduler.execute_task(task_id_clone, task).await });

            handles.push((task_id, handle));
        }

        // 等待所有任务完成
        let mut results = Vec::new();
        for (task_id, handle) in handles {
            match handle.await {
                Ok(result) => results.push((task_id, result)),
                Err(e) => {
                    Logger::error(tf!("scheduler.task_join_error", &task_id, e));
                    results.push((task_id, TaskResult::Failed(e.to_string())));
                }
            }
        }

        if self.config.verbose {
            let success_count = results.iter().filter(|(_, result)| result.is_success()).count();
            Logger::detail(tf!("scheduler.batch_complete", success_count, results.len()));
        }

        results
    }

    /// 为任务执行创建调度器克隆
    fn clone_for_task(&self) -> Self {
        Self {
            config: self.config.clone(),
            semaphore: Arc::clone(&self.semaphore),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn results_keep_submission_order_and_isolate_failures() {
        let scheduler = AsyncTaskScheduler::new(SchedulerConfig {
            max_concurrency: 4,
            verbose: false,
        });

        let tasks: Vec<(String, _)> = (0..3)
            .map(|i| {
                let task = async move {
                    tokio::time::sleep(Duration::from_millis(10 * (3 - i) as u64)).await;
                    if i == 1 {
                        anyhow::bail!("boom");
                    }
                    Ok::<i32, anyhow::Error>(i)
                };
                (format!("task-{i}"), task)
            })
            .collect();

        let results = scheduler.execute_batch(tasks).await;

        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["task-0", "task-1", "task-2"]);
        assert_eq!(results[0].1, TaskResult::Success(0));
        assert!(matches!(&results[1].1, TaskResult::Failed(msg) if msg.contains("boom")));
        assert_eq!(results[2].1, TaskResult::Success(2));
    }

    #[tokio::test]
    async fn concurrency_is_bounded_by_the_semaphore() {
        let scheduler = AsyncTaskScheduler::new(SchedulerConfig {
            max_concurrency: 2,
            verbose: false,
        });
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<(String, _)> = (0..6)
            .map(|i| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                let task = async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok::<(), anyhow::Error>(())
                };
                (format!("task-{i}"), task)
            })
            .collect();

        let results = scheduler.execute_batch(tasks).await;

        assert_eq!(results.len(), 6);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }
}
