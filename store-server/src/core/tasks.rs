//! 后台任务管理
//!
//! 统一管理后台任务的注册、启动和关闭。

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 已注册的后台任务
struct RegisteredTask {
    /// 任务名称
    name: &'static str,
    /// 任务句柄
    handle: JoinHandle<()>,
}

/// 后台任务管理器
///
/// # 使用示例
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new(shutdown_token);
/// tasks.spawn("outbound_queue", async move { /* ... */ });
/// // Graceful shutdown
/// tasks.shutdown().await;
/// ```
pub struct BackgroundTasks {
    /// 已注册的任务列表
    tasks: Vec<RegisteredTask>,
    /// 全局取消令牌
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            tasks: Vec::new(),
            shutdown,
        }
    }

    /// 注册并启动一个后台任务
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        tracing::info!(task = name, "background task started");
        self.tasks.push(RegisteredTask {
            name,
            handle: tokio::spawn(future),
        });
    }

    /// 取消所有任务并等待退出
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        for task in self.tasks {
            match tokio::time::timeout(std::time::Duration::from_secs(5), task.handle).await {
                Ok(Ok(())) => tracing::info!(task = task.name, "background task stopped"),
                Ok(Err(e)) => tracing::warn!(task = task.name, error = %e, "background task panicked"),
                Err(_) => tracing::warn!(task = task.name, "background task shutdown timed out"),
            }
        }
    }
}
