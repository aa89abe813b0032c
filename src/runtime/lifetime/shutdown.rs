use tokio::signal;
use tracing::{error, warn};

pub async fn listen_for_shutdown() {
    // 等待 Ctrl+C 信号
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        // 无法监听信号时不主动退出，交由服务器自身结束
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");
}
