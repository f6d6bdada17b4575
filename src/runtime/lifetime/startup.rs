use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 准备服务器启动的上下文
/// 连接数据库并完成迁移
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    info!(
        "Quiz policy: max_attempts={}, max_questions={}, max_choices={}, submit_rate_limit={}/min",
        config.quiz.max_attempts,
        config.quiz.max_questions,
        config.quiz.max_choices,
        config.quiz.submit_rate_limit
    );

    if config.is_production() && config.jwt.secret == "change-me-in-production" {
        warn!("JWT secret is still the default value, set JWT_SECRET before going live");
    }

    Ok(StartupContext { storage })
}
