//! Club Server - 读书俱乐部后端
//!
//! # 模块结构
//!
//! ```text
//! club-server/src/
//! ├── core/          # 配置、状态、服务器启动
//! ├── auth/          # JWT 认证、俱乐部角色检查
//! ├── db/            # SQLite 连接池与仓储层
//! ├── voting/        # 选书投票状态机
//! ├── meetings/      # 会议生命周期 (出席预填)
//! ├── achievements/  # 成就规则引擎
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、校验、时间、日志工具
//! ```

pub mod achievements;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod meetings;
pub mod utils;
pub mod voting;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ________      __
  / ____/ /_  __/ /_
 / /   / / / / / __ \
/ /___/ / /_/ / /_/ /
\____/_/\__,_/_.___/  server
"#
    );
}
