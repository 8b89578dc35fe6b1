//! 认证授权模块
//!
//! 提供 JWT 认证和俱乐部角色检查：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`membership`] - 俱乐部成员/管理员检查 (数据驱动，按 club 查库)

pub mod extractor;
pub mod jwt;
pub mod membership;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use membership::{require_active_member, require_club_admin};
pub use middleware::require_auth;
