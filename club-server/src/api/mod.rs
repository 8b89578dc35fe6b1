//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口 (register/login)
//! - [`books`] - 图书与个人书架接口
//! - [`reviews`] - 书评接口
//! - [`recommendations`] - 荐书接口
//! - [`clubs`] - 俱乐部、当前阅读与历史接口
//! - [`voting`] - 选书投票接口
//! - [`meetings`] - 俱乐部会议接口
//! - [`achievements`] - 成就接口

pub mod achievements;
pub mod auth;
pub mod books;
pub mod clubs;
pub mod health;
pub mod meetings;
pub mod recommendations;
pub mod reviews;
pub mod voting;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
