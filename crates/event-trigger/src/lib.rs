//! Event Trigger
//!
//! 通过调用支付 API 的真实接口序列，在测试模式账户中产生指定的 webhook 事件。
//!
//! # 主要模块
//!
//! - `request` / `response`: 请求描述与响应解码
//! - `executor`: 请求执行器抽象及 HTTP 实现
//! - `scenarios`: 场景定义、通用执行器和预定义调用链
//! - `engine`: 触发器引擎（触发、事件重发、webhook 端点查询）
//! - `cli`: 命令行入口
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use event_trigger::{HttpExecutor, Trigger, TriggerEngine};
//! use trigger_shared::config::AppConfig;
//!
//! let config = AppConfig::load("default")?;
//! let executor = HttpExecutor::from_config(&config.api)?;
//! let engine = TriggerEngine::new(&config.api, &executor);
//!
//! engine.trigger(Trigger::ChargeCaptured).await?;
//! engine.resend_event("evt_1234567890").await?;
//! ```

pub mod cli;
pub mod engine;
pub mod executor;
pub mod fixtures;
pub mod request;
pub mod response;
pub mod scenarios;
pub mod trigger;
pub mod webhooks;

#[cfg(test)]
mod test_support;

pub use engine::TriggerEngine;
pub use executor::{HttpExecutor, RequestExecutor};
pub use request::{HttpMethod, RequestDescriptor};
pub use response::ApiObject;
pub use trigger::Trigger;
