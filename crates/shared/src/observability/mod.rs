//! 可观测性模块
//!
//! 提供日志的统一初始化。所有入口通过单一函数配置 tracing subscriber，
//! 保证日志格式和过滤规则一致。

pub mod tracing;

pub use self::tracing::init;
