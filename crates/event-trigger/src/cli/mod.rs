//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `trigger` - 触发预定义事件，或执行自定义场景文件
//! - `list` - 列出支持的事件
//! - `describe` - 查看事件对应的调用链
//! - `resend` - 重发已有的 webhook 事件
//! - `webhooks` - 查询账户下的 webhook 端点
//!
//! # 使用示例
//!
//! ```bash
//! # 触发事件
//! event-trigger trigger charge.captured
//!
//! # 执行自定义场景
//! event-trigger trigger --file scenarios/refund.yaml
//!
//! # 重发事件
//! event-trigger --profile staging resend evt_1234567890
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands, ExportFormat};
pub use runner::CommandRunner;
