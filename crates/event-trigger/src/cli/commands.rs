//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。
//! 全局选项覆盖配置文件和环境变量中的同名项。

use clap::{Parser, Subcommand, ValueEnum};

/// Webhook 事件触发工具
///
/// 在测试模式账户中执行真实的 API 调用序列，产生指定的 webhook 事件。
/// 使用 `--help` 查看各子命令的详细说明。
#[derive(Parser, Debug)]
#[command(name = "event-trigger")]
#[command(version, about = "在测试模式账户中触发 webhook 事件")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，未指定时使用配置文件
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// 输出 JSON 格式日志
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// 配置档案，对应 config/<profile>.toml
    #[arg(short, long, global = true, default_value = "default")]
    pub profile: String,

    /// 测试模式密钥，覆盖配置
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// API 地址，覆盖配置
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// API 版本，覆盖配置
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 触发 webhook 事件
    ///
    /// 指定事件名时执行预定义调用链，指定 `--file` 时执行文件中的场景。
    Trigger {
        /// 事件名，如 charge.captured
        #[arg(required_unless_present = "file")]
        event: Option<String>,

        /// 场景文件路径（JSON/YAML）
        #[arg(short, long, conflicts_with = "event")]
        file: Option<String>,
    },

    /// 列出所有支持的事件
    List,

    /// 查看事件对应的调用链
    ///
    /// 指定 `--export` 时输出可供 `trigger --file` 使用的场景文件内容。
    Describe {
        /// 事件名
        event: String,

        /// 以场景文件格式输出
        #[arg(short, long, value_enum)]
        export: Option<ExportFormat>,
    },

    /// 重发 webhook 事件
    Resend {
        /// 事件 ID，如 evt_1234567890
        event_id: String,
    },

    /// 查询 webhook 端点
    Webhooks {
        /// 只显示订阅了该事件的端点
        #[arg(short, long)]
        event: Option<String>,
    },
}

/// 场景文件格式
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
}

// ============================================================================
// 单元测试
// ============================================================================
