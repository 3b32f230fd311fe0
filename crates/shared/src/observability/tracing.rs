//! Tracing 初始化
//!
//! 支持人类可读与 JSON 两种输出格式，过滤规则优先读取 `RUST_LOG`。

use anyhow::Result;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::ObservabilityConfig;

/// 构建环境过滤器
///
/// `RUST_LOG` 优先，其次是配置中的级别，两者都无效时回退到 info。
pub fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化 tracing 日志
///
/// 日志写到 stderr，stdout 留给命令输出。重复初始化会返回错误。
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let fmt_layer = if config.json_logs {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt_layer)
        .try_init()?;

    ::tracing::debug!(
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "日志已初始化"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_falls_back_on_invalid_level() {
        let config = ObservabilityConfig {
            log_level: "not a [valid] filter".to_string(),
            json_logs: false,
        };
        // 只要求不 panic，具体级别受 RUST_LOG 影响
        let _ = build_filter(&config);
    }

    #[test]
    fn test_init_twice_fails() {
        let config = ObservabilityConfig::default();
        // 同一进程内其他测试可能已经初始化过，第一次的结果不做要求
        let _ = init(&config);
        assert!(init(&config).is_err());
    }
}
