//! 命令执行器
//!
//! 负责执行各 CLI 子命令的具体逻辑。
//! 将命令行参数合并进配置，构建执行器和引擎，并把结果打印到 stdout。

use anyhow::{Context, Result};
use tracing::{info, warn};

use trigger_shared::config::AppConfig;

use super::commands::{Cli, ExportFormat};
use crate::engine::TriggerEngine;
use crate::executor::HttpExecutor;
use crate::fixtures::FundingSource;
use crate::scenarios::{PredefinedScenarios, Scenario};
use crate::trigger::Trigger;
use crate::webhooks::{WebhookEndpoint, WebhookEndpointList};

/// 命令执行器
///
/// 持有合并后的应用配置，作为 CLI 与引擎之间的桥梁。
pub struct CommandRunner {
    config: AppConfig,
}

impl CommandRunner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 按 CLI 指定的档案加载配置，并应用命令行覆盖项
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = AppConfig::load(&cli.profile)
            .with_context(|| format!("加载配置失败: profile={}", cli.profile))?;
        apply_overrides(&mut config, cli);
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 构建 HTTP 执行器，要求已配置密钥
    fn http_executor(&self) -> Result<HttpExecutor> {
        self.config.api.ensure_api_key()?;
        let executor = HttpExecutor::from_config(&self.config.api).context("创建 HTTP 客户端失败")?;
        info!(
            profile = %self.config.api.profile,
            api_key = %self.config.api.masked_api_key(),
            api_base = %self.config.api.api_base_url,
            "使用 API 配置"
        );
        Ok(executor)
    }

    /// 执行 trigger 命令
    ///
    /// 优先执行场景文件，否则按事件名执行预定义场景。
    pub async fn run_trigger(&self, event: Option<&str>, file: Option<&str>) -> Result<()> {
        let scenario = match (file, event) {
            (Some(path), _) => {
                let scenario = Scenario::load_from_file(path)
                    .with_context(|| format!("加载场景文件失败: {}", path))?;
                info!(scenario = %scenario.name, path, "从文件加载场景");
                scenario
            }
            (None, Some(name)) => PredefinedScenarios::for_trigger(name.parse::<Trigger>()?),
            (None, None) => anyhow::bail!("需要指定事件名或 --file"),
        };

        let executor = self.http_executor()?;
        let engine = TriggerEngine::new(&self.config.api, &executor);
        let outcome = engine.run_scenario(&scenario).await?;

        println!(
            "Trigger succeeded! Check dashboard for event details. ({} requests, {} ms)",
            outcome.steps_executed, outcome.duration_ms
        );
        Ok(())
    }

    /// 执行 list 命令
    pub fn run_list(&self) {
        println!("Supported events:");
        for scenario in PredefinedScenarios::all() {
            println!("  {:<32} {}", scenario.name, scenario.description);
        }
    }

    /// 执行 describe 命令，打印调用链但不发出请求
    pub fn run_describe(&self, event: &str, export: Option<ExportFormat>) -> Result<()> {
        let trigger: Trigger = event.parse()?;
        let scenario = PredefinedScenarios::for_trigger(trigger);

        if let Some(format) = export {
            println!("{}", export_scenario(&scenario, format)?);
            return Ok(());
        }

        println!("{} - {}", scenario.name, scenario.description);
        for (index, step) in scenario.steps.iter().enumerate() {
            println!("  {}. {} {}", index + 1, step.method, step.path);
            if !step.params.is_empty() {
                println!("       {}", step.params.join("&"));
            }
            for source in step
                .params
                .iter()
                .filter_map(|p| p.strip_prefix("source="))
                .filter_map(FundingSource::from_token)
            {
                println!("       ({}: {})", source.token(), source.outcome());
            }
            if let Some(ref capture) = step.capture {
                println!(
                    "       -> {} = {}.{}",
                    capture.binding, capture.object, capture.field
                );
            }
        }
        Ok(())
    }

    /// 执行 resend 命令
    pub async fn run_resend(&self, event_id: &str) -> Result<()> {
        let executor = self.http_executor()?;
        let engine = TriggerEngine::new(&self.config.api, &executor);
        engine.resend_event(event_id).await?;

        println!("Event {} resent.", event_id);
        Ok(())
    }

    /// 执行 webhooks 命令
    ///
    /// 查询失败时与没有端点一样输出空列表，详细原因见日志。
    /// 指定 `event` 时只显示订阅了该事件（或 `*`）的端点。
    pub async fn run_webhooks(&self, event: Option<&str>) -> Result<()> {
        let executor = self.http_executor()?;
        let engine = TriggerEngine::new(&self.config.api, &executor);
        let endpoints = engine.webhook_endpoints().await;

        let selected = select_endpoints(&endpoints, event);
        if selected.is_empty() {
            warn!(event = event.unwrap_or("*"), "未找到 webhook 端点");
            println!("No webhook endpoints found.");
            return Ok(());
        }

        for endpoint in selected {
            let owner = if endpoint.application.is_empty() {
                "account"
            } else {
                endpoint.application.as_str()
            };
            println!("{} ({})", endpoint.url, owner);
            println!("    events: {}", endpoint.enabled_events.join(", "));
        }
        Ok(())
    }
}

/// 按订阅事件筛选端点，未指定事件时返回全部
fn select_endpoints<'a>(
    endpoints: &'a WebhookEndpointList,
    event: Option<&str>,
) -> Vec<&'a WebhookEndpoint> {
    endpoints
        .data
        .iter()
        .filter(|endpoint| event.is_none_or(|name| endpoint.listens_to(name)))
        .collect()
}

/// 把场景序列化为场景文件内容
fn export_scenario(scenario: &Scenario, format: ExportFormat) -> Result<String> {
    let content = match format {
        ExportFormat::Json => scenario.to_json()?,
        ExportFormat::Yaml => scenario.to_yaml()?,
    };
    Ok(content)
}

/// 把命令行选项写入配置，未指定的项保持原值
fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    config.api.profile = cli.profile.clone();
    if let Some(ref key) = cli.api_key {
        config.api.api_key = key.clone();
    }
    if let Some(ref base) = cli.api_base {
        config.api.api_base_url = base.trim_end_matches('/').to_string();
    }
    if let Some(ref version) = cli.api_version {
        config.api.api_version = version.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.observability.log_level = level.clone();
    }
    if cli.json_logs {
        config.observability.json_logs = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::parse_from([
            "event-trigger",
            "--profile",
            "ci",
            "--api-key",
            "sk_test_override",
            "--api-base",
            "http://localhost:12111/",
            "--log-level",
            "debug",
            "list",
        ]);

        let mut config = AppConfig::default();
        config.api.api_version = "2019-03-14".to_string();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.api.profile, "ci");
        assert_eq!(config.api.api_key, "sk_test_override");
        assert_eq!(config.api.api_base_url, "http://localhost:12111");
        // 未指定的项保持配置中的值
        assert_eq!(config.api.api_version, "2019-03-14");
        assert_eq!(config.observability.log_level, "debug");
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_describe_unknown_event() {
        let runner = CommandRunner::new(AppConfig::default());
        let err = runner.run_describe("charge.exploded", None).unwrap_err();
        assert_eq!(err.to_string(), "Event charge.exploded is not supported");
        assert!(runner.run_describe("checkout.session.completed", None).is_ok());
        assert!(
            runner
                .run_describe("checkout.session.completed", Some(ExportFormat::Yaml))
                .is_ok()
        );
    }

    #[test]
    fn test_exported_scenario_loads_back() {
        let scenario = PredefinedScenarios::customer_source_updated();

        let yaml = export_scenario(&scenario, ExportFormat::Yaml).unwrap();
        assert_eq!(Scenario::from_yaml(&yaml).unwrap(), scenario);

        let json = export_scenario(&scenario, ExportFormat::Json).unwrap();
        assert_eq!(Scenario::from_json(&json).unwrap(), scenario);
    }

    #[test]
    fn test_select_endpoints_by_event() {
        let endpoints: WebhookEndpointList = serde_json::from_value(serde_json::json!({
            "data": [
                {"application": null, "enabled_events": ["charge.failed"], "url": "https://a.example"},
                {"application": "ca_1", "enabled_events": ["*"], "url": "https://b.example"},
                {"application": null, "enabled_events": ["invoice.created"], "url": "https://c.example"}
            ]
        }))
        .unwrap();

        assert_eq!(select_endpoints(&endpoints, None).len(), 3);

        let urls: Vec<_> = select_endpoints(&endpoints, Some("charge.failed"))
            .into_iter()
            .map(|e| e.url.as_str())
            .collect();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);

        let urls: Vec<_> = select_endpoints(&endpoints, Some("product.created"))
            .into_iter()
            .map(|e| e.url.as_str())
            .collect();
        assert_eq!(urls, vec!["https://b.example"]);
    }

    #[tokio::test]
    async fn test_trigger_without_api_key_fails_before_any_request() {
        let runner = CommandRunner::new(AppConfig::default());
        let err = runner
            .run_trigger(Some("customer.created"), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no API key configured"));

        let err = runner.run_resend("evt_AbC123").await.unwrap_err();
        assert!(err.to_string().contains("no API key configured"));
    }
}
