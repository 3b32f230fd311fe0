//! 触发器引擎
//!
//! 对外暴露每个触发器一个操作，以及事件重发和 webhook 端点查询。
//! 除端点查询外，所有操作都把错误原样返回给调用方，不重试、不降级。

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, instrument, warn};

use trigger_shared::config::ApiConfig;
use trigger_shared::error::{EVENT_ID_PATTERN, Result, TriggerError};

use crate::executor::RequestExecutor;
use crate::request::{HttpMethod, RequestDescriptor};
use crate::response::ApiObject;
use crate::scenarios::{PredefinedScenarios, Scenario, ScenarioOutcome, ScenarioRunner};
use crate::trigger::Trigger;
use crate::webhooks::{WEBHOOK_ENDPOINT_PAGE_SIZE, WebhookEndpointList};

static EVENT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(EVENT_ID_PATTERN).unwrap());

/// 触发器引擎
///
/// 构造时借用调用方的 API 配置和执行器，生命周期内只读。
pub struct TriggerEngine<'a> {
    config: &'a ApiConfig,
    executor: &'a dyn RequestExecutor,
}

impl<'a> TriggerEngine<'a> {
    pub fn new(config: &'a ApiConfig, executor: &'a dyn RequestExecutor) -> Self {
        Self { config, executor }
    }

    fn runner(&self) -> ScenarioRunner<'a> {
        ScenarioRunner::new(self.config, self.executor)
    }

    /// 执行任意场景（预定义或从文件加载）
    pub async fn run_scenario(&self, scenario: &Scenario) -> Result<ScenarioOutcome> {
        self.runner().run(scenario).await
    }

    /// 执行触发器对应的预定义场景
    #[instrument(skip(self), fields(event = %trigger))]
    pub async fn trigger(&self, trigger: Trigger) -> Result<()> {
        let scenario = PredefinedScenarios::for_trigger(trigger);
        let outcome = self.run_scenario(&scenario).await?;
        info!(
            event = %trigger,
            steps = outcome.steps_executed,
            duration_ms = outcome.duration_ms,
            "触发成功"
        );
        Ok(())
    }

    /// 按事件名执行触发器
    pub async fn trigger_by_name(&self, event_name: &str) -> Result<()> {
        let trigger: Trigger = event_name.parse()?;
        self.trigger(trigger).await
    }

    // ---------------------------------------------------------------------
    // 各触发器
    // ---------------------------------------------------------------------

    pub async fn charge_captured(&self) -> Result<()> {
        self.trigger(Trigger::ChargeCaptured).await
    }

    pub async fn charge_disputed(&self) -> Result<()> {
        self.trigger(Trigger::ChargeDisputed).await
    }

    pub async fn charge_failed(&self) -> Result<()> {
        self.trigger(Trigger::ChargeFailed).await
    }

    pub async fn charge_refunded(&self) -> Result<()> {
        self.trigger(Trigger::ChargeRefunded).await
    }

    pub async fn charge_succeeded(&self) -> Result<()> {
        self.trigger(Trigger::ChargeSucceeded).await
    }

    pub async fn checkout_session_completed(&self) -> Result<()> {
        self.trigger(Trigger::CheckoutSessionCompleted).await
    }

    pub async fn customer_created(&self) -> Result<()> {
        self.trigger(Trigger::CustomerCreated).await
    }

    pub async fn customer_updated(&self) -> Result<()> {
        self.trigger(Trigger::CustomerUpdated).await
    }

    pub async fn customer_deleted(&self) -> Result<()> {
        self.trigger(Trigger::CustomerDeleted).await
    }

    pub async fn customer_source_created(&self) -> Result<()> {
        self.trigger(Trigger::CustomerSourceCreated).await
    }

    pub async fn customer_source_updated(&self) -> Result<()> {
        self.trigger(Trigger::CustomerSourceUpdated).await
    }

    pub async fn customer_subscription_created(&self) -> Result<()> {
        self.trigger(Trigger::CustomerSubscriptionCreated).await
    }

    pub async fn customer_subscription_updated(&self) -> Result<()> {
        self.trigger(Trigger::CustomerSubscriptionUpdated).await
    }

    pub async fn customer_subscription_deleted(&self) -> Result<()> {
        self.trigger(Trigger::CustomerSubscriptionDeleted).await
    }

    pub async fn invoice_created(&self) -> Result<()> {
        self.trigger(Trigger::InvoiceCreated).await
    }

    pub async fn invoice_finalized(&self) -> Result<()> {
        self.trigger(Trigger::InvoiceFinalized).await
    }

    pub async fn invoice_payment_succeeded(&self) -> Result<()> {
        self.trigger(Trigger::InvoicePaymentSucceeded).await
    }

    pub async fn invoice_payment_failed(&self) -> Result<()> {
        self.trigger(Trigger::InvoicePaymentFailed).await
    }

    pub async fn invoice_updated(&self) -> Result<()> {
        self.trigger(Trigger::InvoiceUpdated).await
    }

    pub async fn payment_intent_created(&self) -> Result<()> {
        self.trigger(Trigger::PaymentIntentCreated).await
    }

    pub async fn payment_intent_succeeded(&self) -> Result<()> {
        self.trigger(Trigger::PaymentIntentSucceeded).await
    }

    pub async fn payment_intent_failed(&self) -> Result<()> {
        self.trigger(Trigger::PaymentIntentFailed).await
    }

    pub async fn payment_intent_canceled(&self) -> Result<()> {
        self.trigger(Trigger::PaymentIntentCanceled).await
    }

    pub async fn payment_method_attached(&self) -> Result<()> {
        self.trigger(Trigger::PaymentMethodAttached).await
    }

    pub async fn product_created(&self) -> Result<()> {
        self.trigger(Trigger::ProductCreated).await
    }

    // ---------------------------------------------------------------------
    // 事件重发与端点查询
    // ---------------------------------------------------------------------

    /// 重发 webhook 事件
    ///
    /// 先校验事件 ID 格式，不合法时不发出任何请求。
    /// 响应体与场景步骤一样必须能解码为 JSON 对象。
    #[instrument(skip(self))]
    pub async fn resend_event(&self, event_id: &str) -> Result<()> {
        if !EVENT_ID.is_match(event_id) {
            return Err(TriggerError::invalid_event_id());
        }

        let request =
            RequestDescriptor::build(HttpMethod::Post, Vec::new(), self.config.api_version.as_str());
        let path = format!("/v1/events/{}/retry", event_id);
        let body = self
            .executor
            .execute(self.config, &path, &request, true)
            .await?;
        let response = ApiObject::decode(&body)?;

        info!(event_id, object = response.object_type().unwrap_or("unknown"), "事件已重发");
        Ok(())
    }

    /// 查询账户下的 webhook 端点
    ///
    /// 尽力而为的读取：网络或解码失败都返回空列表，不向调用方报错。
    /// 因此空列表既可能表示没有端点，也可能表示查询失败。
    pub async fn webhook_endpoints(&self) -> WebhookEndpointList {
        let request = RequestDescriptor::build(
            HttpMethod::Get,
            vec![format!("limit={}", WEBHOOK_ENDPOINT_PAGE_SIZE)],
            self.config.api_version.as_str(),
        );

        let body = match self
            .executor
            .execute(self.config, "/v1/webhook_endpoints", &request, true)
            .await
        {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "查询 webhook 端点失败，返回空列表");
                return WebhookEndpointList::default();
            }
        };

        serde_json::from_slice(&body).unwrap_or_else(|e| {
            warn!(error = %e, "webhook 端点响应解析失败，返回空列表");
            WebhookEndpointList::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_pattern() {
        assert!(EVENT_ID.is_match("evt_AbC123"));
        assert!(EVENT_ID.is_match("evt_abc"));
        assert!(!EVENT_ID.is_match("evt_ab"));
        assert!(!EVENT_ID.is_match("bad-id"));
        assert!(!EVENT_ID.is_match("evt_abc-123"));
        assert!(!EVENT_ID.is_match(&format!("evt_{}", "a".repeat(256))));
        assert!(EVENT_ID.is_match(&format!("evt_{}", "a".repeat(255))));
    }
}
