//! 场景执行器
//!
//! 所有场景共用的步骤驱动逻辑：渲染请求、调用执行器、解码响应、捕获字段。
//! 任一步骤失败立即中止并原样返回错误，已创建的远端对象不做补偿清理。

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, instrument};

use trigger_shared::config::ApiConfig;
use trigger_shared::error::Result;

use super::scenario::{Scenario, ScenarioStep};
use crate::executor::RequestExecutor;
use crate::request::RequestDescriptor;
use crate::response::ApiObject;

/// 场景执行结果
///
/// 只在整条调用链全部成功时产生，中间步骤不单独上报。
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub scenario_name: String,
    /// 实际发出的请求数
    pub steps_executed: usize,
    /// 执行总耗时（毫秒）
    pub duration_ms: u64,
}

/// 场景执行器
///
/// 借用只读的 API 配置和执行器，不持有任何可变共享状态，
/// 不同场景可以由调用方并发执行。
pub struct ScenarioRunner<'a> {
    config: &'a ApiConfig,
    executor: &'a dyn RequestExecutor,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(config: &'a ApiConfig, executor: &'a dyn RequestExecutor) -> Self {
        Self { config, executor }
    }

    /// 按当前配置的 API 版本构建请求
    pub fn build_request(&self, step: &ScenarioStep, params: Vec<String>) -> RequestDescriptor {
        RequestDescriptor::build(step.method, params, self.config.api_version.as_str())
    }

    /// 执行场景
    ///
    /// 每一步都等待上一步的响应解码完成后才构建，调用链严格串行。
    #[instrument(skip(self, scenario), fields(scenario = %scenario.name))]
    pub async fn run(&self, scenario: &Scenario) -> Result<ScenarioOutcome> {
        scenario.validate()?;

        let start = Instant::now();
        info!(steps = scenario.steps.len(), "开始执行场景");

        let mut bindings: HashMap<String, String> = HashMap::new();

        for (step_index, step) in scenario.steps.iter().enumerate() {
            if let Err(e) = self.execute_step(step, step_index, &mut bindings).await {
                error!(
                    step_index,
                    step = %step.name,
                    code = e.code(),
                    remote = e.is_remote(),
                    error = %e,
                    "步骤执行失败，中止场景"
                );
                return Err(e);
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(steps = scenario.steps.len(), duration_ms, "场景执行完成");

        Ok(ScenarioOutcome {
            scenario_name: scenario.name.clone(),
            steps_executed: scenario.steps.len(),
            duration_ms,
        })
    }

    /// 执行单个步骤，需要时把捕获的字段写入 `bindings`
    async fn execute_step(
        &self,
        step: &ScenarioStep,
        step_index: usize,
        bindings: &mut HashMap<String, String>,
    ) -> Result<()> {
        let path = step.render_path(bindings)?;
        let request = self.build_request(step, step.render_params(bindings)?);

        debug!(
            step_index,
            step = %step.name,
            method = %request.method(),
            %path,
            params = %request.joined_params(),
            "执行步骤"
        );

        // 场景内部的合成调用，始终要求执行器静默
        let body = self
            .executor
            .execute(self.config, &path, &request, true)
            .await?;
        let response = ApiObject::decode(&body)?;
        debug!(
            step_index,
            object = response.object_type().unwrap_or("unknown"),
            "响应已解码"
        );

        if let Some(capture) = &step.capture {
            let value = response.extract(&capture.field, &capture.object)?;
            debug!(step_index, binding = %capture.binding, value = %value, "捕获字段");
            bindings.insert(capture.binding.clone(), value);
        }

        Ok(())
    }
}
