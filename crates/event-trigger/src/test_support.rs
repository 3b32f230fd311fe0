//! 测试辅助：可编排响应并记录调用的执行器

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use trigger_shared::config::ApiConfig;
use trigger_shared::error::Result;

use crate::executor::RequestExecutor;
use crate::request::{HttpMethod, RequestDescriptor};

/// 一次被记录的调用
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub params: Vec<String>,
    pub version: String,
    pub suppress_output: bool,
}

impl RecordedCall {
    pub fn has_param(&self, param: &str) -> bool {
        self.params.iter().any(|p| p == param)
    }
}

/// 按调用序号编排响应的执行器
///
/// 未编排的调用返回 `{"id":"obj_<n>"}`，n 为从 1 开始的调用序号，
/// 便于断言第 n 步捕获的 ID 出现在后续请求中。
#[derive(Default)]
pub(crate) struct ScriptedExecutor {
    scripted: Mutex<HashMap<usize, Result<Vec<u8>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第 `index` 次调用（从 0 开始）返回指定结果
    pub fn respond(self, index: usize, response: Result<Vec<u8>>) -> Self {
        self.scripted.lock().unwrap().insert(index, response);
        self
    }

    /// 第 `index` 次调用返回指定 JSON
    pub fn respond_json(self, index: usize, json: serde_json::Value) -> Self {
        self.respond(index, Ok(json.to_string().into_bytes()))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        _config: &ApiConfig,
        path: &str,
        request: &RequestDescriptor,
        suppress_output: bool,
    ) -> Result<Vec<u8>> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                method: request.method(),
                path: path.to_string(),
                params: request.params().to_vec(),
                version: request.version().to_string(),
                suppress_output,
            });
            calls.len() - 1
        };

        match self.scripted.lock().unwrap().remove(&index) {
            Some(response) => response,
            None => Ok(format!(r#"{{"id":"obj_{}"}}"#, index + 1).into_bytes()),
        }
    }
}

/// 测试用 API 配置
pub(crate) fn test_config() -> ApiConfig {
    ApiConfig {
        api_key: "sk_test_123".to_string(),
        api_version: "2019-03-14".to_string(),
        ..Default::default()
    }
}
