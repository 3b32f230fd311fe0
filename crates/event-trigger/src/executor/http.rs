//! 基于 reqwest 的请求执行器

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use tracing::{debug, warn};

use trigger_shared::config::ApiConfig;
use trigger_shared::error::{Result, TriggerError};

use super::RequestExecutor;
use crate::request::{HttpMethod, RequestDescriptor};

/// API 版本请求头
const VERSION_HEADER: &str = "Stripe-Version";

/// HTTP 请求执行器
///
/// POST 参数以 `application/x-www-form-urlencoded` 表单体发送，GET/DELETE 参数拼接为查询串，
/// 均保持原始参数顺序。客户端内部带连接池，可在多次触发之间复用。
#[derive(Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    /// 创建执行器，`timeout` 作用于单次请求
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TriggerError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// 按配置中的超时时间创建执行器
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(Duration::from_secs(config.timeout_seconds))
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// 从错误响应中取出 `error.message`，取不到时使用原始响应体
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(
        &self,
        config: &ApiConfig,
        path: &str,
        request: &RequestDescriptor,
        suppress_output: bool,
    ) -> Result<Vec<u8>> {
        let url = format!("{}{}", config.api_base_url.trim_end_matches('/'), path);
        let pairs = request.form_pairs();

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method()), &url)
            .bearer_auth(&config.api_key);

        if !request.version().is_empty() {
            builder = builder.header(VERSION_HEADER, request.version());
        }

        builder = if request.method().has_body() {
            builder.form(&pairs)
        } else if !pairs.is_empty() {
            builder.query(&pairs)
        } else {
            builder
        };

        debug!(method = %request.method(), %url, params = pairs.len(), "发送 API 请求");

        let response = builder
            .send()
            .await
            .map_err(|e| TriggerError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TriggerError::Transport(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED {
            warn!(%url, "API 密钥被拒绝");
            return Err(TriggerError::Auth {
                message: error_message(&body),
            });
        }

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "API 返回非成功状态");
            return Err(TriggerError::RemoteApi {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if !suppress_output {
            println!("{}", String::from_utf8_lossy(&body));
        }

        Ok(body.to_vec())
    }
}
