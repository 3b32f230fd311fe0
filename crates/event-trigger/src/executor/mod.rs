//! 请求执行器
//!
//! 场景引擎只依赖 [`RequestExecutor`] trait，真实网络调用由 [`HttpExecutor`] 完成，
//! 测试时替换为 mock 实现。

mod http;

pub use http::HttpExecutor;

use async_trait::async_trait;

use trigger_shared::config::ApiConfig;
use trigger_shared::error::Result;

use crate::request::RequestDescriptor;

/// 请求执行器接口
///
/// 实现方负责传输、认证头和状态码映射：
/// - 网络失败返回 `Transport`
/// - 凭证被拒绝返回 `Auth`
/// - 其他非 2xx 状态返回 `RemoteApi`，携带状态码和响应体
///
/// 实现方不得在内部重试。`suppress_output` 为 true 时不得打印任何内容。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(
        &self,
        config: &ApiConfig,
        path: &str,
        request: &RequestDescriptor,
        suppress_output: bool,
    ) -> Result<Vec<u8>>;
}
