//! 请求描述构建
//!
//! 单次 API 调用的抽象描述：HTTP 方法、API 版本和有序的 `key=value` 参数列表。
//! 参数由调用方预先编码，这里不做任何转义。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 场景中用到的 HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }

    /// 参数是否放在请求体中（否则拼接到查询串）
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 请求描述
///
/// 构建后不可变，每次调用重新构建。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    version: String,
    params: Vec<String>,
}

impl RequestDescriptor {
    /// 构建请求描述，纯值构造，无副作用
    pub fn build(method: HttpMethod, params: Vec<String>, version: impl Into<String>) -> Self {
        Self {
            method,
            version: version.into(),
            params,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// 为空表示使用账户默认版本
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// 按原始顺序用 `&` 连接参数，用于步骤日志
    pub fn joined_params(&self) -> String {
        self.params.join("&")
    }

    /// 按第一个 `=` 拆分为键值对，保持原始顺序
    ///
    /// 没有 `=` 的参数视为值为空。
    pub fn form_pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|p| p.split_once('=').unwrap_or((p.as_str(), "")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_keeps_order_and_version() {
        let request = RequestDescriptor::build(
            HttpMethod::Post,
            vec![
                "amount=2000".to_string(),
                "currency=usd".to_string(),
                "line_items[][name]=T-shirt".to_string(),
            ],
            "2019-03-14",
        );

        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(request.version(), "2019-03-14");
        assert_eq!(request.params().len(), 3);
        assert_eq!(
            request.joined_params(),
            "amount=2000&currency=usd&line_items[][name]=T-shirt"
        );
    }

    #[test]
    fn test_params_are_not_escaped() {
        let request = RequestDescriptor::build(
            HttpMethod::Post,
            vec!["line_items[][description]=Comfortable cotton t-shirt".to_string()],
            "",
        );
        assert_eq!(
            request.joined_params(),
            "line_items[][description]=Comfortable cotton t-shirt"
        );
    }

    #[test]
    fn test_form_pairs_split_on_first_equals() {
        let request = RequestDescriptor::build(
            HttpMethod::Post,
            vec![
                "success_url=https://httpbin.org/post?a=b".to_string(),
                "expand".to_string(),
            ],
            "",
        );
        assert_eq!(
            request.form_pairs(),
            vec![("success_url", "https://httpbin.org/post?a=b"), ("expand", "")]
        );
    }

    #[test]
    fn test_method_serialization() {
        assert_eq!(serde_json::to_string(&HttpMethod::Delete).unwrap(), "\"DELETE\"");
        let method: HttpMethod = serde_json::from_str("\"GET\"").unwrap();
        assert_eq!(method, HttpMethod::Get);
        assert!(HttpMethod::Post.has_body());
        assert!(!HttpMethod::Get.has_body());
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
