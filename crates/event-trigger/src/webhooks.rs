//! Webhook 端点列表

use serde::{Deserialize, Serialize};

/// 单次查询返回的最大端点数
pub const WEBHOOK_ENDPOINT_PAGE_SIZE: usize = 30;

/// 账户下配置的 webhook 端点列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookEndpointList {
    #[serde(default)]
    pub data: Vec<WebhookEndpoint>,
}

/// 单个 webhook 端点
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookEndpoint {
    /// Connect 应用 ID，账户自身的端点为 null
    #[serde(default, deserialize_with = "null_as_empty")]
    pub application: String,
    #[serde(default)]
    pub enabled_events: Vec<String>,
    #[serde(default)]
    pub url: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl WebhookEndpointList {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl WebhookEndpoint {
    /// 是否订阅了指定事件，`*` 表示订阅全部
    pub fn listens_to(&self, event_name: &str) -> bool {
        self.enabled_events
            .iter()
            .any(|e| e == "*" || e == event_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_list_response() {
        let json = r#"{
            "object": "list",
            "data": [
                {
                    "id": "we_1",
                    "application": null,
                    "enabled_events": ["charge.captured", "charge.failed"],
                    "url": "https://example.com/hooks"
                },
                {
                    "id": "we_2",
                    "application": "ca_123",
                    "enabled_events": ["*"],
                    "url": "https://example.com/all"
                }
            ],
            "has_more": false
        }"#;

        let list: WebhookEndpointList = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.data[0].application, "");
        assert_eq!(list.data[1].application, "ca_123");
        assert!(list.data[0].listens_to("charge.captured"));
        assert!(!list.data[0].listens_to("invoice.created"));
        assert!(list.data[1].listens_to("invoice.created"));
    }

    #[test]
    fn test_default_is_empty() {
        let list = WebhookEndpointList::default();
        assert!(list.is_empty());
    }
}
