//! 统一错误处理模块
//!
//! 定义触发器系统中所有共享的错误类型，使用 thiserror 提供良好的错误信息。
//! 错误消息会原样展示给 CLI 用户，因此消息本身保持英文，与远端 API 的报错风格一致。

use thiserror::Error;

/// 事件 ID 的合法格式
///
/// 放在共享库中，保证校验逻辑与错误消息引用的是同一个字符串。
pub const EVENT_ID_PATTERN: &str = r"^evt_[A-Za-z0-9]{3,255}$";

/// 系统错误类型
#[derive(Debug, Error)]
pub enum TriggerError {
    // ==================== 传输层错误 ====================
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Request failed, status={status}, body={body}")]
    RemoteApi { status: u16, body: String },

    // ==================== 响应解析错误 ====================
    #[error("Unable to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unable to retrieve {object} {}", field_label(.field))]
    MissingField { object: String, field: String },

    // ==================== 输入校验错误 ====================
    #[error("{message}")]
    Validation { message: String },

    // ==================== 场景错误 ====================
    #[error("Invalid scenario '{scenario}': {reason}")]
    InvalidScenario { scenario: String, reason: String },

    #[error("Unknown scenario format: {0}")]
    ScenarioFormat(String),

    #[error("Event {name} is not supported")]
    UnknownTrigger { name: String },

    // ==================== 配置与 IO ====================
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, TriggerError>;

/// `id` 字段在消息中显示为 `ID`，其他字段保留原名
fn field_label(field: &str) -> String {
    if field == "id" {
        "ID".to_string()
    } else {
        format!("field `{field}`")
    }
}

impl TriggerError {
    /// 事件 ID 格式错误
    pub fn invalid_event_id() -> Self {
        Self::Validation {
            message: format!(
                "Invalid event-id provided, should be of the form '{}'",
                EVENT_ID_PATTERN
            ),
        }
    }

    /// 响应缺少预期字段
    pub fn missing_field(object: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            object: object.into(),
            field: field.into(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Auth { .. } => "AUTH_ERROR",
            Self::RemoteApi { .. } => "REMOTE_API_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidScenario { .. } => "INVALID_SCENARIO",
            Self::ScenarioFormat(_) => "SCENARIO_FORMAT_ERROR",
            Self::UnknownTrigger { .. } => "UNKNOWN_TRIGGER",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// 是否由远端调用失败引起（传输、认证或 API 状态码）
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Auth { .. } | Self::RemoteApi { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = TriggerError::RemoteApi {
            status: 400,
            body: "{}".to_string(),
        };
        assert_eq!(err.code(), "REMOTE_API_ERROR");
        assert_eq!(TriggerError::invalid_event_id().code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_missing_id_message() {
        let err = TriggerError::missing_field("CheckoutSession", "id");
        assert_eq!(err.to_string(), "Unable to retrieve CheckoutSession ID");

        let err = TriggerError::missing_field("Invoice", "hosted_invoice_url");
        assert_eq!(
            err.to_string(),
            "Unable to retrieve Invoice field `hosted_invoice_url`"
        );
    }

    #[test]
    fn test_invalid_event_id_mentions_pattern() {
        let err = TriggerError::invalid_event_id();
        assert!(err.to_string().contains("^evt_[A-Za-z0-9]{3,255}$"));
    }

    #[test]
    fn test_is_remote() {
        assert!(TriggerError::Transport("connection refused".to_string()).is_remote());
        assert!(
            TriggerError::Auth {
                message: "invalid key".to_string()
            }
            .is_remote()
        );
        assert!(!TriggerError::missing_field("Charge", "id").is_remote());
    }
}
