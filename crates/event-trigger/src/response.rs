//! 响应解码与标识符提取
//!
//! 远端每个接口的结构各不相同，这里把无类型的 JSON 对象限制在 [`ApiObject`] 内部，
//! 对外只通过 [`ApiObject::extract`] 按字段取值。

use serde_json::{Map, Value};

use trigger_shared::error::{Result, TriggerError};

/// 解码后的 API 响应对象
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiObject {
    fields: Map<String, Value>,
}

impl ApiObject {
    /// 将原始响应体解码为 JSON 对象
    ///
    /// 空内容、非法 JSON 或非对象的 JSON 值都返回 `Decode` 错误。
    pub fn decode(body: &[u8]) -> Result<Self> {
        let fields: Map<String, Value> = serde_json::from_slice(body)?;
        Ok(Self { fields })
    }

    /// 提取字符串字段
    ///
    /// 字段缺失、为 null 或不是字符串时返回 `MissingField`，`object` 用于错误消息，
    /// 例如 `Unable to retrieve Charge ID`。空字符串同样视为缺失。
    pub fn extract(&self, field: &str, object: &str) -> Result<String> {
        match self.fields.get(field) {
            Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
            _ => Err(TriggerError::missing_field(object, field)),
        }
    }

    /// 响应中的 `object` 字段（如 "charge"），用于步骤日志
    pub fn object_type(&self) -> Option<&str> {
        self.fields.get("object").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_object() {
        let object = ApiObject::decode(br#"{"id":"ch_123","object":"charge","amount":2000}"#)
            .unwrap();
        assert_eq!(object.object_type(), Some("charge"));
        assert_eq!(object.extract("id", "Charge").unwrap(), "ch_123");
    }

    #[test]
    fn test_decode_empty_payload_fails() {
        let err = ApiObject::decode(b"").unwrap_err();
        assert_eq!(err.code(), "DECODE_ERROR");
    }

    #[test]
    fn test_decode_non_json_fails() {
        let err = ApiObject::decode(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, TriggerError::Decode(_)));
    }

    #[test]
    fn test_decode_non_object_fails() {
        assert!(matches!(
            ApiObject::decode(b"[1, 2, 3]"),
            Err(TriggerError::Decode(_))
        ));
        assert!(matches!(
            ApiObject::decode(b"\"cs_1\""),
            Err(TriggerError::Decode(_))
        ));
    }

    #[test]
    fn test_extract_missing_field() {
        let object = ApiObject::decode(br#"{"object":"checkout.session"}"#).unwrap();
        let err = object.extract("id", "CheckoutSession").unwrap_err();
        match &err {
            TriggerError::MissingField { object, field } => {
                assert_eq!(object, "CheckoutSession");
                assert_eq!(field, "id");
            }
            other => panic!("预期 MissingField，实际 {other:?}"),
        }
        assert_eq!(err.to_string(), "Unable to retrieve CheckoutSession ID");
    }

    #[test]
    fn test_extract_never_returns_empty_value() {
        let object = ApiObject::decode(br#"{"id":"","card":null,"amount":2000}"#).unwrap();
        assert!(object.extract("id", "Charge").is_err());
        assert!(object.extract("card", "Card").is_err());
        // 类型不符同样视为缺失
        assert!(object.extract("amount", "Charge").is_err());
    }
}
