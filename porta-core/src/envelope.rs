use serde::Deserialize;
use serde_json::Value;

use crate::{RetryKind, StageError};

/// Status code the portal uses for a successful call.
pub const CODE_SUCCESS: &str = "Success";
/// Request frequency limit hit.
pub const CODE_LIMITED: &str = "LIMITED";
/// Cart contents changed since the last check.
pub const CODE_CART_CHANGED: &str = "CART_GOOD_CHANGE";

/// Outer wrapper every portal endpoint returns: `{code, msg?, data}`.
///
/// All fields are defaulted so a partial envelope still parses; the payload
/// stays an untyped tree until a stage-specific decoder runs over it.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Classify the status code and release the payload for decoding.
    ///
    /// Exactly three codes are recognised: success and the two retry-eligible
    /// business conditions. Everything else rejects the attempt, carrying the
    /// portal's diagnostic text verbatim.
    pub fn into_data(self) -> Result<Value, StageError> {
        match self.code.as_str() {
            CODE_SUCCESS => Ok(self.data),
            CODE_LIMITED => Err(StageError::Retryable {
                kind: RetryKind::RateLimited,
                message: self.message(),
            }),
            CODE_CART_CHANGED => Err(StageError::Retryable {
                kind: RetryKind::CartChanged,
                message: self.message(),
            }),
            _ => Err(StageError::Rejected(self.message())),
        }
    }

    fn message(&self) -> String {
        match &self.msg {
            Some(msg) if !msg.is_empty() => msg.clone(),
            _ => self.code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(raw: Value) -> Envelope {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_success_releases_data() {
        let data = envelope(json!({"code": "Success", "data": {"uid": "u-1"}}))
            .into_data()
            .unwrap();
        assert_eq!(data["uid"], "u-1");
    }

    #[test]
    fn test_limited_is_rate_limited() {
        let err = envelope(json!({"code": "LIMITED", "msg": "too many requests"}))
            .into_data()
            .unwrap_err();

        assert_eq!(err.retry_kind(), Some(RetryKind::RateLimited));
        assert!(err.to_string().contains("too many requests"));
    }

    #[test]
    fn test_cart_change_is_retryable() {
        let err = envelope(json!({"code": "CART_GOOD_CHANGE"}))
            .into_data()
            .unwrap_err();

        assert_eq!(err.retry_kind(), Some(RetryKind::CartChanged));
    }

    #[test]
    fn test_unknown_codes_are_fatal() {
        for code in ["OUT_OF_STOCK", "AUTH_FAIL", "", "success", "limited"] {
            let err = envelope(json!({"code": code, "msg": "nope"}))
                .into_data()
                .unwrap_err();

            assert!(matches!(err, StageError::Rejected(_)), "code {:?}", code);
        }
    }

    #[test]
    fn test_rejection_falls_back_to_code_when_msg_absent() {
        let err = envelope(json!({"code": "OUT_OF_STOCK"})).into_data().unwrap_err();
        assert_eq!(err.to_string(), "OUT_OF_STOCK");
    }

    #[test]
    fn test_partial_envelope_still_parses() {
        let envelope = envelope(json!({"code": "Success"}));
        assert!(envelope.msg.is_none());
        assert!(envelope.into_data().unwrap().is_null());
    }
}
