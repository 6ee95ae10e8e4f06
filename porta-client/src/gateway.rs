use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use porta_core::{Envelope, PortalGateway, StageError, StageResult};

/// Client identity the portal requires on every request.
///
/// These values mirror a known mobile build; the portal rejects requests
/// that do not carry them. They are compatibility configuration, not
/// business logic.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub device_type: String,
    pub locale: String,
    pub language: String,
    pub user_agent: String,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            device_type: "ios".to_string(),
            locale: "zh-Hans-CN;q=1, en-CN;q=0.9, ga-IE;q=0.8".to_string(),
            language: "CN".to_string(),
            user_agent: "SamClub/5.0.46 (iPhone; iOS 13.4.1; Scale/2.00)".to_string(),
        }
    }
}

/// `reqwest`-backed [`PortalGateway`].
///
/// One instance can serve many concurrent sessions; they share the
/// underlying connection pool while each call carries its own session
/// token. Every call is bounded by the configured timeout.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    device: DeviceProfile,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, device: DeviceProfile, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            device,
            timeout,
        }
    }
}

#[async_trait]
impl PortalGateway for HttpGateway {
    async fn post(&self, path: &str, body: Value, auth_token: &str) -> StageResult<Envelope> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("accept", "*/*")
            .header("auth-token", auth_token)
            .header("device-type", &self.device.device_type)
            .header("Accept-Language", &self.device.locale)
            .header("system-language", &self.device.language)
            .header("User-Agent", &self.device.user_agent)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| StageError::Transport(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| StageError::Transport(err.to_string()))?;

        if status.as_u16() != 200 {
            return Err(StageError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|err| StageError::Transport(format!("malformed envelope: {}", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_profile_defaults_match_known_build() {
        let device = DeviceProfile::default();

        assert_eq!(device.device_type, "ios");
        assert_eq!(device.language, "CN");
        assert!(device.user_agent.starts_with("SamClub/"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalised() {
        let gateway = HttpGateway::new(
            "https://portal.example.com/",
            DeviceProfile::default(),
            Duration::from_secs(5),
        );

        assert_eq!(gateway.base_url, "https://portal.example.com");
    }
}
