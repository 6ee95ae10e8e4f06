use serde_json::Value;
use std::fmt;

use porta_core::{PortalGateway, SessionState, StageResult};

/// Stages of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageName {
    Capacity,
    Settlement,
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageName::Capacity => write!(f, "capacity"),
            StageName::Settlement => write!(f, "settlement"),
        }
    }
}

/// One network step of the checkout flow.
///
/// A stage projects its request body from the session and, on a classified
/// success, merges exactly its own result back. It never performs I/O
/// itself; the executor owns the request/classify cycle.
pub trait Stage: Send + Sync {
    fn name(&self) -> StageName;

    /// Endpoint path relative to the portal base URL.
    fn endpoint(&self) -> &'static str;

    /// Project the request body from the current session.
    fn request_body(&self, session: &SessionState) -> Value;

    /// Merge a successful payload into the session.
    fn merge(&self, session: &mut SessionState, data: &Value);
}

/// Run one stage against the portal.
///
/// The session is written exactly once, on a classified success; any
/// transport or business error is returned unchanged for the orchestrator to
/// act on, with the session untouched.
pub async fn execute(
    gateway: &dyn PortalGateway,
    session: &mut SessionState,
    stage: &dyn Stage,
) -> StageResult<()> {
    let body = stage.request_body(session);
    tracing::debug!("[{}] stage {} -> {}", session.id, stage.name(), stage.endpoint());

    let envelope = gateway.post(stage.endpoint(), body, &session.auth_token).await?;
    let data = envelope.into_data()?;

    stage.merge(session, &data);
    tracing::info!("[{}] stage {} succeeded", session.id, stage.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::ScriptedGateway;
    use crate::stages::CapacityStage;
    use porta_core::StageError;
    use serde_json::json;

    fn capacity_success() -> serde_json::Value {
        json!({
            "code": "Success",
            "data": {
                "capcityResponseList": [
                    {"strDate": "2024-06-01", "deliveryDesc": "Today 18:00-20:00", "dateISFull": false},
                ],
            },
        })
    }

    #[tokio::test]
    async fn test_execute_merges_on_success() {
        let gateway = ScriptedGateway::new(vec![Ok(capacity_success())]);
        let mut session = SessionState::new("token", "u-1");

        execute(&gateway, &mut session, &CapacityStage::default())
            .await
            .unwrap();

        let sheet = session.capacity().unwrap();
        assert_eq!(sheet.slots.len(), 1);
        assert!(!sheet.slot("2024-06-01").unwrap().full);
    }

    #[tokio::test]
    async fn test_execute_leaves_session_untouched_on_http_error() {
        let gateway = ScriptedGateway::new(vec![Err(StageError::Http {
            status: 500,
            body: "internal error".to_string(),
        })]);
        let mut session = SessionState::new("token", "u-1");

        let err = execute(&gateway, &mut session, &CapacityStage::default())
            .await
            .unwrap_err();

        assert!(matches!(err, StageError::Http { status: 500, .. }));
        assert!(session.capacity().is_none());
    }

    #[tokio::test]
    async fn test_execute_leaves_session_untouched_on_business_error() {
        let gateway = ScriptedGateway::new(vec![Ok(json!({"code": "LIMITED", "msg": "slow down"}))]);
        let mut session = SessionState::new("token", "u-1");

        let err = execute(&gateway, &mut session, &CapacityStage::default())
            .await
            .unwrap_err();

        assert!(err.retry_kind().is_some());
        assert!(session.capacity().is_none());
    }

    #[tokio::test]
    async fn test_execute_is_idempotent_for_identical_responses() {
        let gateway = ScriptedGateway::new(vec![Ok(capacity_success()), Ok(capacity_success())]);
        let mut session = SessionState::new("token", "u-1");

        execute(&gateway, &mut session, &CapacityStage::default())
            .await
            .unwrap();
        let first = session.capacity().unwrap().clone();

        execute(&gateway, &mut session, &CapacityStage::default())
            .await
            .unwrap();

        assert_eq!(session.capacity().unwrap(), &first);
    }
}
