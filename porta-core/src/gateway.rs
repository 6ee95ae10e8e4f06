use async_trait::async_trait;
use serde_json::Value;

use crate::envelope::Envelope;
use crate::StageResult;

/// Outbound transport seam for the delivery portal.
///
/// Implementations own connection handling, the fixed client header set, and
/// the per-call timeout; everything above this trait runs without network
/// I/O in tests. Implementations must be safe to share across concurrently
/// running sessions.
#[async_trait]
pub trait PortalGateway: Send + Sync {
    /// POST a JSON body to an endpoint path and parse the response envelope.
    ///
    /// Transport failures surface as [`StageError::Transport`]; a non-200
    /// response surfaces as [`StageError::Http`] with the body text kept
    /// verbatim. A 200 response is parsed into an [`Envelope`] regardless of
    /// the business status code it carries.
    ///
    /// [`StageError::Transport`]: crate::StageError::Transport
    /// [`StageError::Http`]: crate::StageError::Http
    async fn post(&self, path: &str, body: Value, auth_token: &str) -> StageResult<Envelope>;
}
