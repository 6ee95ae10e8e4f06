use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use porta_core::{Envelope, PortalGateway, RetryKind, SessionState, StageError, StageResult};

use crate::retry::RetryPolicy;
use crate::stage::{execute, Stage, StageName};
use crate::stages::{CapacityStage, SettlementStage};

/// Position of the flow's state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// Waiting to execute a stage.
    Pending(StageName),
    /// Stage finished and its result is merged into the session.
    Succeeded(StageName),
    /// Stage hit a retry-eligible condition and will be re-entered.
    Retrying(StageName, RetryKind),
    /// All stages succeeded.
    Completed,
    /// A fatal error or an exhausted retry budget ended the flow.
    Aborted(String),
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Completed | FlowState::Aborted(_))
    }
}

/// Drives an ordered stage list for one session.
///
/// Fatal errors short-circuit all remaining stages; the two named business
/// conditions re-enter the failing stage under the bounded [`RetryPolicy`],
/// with the request body re-projected from the session on every attempt.
/// Every state the machine enters is recorded so callers can observe
/// transitions without reaching into the transport.
pub struct CheckoutFlow {
    stages: Vec<Box<dyn Stage>>,
    policy: RetryPolicy,
    state: FlowState,
    trace: Vec<FlowState>,
}

impl CheckoutFlow {
    pub fn new(stages: Vec<Box<dyn Stage>>, policy: RetryPolicy) -> Self {
        let state = stages
            .first()
            .map(|stage| FlowState::Pending(stage.name()))
            .unwrap_or(FlowState::Completed);

        Self {
            stages,
            policy,
            state,
            trace: Vec::new(),
        }
    }

    /// The standard capacity check → settlement check sequence.
    pub fn standard(policy: RetryPolicy, lookahead_days: i64) -> Self {
        Self::new(
            vec![
                Box::new(CapacityStage::new(lookahead_days)),
                Box::new(SettlementStage),
            ],
            policy,
        )
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Every state the machine has entered, in order.
    pub fn trace(&self) -> &[FlowState] {
        &self.trace
    }

    fn enter(&mut self, state: FlowState) {
        self.trace.push(state.clone());
        self.state = state;
    }

    /// Run the flow to a terminal state, returning it.
    pub async fn run(
        &mut self,
        gateway: &dyn PortalGateway,
        session: &mut SessionState,
    ) -> FlowState {
        for index in 0..self.stages.len() {
            let name = self.stages[index].name();
            self.enter(FlowState::Pending(name));

            let mut attempts = 0u32;
            loop {
                attempts += 1;
                let outcome = execute(gateway, session, self.stages[index].as_ref()).await;
                match outcome {
                    Ok(()) => {
                        self.enter(FlowState::Succeeded(name));
                        break;
                    }
                    Err(err) => match err.retry_kind() {
                        Some(kind) if self.policy.allows(attempts) => {
                            tracing::warn!(
                                "[{}] stage {} retrying after {}: {}",
                                session.id,
                                name,
                                kind,
                                err
                            );
                            self.enter(FlowState::Retrying(name, kind));
                            tokio::time::sleep(self.policy.backoff).await;
                            self.enter(FlowState::Pending(name));
                        }
                        _ => {
                            tracing::error!("[{}] stage {} aborted: {}", session.id, name, err);
                            self.enter(FlowState::Aborted(err.to_string()));
                            return self.state.clone();
                        }
                    },
                }
            }
        }

        self.enter(FlowState::Completed);
        self.state.clone()
    }
}

/// Gateway that replays a queued script of responses, for exercising the
/// flow without network I/O. Each queued entry is either a raw envelope
/// value or the error the transport would have produced.
pub struct ScriptedGateway {
    script: Mutex<VecDeque<StageResult<Value>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ScriptedGateway {
    pub fn new(script: Vec<StageResult<Value>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, as (path, body) pairs.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PortalGateway for ScriptedGateway {
    async fn post(&self, path: &str, body: Value, _auth_token: &str) -> StageResult<Envelope> {
        self.requests.lock().unwrap().push((path.to_string(), body));

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(raw)) => serde_json::from_value(raw)
                .map_err(|err| StageError::Transport(format!("malformed envelope: {}", err))),
            Some(Err(err)) => Err(err),
            None => Err(StageError::Transport("script exhausted".to_string())),
        }
    }
}
