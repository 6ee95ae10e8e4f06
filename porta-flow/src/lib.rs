pub mod orchestrator;
pub mod retry;
pub mod stage;
pub mod stages;

pub use orchestrator::{CheckoutFlow, FlowState, ScriptedGateway};
pub use retry::RetryPolicy;
pub use stage::{execute, Stage, StageName};
pub use stages::{CapacityStage, SettlementStage};
