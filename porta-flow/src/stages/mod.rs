pub mod capacity;
pub mod settlement;

pub use capacity::CapacityStage;
pub use settlement::SettlementStage;
