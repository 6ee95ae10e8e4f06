use uuid::Uuid;

use crate::models::{Address, CapacitySheet, CartItem, SettleInfo, StoreInfo};

/// Mutable context threaded through every stage of one checkout attempt.
///
/// Each stage reads the subset it needs and merges exactly its own result
/// back on success; a failed stage leaves prior state untouched and nothing
/// is ever rolled back. The state lives in memory only and is dropped when
/// the attempt is abandoned. Independent sessions own independent instances;
/// only the transport connection pool is shared between them.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Session identity, for log correlation across stages.
    pub id: Uuid,
    /// Opaque session-scoped secret sent as a header on every request.
    pub auth_token: String,
    /// Backend user id.
    pub uid: String,
    pub address: Option<Address>,
    pub store: Option<StoreInfo>,
    pub floor_id: i64,
    pub cart: Vec<CartItem>,
    capacity: Option<CapacitySheet>,
    settlement: Option<SettleInfo>,
}

impl SessionState {
    pub fn new(auth_token: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            auth_token: auth_token.into(),
            uid: uid.into(),
            address: None,
            store: None,
            floor_id: 0,
            cart: Vec::new(),
            capacity: None,
            settlement: None,
        }
    }

    /// Result of the last successful capacity check.
    pub fn capacity(&self) -> Option<&CapacitySheet> {
        self.capacity.as_ref()
    }

    /// Result of the last successful settlement check.
    pub fn settlement(&self) -> Option<&SettleInfo> {
        self.settlement.as_ref()
    }

    /// Written by the capacity stage only; replaces any previous sheet.
    pub fn merge_capacity(&mut self, sheet: CapacitySheet) {
        self.capacity = Some(sheet);
    }

    /// Written by the settlement stage only; replaces any previous quote.
    pub fn merge_settlement(&mut self, info: SettleInfo) {
        self.settlement = Some(info);
    }
}
