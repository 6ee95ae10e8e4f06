use serde::Serialize;
use serde_json::Value;

use porta_core::models::{CartItem, SettleInfo, StoreInfo};
use porta_core::SessionState;

use crate::stage::{Stage, StageName};

pub const SETTLE_ENDPOINT: &str = "/api/v1/sams/trade/settlement/getSettleInfo";

// Fixed request discriminators the settlement endpoint expects from the
// mobile client: a city-wide cart, delivered rather than picked up.
const CART_DELIVERY_TYPE: i64 = 2;
const IS_SELF_PICKUP: i64 = 0;

/// Routing block sent alongside the store info.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryInfo {
    store_delivery_template_id: String,
    delivery_mode_id: String,
    store_type: String,
}

/// Settlement request body, projected from the session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SettleRequest<'a> {
    uid: &'a str,
    address_id: String,
    #[serde(rename = "deliveryInfoVO")]
    delivery_info: DeliveryInfo,
    cart_delivery_type: i64,
    store_info: StoreInfo,
    coupon_list: Vec<String>,
    is_self_pickup: i64,
    floor_id: i64,
    goods_list: &'a [CartItem],
}

/// Requests a settlement quote for the session's cart, address and store.
pub struct SettlementStage;

impl Stage for SettlementStage {
    fn name(&self) -> StageName {
        StageName::Settlement
    }

    fn endpoint(&self) -> &'static str {
        SETTLE_ENDPOINT
    }

    fn request_body(&self, session: &SessionState) -> Value {
        let store = session.store.clone().unwrap_or_default();
        let request = SettleRequest {
            uid: &session.uid,
            address_id: session
                .address
                .as_ref()
                .map(|address| address.address_id.clone())
                .unwrap_or_default(),
            delivery_info: DeliveryInfo {
                store_delivery_template_id: store.store_delivery_template_id.clone(),
                delivery_mode_id: store.delivery_mode_id.clone(),
                store_type: store.store_type.clone(),
            },
            cart_delivery_type: CART_DELIVERY_TYPE,
            store_info: store,
            coupon_list: Vec::new(),
            is_self_pickup: IS_SELF_PICKUP,
            floor_id: session.floor_id,
            goods_list: &session.cart,
        };

        serde_json::to_value(&request).unwrap_or_default()
    }

    fn merge(&self, session: &mut SessionState, data: &Value) {
        session.merge_settlement(SettleInfo::decode(data));
    }
}
