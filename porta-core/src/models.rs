use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{bool_field, i64_field, list_field, str_field, str_list_field};

/// Delivery address selected for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub district_name: String,
    #[serde(default)]
    pub detail_address: String,
}

impl Address {
    pub fn decode(v: &Value) -> Self {
        Self {
            address_id: str_field(v, "addressId"),
            name: str_field(v, "name"),
            mobile: str_field(v, "mobile"),
            district_name: str_field(v, "districtName"),
            detail_address: str_field(v, "detailAddress"),
        }
    }
}

/// One cart line projected into settlement requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub spu_id: String,
    pub store_id: String,
    pub amount: i64,
    pub quantity: i64,
}

/// Store selection the portal needs to route delivery requests.
///
/// The template and mode ids ride in a separate request block, never inside
/// the serialized store info itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    pub store_id: String,
    pub store_type: String,
    pub area_block_id: String,
    #[serde(skip_serializing)]
    pub store_delivery_template_id: String,
    #[serde(skip_serializing)]
    pub delivery_mode_id: String,
}

/// Availability for a single delivery date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySlot {
    pub date: String,
    pub delivery_desc: String,
    pub delivery_desc_en: String,
    pub full: bool,
}

impl CapacitySlot {
    pub fn decode(v: &Value) -> Self {
        Self {
            date: str_field(v, "strDate"),
            delivery_desc: str_field(v, "deliveryDesc"),
            delivery_desc_en: str_field(v, "deliveryDescEn"),
            full: bool_field(v, "dateISFull"),
        }
    }
}

/// Per-date availability returned by the capacity endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySheet {
    pub slots: Vec<CapacitySlot>,
    pub performance_template: String,
}

impl CapacitySheet {
    pub fn decode(data: &Value) -> Self {
        Self {
            slots: list_field(data, "capcityResponseList")
                .iter()
                .map(CapacitySlot::decode)
                .collect(),
            performance_template: str_field(data, "getPortalPerformanceTemplateResponse"),
        }
    }

    /// Slot for a delivery date, if the portal returned one.
    pub fn slot(&self, date: &str) -> Option<&CapacitySlot> {
        self.slots.iter().find(|slot| slot.date == date)
    }

    /// Dates with remaining capacity, source order preserved.
    pub fn open_dates(&self) -> impl Iterator<Item = &CapacitySlot> {
        self.slots.iter().filter(|slot| !slot.full)
    }
}

/// Fulfilment channel for a settlement quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    #[default]
    Unknown,
    Express,
    Citywide,
    Logistics,
}

impl DeliveryType {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => DeliveryType::Express,
            2 => DeliveryType::Citywide,
            3 => DeliveryType::Logistics,
            _ => DeliveryType::Unknown,
        }
    }
}

/// Delivery choice inside a settlement quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleDelivery {
    pub delivery_type: DeliveryType,
    pub delivery_name: String,
    pub delivery_desc: String,
    pub expect_arrival_time: String,
    pub expect_arrival_end_time: String,
    pub store_delivery_template_id: String,
    pub delivery_mode_ids: Vec<String>,
    pub area_block_id: String,
    pub area_block_name: String,
    pub first_period: i64,
}

impl SettleDelivery {
    pub fn decode(v: &Value) -> Self {
        Self {
            delivery_type: DeliveryType::from_code(i64_field(v, "deliveryType")),
            delivery_name: str_field(v, "deliveryName"),
            delivery_desc: str_field(v, "deliveryDesc"),
            expect_arrival_time: str_field(v, "expectArrivalTime"),
            expect_arrival_end_time: str_field(v, "expectArrivalEndTime"),
            store_delivery_template_id: str_field(v, "storeDeliveryTemplateId"),
            delivery_mode_ids: str_list_field(v, "deliveryModeIdList"),
            area_block_id: str_field(v, "areaBlockId"),
            area_block_name: str_field(v, "areaBlockName"),
            first_period: i64_field(v, "firstPeriod"),
        }
    }
}

/// Settlement quote for the current cart and address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleInfo {
    pub saas_id: String,
    pub uid: String,
    pub floor_id: i64,
    pub floor_name: String,
    pub delivery: SettleDelivery,
    pub address: Address,
}

impl SettleInfo {
    pub fn decode(data: &Value) -> Self {
        // The portal returns a collection here; the last entry wins.
        let mut delivery = SettleDelivery::default();
        for v in list_field(data, "settleDelivery") {
            delivery = SettleDelivery::decode(v);
        }

        Self {
            saas_id: str_field(data, "saasId"),
            uid: str_field(data, "uid"),
            floor_id: i64_field(data, "floorId"),
            floor_name: str_field(data, "floorName"),
            delivery,
            address: Address::decode(data.get("deliveryAddress").unwrap_or(&Value::Null)),
        }
    }
}
