use chrono::{Duration, Local, NaiveDate};
use serde_json::{json, Value};

use porta_core::models::CapacitySheet;
use porta_core::SessionState;

use crate::stage::{Stage, StageName};

pub const CAPACITY_ENDPOINT: &str = "/api/v1/sams/delivery/portal/getCapacityData";

/// Queries per-date delivery capacity for the session's store template.
///
/// The portal expects a contiguous date window starting today; the look-ahead
/// controls how many extra days are requested beyond it.
pub struct CapacityStage {
    pub lookahead_days: i64,
}

impl CapacityStage {
    pub fn new(lookahead_days: i64) -> Self {
        Self {
            lookahead_days: lookahead_days.max(0),
        }
    }

    fn date_window(&self, from: NaiveDate) -> Vec<String> {
        (0..=self.lookahead_days)
            .map(|offset| (from + Duration::days(offset)).format("%Y-%m-%d").to_string())
            .collect()
    }
}

impl Default for CapacityStage {
    fn default() -> Self {
        // The portal's mobile client asks for today and tomorrow.
        Self::new(1)
    }
}

impl Stage for CapacityStage {
    fn name(&self) -> StageName {
        StageName::Capacity
    }

    fn endpoint(&self) -> &'static str {
        CAPACITY_ENDPOINT
    }

    fn request_body(&self, session: &SessionState) -> Value {
        let template_id = session
            .store
            .as_ref()
            .map(|store| store.store_delivery_template_id.clone())
            .unwrap_or_default();

        json!({
            "perDateList": self.date_window(Local::now().date_naive()),
            "storeDeliveryTemplateId": template_id,
        })
    }

    fn merge(&self, session: &mut SessionState, data: &Value) {
        session.merge_capacity(CapacitySheet::decode(data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porta_core::models::StoreInfo;
    use serde_json::json;

    fn session_with_template(template_id: &str) -> SessionState {
        let mut session = SessionState::new("token", "u-1");
        session.store = Some(StoreInfo {
            store_delivery_template_id: template_id.to_string(),
            ..Default::default()
        });
        session
    }

    #[test]
    fn test_date_window_is_contiguous() {
        let stage = CapacityStage::new(2);
        let from = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        assert_eq!(
            stage.date_window(from),
            vec!["2024-06-30", "2024-07-01", "2024-07-02"]
        );
    }

    #[test]
    fn test_zero_lookahead_requests_today_only() {
        let stage = CapacityStage::new(0);
        let from = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert_eq!(stage.date_window(from), vec!["2024-06-01"]);
    }

    #[test]
    fn test_request_body_shape() {
        let stage = CapacityStage::default();
        let body = stage.request_body(&session_with_template("703398195375534614"));

        assert_eq!(body["storeDeliveryTemplateId"], "703398195375534614");
        let dates = body["perDateList"].as_array().unwrap();
        assert_eq!(dates.len(), 2);
    }

    #[test]
    fn test_request_body_without_store_selection() {
        let stage = CapacityStage::default();
        let body = stage.request_body(&SessionState::new("token", "u-1"));

        assert_eq!(body["storeDeliveryTemplateId"], "");
    }

    #[test]
    fn test_merge_builds_capacity_sheet() {
        let stage = CapacityStage::default();
        let mut session = SessionState::new("token", "u-1");

        stage.merge(
            &mut session,
            &json!({
                "capcityResponseList": [
                    {"strDate": "2024-06-01", "deliveryDesc": "Today 18:00-20:00", "dateISFull": false},
                ],
            }),
        );

        let slot = session.capacity().unwrap().slot("2024-06-01").unwrap();
        assert_eq!(slot.delivery_desc, "Today 18:00-20:00");
        assert!(!slot.full);
    }
}
