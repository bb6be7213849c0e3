//! Module with availability interval model compatible with the tutoring platform's REST API
use serde::{Deserialize, Serialize};

fn default_slot_duration() -> u32 {
    60
}

/* off the grid, so a record without a day is skipped on hydration */
fn missing_day_of_week() -> u8 {
    u8::MAX
}

/// One contiguous block of availability on one day, for one week.
///
/// `start_time`/`end_time` are optional because stale records coming back
/// from the API sometimes lack them; such records are skipped on hydration.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInterval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default = "missing_day_of_week")]
    pub day_of_week: u8,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default = "default_slot_duration")]
    pub slot_duration: u32,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}
