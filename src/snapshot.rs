//! Status snapshot served to the dashboard.
//!
//! A snapshot is a projection of `OccupancyState`, rebuilt on every request.
//! It holds no state of its own, so all fields always agree with each other:
//! `free + slot1 == total`.

use core::fmt::Write as FmtWrite;
use heapless::String as HString;

use crate::occupancy::OccupancyState;

/// Number of monitored slots.
pub const TOTAL_SLOTS: u8 = 1;

/// Capacity for the serialized snapshot (`{"slot1":1,"free":0,"total":1}`).
pub const JSON_CAPACITY: usize = 48;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// 1 if occupied, 0 if free.
    pub slot1: u8,
    pub free: u8,
    pub total: u8,
}

impl StatusSnapshot {
    pub fn is_full(&self) -> bool {
        self.free == 0
    }

    /// Serialize as `{"slot1":<0|1>,"free":<n>,"total":<n>}`.
    pub fn to_json(&self) -> HString<JSON_CAPACITY> {
        let mut json: HString<JSON_CAPACITY> = HString::new();
        let _ = write!(
            json,
            r#"{{"slot1":{},"free":{},"total":{}}}"#,
            self.slot1, self.free, self.total
        );
        json
    }
}

/// Build the snapshot for the given occupancy. Pure, touches no hardware.
pub const fn build_snapshot(state: OccupancyState) -> StatusSnapshot {
    let slot1 = state.occupied_count();
    StatusSnapshot {
        slot1,
        free: TOTAL_SLOTS - slot1,
        total: TOTAL_SLOTS,
    }
}
