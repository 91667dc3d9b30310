use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Resource;
use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;

/// One reservation placed on the timeline grid.
///
/// `offset` and `span` are whole visible-day units measured from the
/// window's first day; `lane` is the zero-based sub-row within the
/// resource's row. Renderers need no date arithmetic beyond these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedBooking {
    pub id: SharedStr,
    pub resource_id: SharedStr,
    /// Zero-based lane index; bookings sharing a lane never overlap.
    pub lane: usize,
    /// Day distance from the visible window start to `clamped_start`.
    pub offset: i64,
    /// Inclusive day length of the clamped interval, at least 1.
    pub span: i64,
    /// Reservation start truncated to the visible window.
    pub clamped_start: DateTime<Utc>,
    /// Reservation end truncated to the visible window.
    pub clamped_end: DateTime<Utc>,
    pub label: SharedStr,
    pub color: ThemeToken,
}

/// Layout output for one resource: its lane-packed bookings.
///
/// Built fresh on every recomputation and handed to the renderer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRow {
    pub resource: Resource,
    /// Number of lanes the row occupies, at least 1 so even an empty
    /// row reserves one row of height.
    pub lane_count: usize,
    pub bookings: Vec<PositionedBooking>,
}

impl ResourceRow {
    pub fn empty(resource: Resource) -> Self {
        Self {
            resource,
            lane_count: 1,
            bookings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_row_reserves_one_lane() {
        let row = ResourceRow::empty(Resource::placeholder(SharedStr::from("veh-1")));
        assert_eq!(row.lane_count, 1);
        assert!(row.bookings.is_empty());
    }

    #[test]
    fn row_serializes() {
        let row = ResourceRow::empty(Resource::placeholder(SharedStr::from("veh-1")));
        let json = serde_json::to_string(&row).unwrap_or_default();
        assert!(json.contains("\"lane_count\":1"));
    }
}
