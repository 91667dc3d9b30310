use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;

/// Lifecycle state of a reservation, as reported by the booking backend.
///
/// The engine never transitions statuses; it only filters by them and
/// maps them to display colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Semantic color token for bars in this status.
    pub fn token(self) -> ThemeToken {
        match self {
            ReservationStatus::Pending => ThemeToken::BookingPending,
            ReservationStatus::Confirmed => ThemeToken::BookingConfirmed,
            ReservationStatus::Active => ThemeToken::BookingActive,
            ReservationStatus::Completed => ThemeToken::BookingCompleted,
            ReservationStatus::Cancelled => ThemeToken::BookingCancelled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

/// A time-bounded booking of one resource.
///
/// Read-only to the engine. `start <= end` is assumed but not enforced
/// here; the layout floors degenerate intervals to a one-day span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: SharedStr,
    /// Identifier of the booked resource. May reference a resource that
    /// is absent from the current resource feed (legacy bookings).
    pub resource_id: SharedStr,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: ReservationStatus,
    /// Display name of the renter shown on the bar.
    pub counterparty: SharedStr,
}

/// A bookable unit (vehicle) owning one row of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: SharedStr,
    pub name: SharedStr,
    /// Identifier of the supplier this resource belongs to.
    pub owner_id: SharedStr,
    pub plate: Option<SharedStr>,
    pub category: Option<SharedStr>,
}

impl Resource {
    /// Placeholder resource for reservations whose resource is missing
    /// from the feed. The id is kept so detail views still resolve.
    pub fn placeholder(id: SharedStr) -> Self {
        Self {
            name: id.clone(),
            id,
            owner_id: SharedStr::from(""),
            plate: None,
            category: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serde_is_snake_case() {
        let json = serde_json::to_string(&ReservationStatus::Confirmed).unwrap_or_default();
        assert_eq!(json, "\"confirmed\"");
        let back: ReservationStatus =
            serde_json::from_str("\"cancelled\"").unwrap_or(ReservationStatus::Pending);
        assert_eq!(back, ReservationStatus::Cancelled);
    }

    #[test]
    fn status_tokens_are_distinct() {
        let all = [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Active,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
        ];
        for a in all {
            for b in all {
                if a != b {
                    assert_ne!(a.token(), b.token());
                }
            }
        }
    }

    #[test]
    fn placeholder_keeps_id_as_name() {
        let r = Resource::placeholder(SharedStr::from("veh-9"));
        assert_eq!(r.id, "veh-9");
        assert_eq!(r.name, "veh-9");
        assert!(r.plate.is_none());
    }
}
