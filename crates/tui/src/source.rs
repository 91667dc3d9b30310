use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use fleet_board_core::{BookingFilter, FetchRange, ReservationSource, ResourceSource};
use fleet_board_protocol::{Reservation, ReservationStatus, Resource, SharedStr};

/// Reservation and fleet feeds backed by a JSON fixture file.
///
/// Applies the same owner/status/range-intersection semantics the REST
/// collaborators would, so the engine sees a faithful backend.
#[derive(Debug, Deserialize)]
pub struct FixtureFeed {
    resources: Vec<Resource>,
    reservations: Vec<Reservation>,
}

impl FixtureFeed {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).context("malformed fixture file")
    }

    /// Distinct supplier ids present in the resource feed, in first-seen
    /// order.
    pub fn supplier_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for resource in &self.resources {
            if !ids.iter().any(|id| resource.owner_id == id.as_str()) {
                ids.push(resource.owner_id.to_string());
            }
        }
        ids
    }

    fn owner_of(&self, resource_id: &str) -> Option<&SharedStr> {
        self.resources
            .iter()
            .find(|r| r.id == resource_id)
            .map(|r| &r.owner_id)
    }
}

#[async_trait]
impl ReservationSource for FixtureFeed {
    async fn fetch_reservations(
        &self,
        suppliers: &[String],
        statuses: &[ReservationStatus],
        range: FetchRange,
        filter: &BookingFilter,
    ) -> Result<Vec<Reservation>> {
        let keyword = filter.keyword.as_deref().map(str::to_lowercase);
        Ok(self
            .reservations
            .iter()
            .filter(|r| statuses.contains(&r.status))
            .filter(|r| r.start <= range.end && r.end >= range.start)
            .filter(|r| match self.owner_of(&r.resource_id) {
                Some(owner) => suppliers.iter().any(|s| *owner == s.as_str()),
                // Legacy booking of a vehicle missing from the fleet
                // feed; returned so its commitment still renders.
                None => true,
            })
            .filter(|r| match &keyword {
                Some(needle) => r.counterparty.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ResourceSource for FixtureFeed {
    async fn fetch_resources(
        &self,
        suppliers: &[String],
        _range: FetchRange,
    ) -> Result<Vec<Resource>> {
        // Fixtures carry no availability calendar: every owned resource
        // counts as bookable somewhere in range, which matches the
        // include-already-booked contract.
        Ok(self
            .resources
            .iter()
            .filter(|r| suppliers.iter().any(|s| r.owner_id == s.as_str()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fleet_board_core::{TimeWindow, Zoom};

    use super::*;

    const FIXTURE: &str = r#"{
        "resources": [
            {"id": "veh-1", "name": "Transit L2", "owner_id": "sup-1", "plate": "B-1001", "category": "van"},
            {"id": "veh-2", "name": "Caddy", "owner_id": "sup-2", "plate": null, "category": null}
        ],
        "reservations": [
            {"id": "r-1", "resource_id": "veh-1", "start": "2026-01-02T09:00:00Z", "end": "2026-01-05T17:00:00Z", "status": "confirmed", "counterparty": "ACME Logistics"},
            {"id": "r-2", "resource_id": "veh-2", "start": "2026-01-03T09:00:00Z", "end": "2026-01-04T17:00:00Z", "status": "cancelled", "counterparty": "Beta GmbH"}
        ]
    }"#;

    fn range() -> FetchRange {
        let window = TimeWindow::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            Zoom::Month,
        );
        FetchRange {
            start: window.visible_start(),
            end: window.visible_end(),
        }
    }

    #[test]
    fn parses_fixture_and_collects_suppliers() {
        let feed = FixtureFeed::from_json(FIXTURE.as_bytes()).unwrap();
        assert_eq!(feed.supplier_ids(), ["sup-1", "sup-2"]);
    }

    #[tokio::test]
    async fn filters_by_status_and_owner() {
        let feed = FixtureFeed::from_json(FIXTURE.as_bytes()).unwrap();
        let suppliers = vec!["sup-1".to_string(), "sup-2".to_string()];

        let confirmed_only = feed
            .fetch_reservations(
                &suppliers,
                &[ReservationStatus::Confirmed],
                range(),
                &BookingFilter::default(),
            )
            .await
            .unwrap();
        assert_eq!(confirmed_only.len(), 1);
        assert_eq!(confirmed_only[0].id, "r-1");

        let sup2_fleet = feed
            .fetch_resources(&["sup-2".to_string()], range())
            .await
            .unwrap();
        assert_eq!(sup2_fleet.len(), 1);
        assert_eq!(sup2_fleet[0].id, "veh-2");
    }

    #[tokio::test]
    async fn keyword_matches_counterparty_case_insensitively() {
        let feed = FixtureFeed::from_json(FIXTURE.as_bytes()).unwrap();
        let suppliers = vec!["sup-1".to_string(), "sup-2".to_string()];
        let filter = BookingFilter {
            keyword: Some("acme".to_string()),
            ..BookingFilter::default()
        };
        let hits = feed
            .fetch_reservations(
                &suppliers,
                &[ReservationStatus::Confirmed, ReservationStatus::Cancelled],
                range(),
                &filter,
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].counterparty, "ACME Logistics");
    }

    #[tokio::test]
    async fn range_intersection_excludes_out_of_range_bookings() {
        let feed = FixtureFeed::from_json(FIXTURE.as_bytes()).unwrap();
        let suppliers = vec!["sup-1".to_string(), "sup-2".to_string()];
        let window = TimeWindow::new(
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            Zoom::Week,
        );
        let march = FetchRange {
            start: window.visible_start(),
            end: window.visible_end(),
        };
        let hits = feed
            .fetch_reservations(
                &suppliers,
                &[ReservationStatus::Confirmed, ReservationStatus::Cancelled],
                march,
                &BookingFilter::default(),
            )
            .await
            .unwrap();
        assert!(hits.is_empty());
    }
}
