use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use fleet_board_protocol::{PositionedBooking, Reservation, Resource, ResourceRow, SharedStr};

use crate::window::TimeWindow;

/// Join reservations to resources and pack each resource's reservations
/// into non-overlapping lanes.
///
/// Rows come out in resource-feed order, one per resource even when a
/// resource has no booking in range. Reservations whose resource is
/// missing from the feed get a synthesized row appended after the
/// seeded ones, so no booking is silently dropped. Lane packing is the
/// greedy interval-partitioning algorithm: per resource it yields the
/// minimum number of lanes such that no two bookings in a lane overlap.
pub fn build_rows(
    resources: &[Resource],
    reservations: &[Reservation],
    window: TimeWindow,
) -> Vec<ResourceRow> {
    let visible_start = window.visible_start();
    let visible_end = window.visible_end();

    // Seed one (resource, pending bookings) slot per resource, in feed
    // order, plus an id index for the assignment pass.
    let mut slots: Vec<(Resource, Vec<&Reservation>)> = resources
        .iter()
        .map(|r| (r.clone(), Vec::new()))
        .collect();
    let mut index: HashMap<SharedStr, usize> = resources
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.clone(), i))
        .collect();

    for reservation in reservations {
        // Fully outside the visible window, judged on unclamped bounds.
        if reservation.end < visible_start || reservation.start > visible_end {
            continue;
        }
        let slot = match index.get(reservation.resource_id.as_str()) {
            Some(&i) => i,
            None => {
                // Usually a stale resource cache upstream; keep the
                // booking visible on a synthesized row.
                warn!(
                    resource_id = %reservation.resource_id,
                    reservation_id = %reservation.id,
                    "reservation references a resource missing from the feed"
                );
                let i = slots.len();
                slots.push((
                    Resource::placeholder(reservation.resource_id.clone()),
                    Vec::new(),
                ));
                index.insert(reservation.resource_id.clone(), i);
                i
            }
        };
        slots[slot].1.push(reservation);
    }

    slots
        .into_iter()
        .map(|(resource, pending)| pack_row(resource, pending, visible_start, visible_end))
        .collect()
}

/// Assign one resource's reservations to lanes and clamp them to the
/// visible window.
fn pack_row(
    resource: Resource,
    mut pending: Vec<&Reservation>,
    visible_start: DateTime<Utc>,
    visible_end: DateTime<Utc>,
) -> ResourceRow {
    // Sort by original (unclamped) start so lane assignment is stable
    // across window changes that clamp differently.
    pending.sort_by_key(|r| r.start);

    let mut lane_ends: Vec<DateTime<Utc>> = Vec::new();
    let mut bookings = Vec::with_capacity(pending.len());

    for reservation in pending {
        // Lowest-indexed lane that ended at or before this start is
        // free: touching endpoints do not collide.
        let lane = match lane_ends.iter().position(|end| reservation.start >= *end) {
            Some(i) => {
                lane_ends[i] = reservation.end;
                i
            }
            None => {
                lane_ends.push(reservation.end);
                lane_ends.len() - 1
            }
        };
        bookings.push(position(reservation, lane, visible_start, visible_end));
    }

    ResourceRow {
        resource,
        // Even an empty row reserves one lane of height.
        lane_count: lane_ends.len().max(1),
        bookings,
    }
}

fn position(
    reservation: &Reservation,
    lane: usize,
    visible_start: DateTime<Utc>,
    visible_end: DateTime<Utc>,
) -> PositionedBooking {
    if reservation.end < reservation.start {
        warn!(
            reservation_id = %reservation.id,
            "reservation ends before it starts, flooring span to one day"
        );
    }
    let clamped_start = reservation.start.max(visible_start);
    let clamped_end = reservation.end.min(visible_end);
    let offset = (clamped_start.date_naive() - visible_start.date_naive()).num_days();
    let span = ((clamped_end.date_naive() - clamped_start.date_naive()).num_days() + 1).max(1);

    PositionedBooking {
        id: reservation.id.clone(),
        resource_id: reservation.resource_id.clone(),
        lane,
        offset,
        span,
        clamped_start,
        clamped_end,
        label: reservation.counterparty.clone(),
        color: reservation.status.token(),
    }
}
