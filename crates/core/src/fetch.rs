use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use fleet_board_protocol::{Reservation, ReservationStatus, Resource};

use crate::window::TimeWindow;

/// Filter state feeding one fetch cycle.
///
/// Passed explicitly into every fetch so the pipeline stays a pure
/// function of its inputs — nothing is captured from surrounding UI
/// state. An empty supplier or status set means "nothing to show",
/// never "all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingFilter {
    pub suppliers: Vec<String>,
    pub statuses: Vec<ReservationStatus>,
    /// Free-text search, forwarded opaquely to the sources.
    pub keyword: Option<String>,
    /// Explicit lower bound; replaces the buffered start when set.
    pub from: Option<NaiveDate>,
    /// Explicit upper bound; replaces the buffered end when set.
    pub to: Option<NaiveDate>,
    /// Location constraints, forwarded opaquely to the sources.
    pub locations: Vec<String>,
}

/// The date range actually requested from the backends: the visible
/// window widened by the zoom-dependent buffer on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchRange {
    /// Expand the visible window outward by the zoom's buffer. An
    /// explicit `from`/`to` in the filter takes precedence for that
    /// bound only — a caller-supplied range is never narrowed, only
    /// widened when absent.
    pub fn for_window(window: TimeWindow, filter: &BookingFilter) -> Self {
        let buffer = Duration::days(window.zoom().buffer_days());
        let start = match filter.from {
            Some(day) => day.and_time(NaiveTime::MIN).and_utc(),
            None => window.visible_start() - buffer,
        };
        let end = match filter.to {
            Some(day) => {
                (day + Duration::days(1)).and_time(NaiveTime::MIN).and_utc()
                    - Duration::milliseconds(1)
            }
            None => window.visible_end() + buffer,
        };
        Self { start, end }
    }
}

/// Read side of the reservation backend.
#[async_trait]
pub trait ReservationSource: Send + Sync {
    /// All reservations owned by `suppliers`, in one of `statuses`,
    /// whose interval intersects `range`. Pagination, if any, is the
    /// implementor's concern and must be exhausted before returning.
    async fn fetch_reservations(
        &self,
        suppliers: &[String],
        statuses: &[ReservationStatus],
        range: FetchRange,
        filter: &BookingFilter,
    ) -> Result<Vec<Reservation>>;
}

/// Read side of the fleet backend.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// All resources owned by `suppliers` bookable somewhere within
    /// `range` — including resources already fully booked or not yet
    /// available, so the timeline can still show their commitments.
    async fn fetch_resources(&self, suppliers: &[String], range: FetchRange)
    -> Result<Vec<Resource>>;
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("reservation feed failed: {0}")]
    Reservations(anyhow::Error),
    #[error("resource feed failed: {0}")]
    Resources(anyhow::Error),
}

/// What a `refresh` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Both result sets were applied to the snapshot.
    Applied,
    /// A newer fetch was initiated while this one was in flight; its
    /// late results were discarded.
    Superseded,
    /// Empty supplier or status selection: snapshot cleared, no request
    /// issued.
    EmptyFilter,
}

/// The last applied result sets. Treated as an immutable snapshot by
/// the layout: it is replaced wholesale, never edited.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub reservations: Vec<Reservation>,
    pub resources: Vec<Resource>,
}

/// Buffered, generation-checked reader over the two backend feeds.
///
/// Rapid navigation may leave several fetches in flight at once. Each
/// feed carries a monotonically increasing generation counter captured
/// at initiation; a result is applied only if its generation is still
/// the latest, so the displayed data always corresponds to the most
/// recently initiated request regardless of completion order.
pub struct DataFetcher {
    reservations: Arc<dyn ReservationSource>,
    resources: Arc<dyn ResourceSource>,
    reservation_gen: AtomicU64,
    resource_gen: AtomicU64,
    snapshot: Mutex<Snapshot>,
}

impl DataFetcher {
    pub fn new(
        reservations: Arc<dyn ReservationSource>,
        resources: Arc<dyn ResourceSource>,
    ) -> Self {
        Self {
            reservations,
            resources,
            reservation_gen: AtomicU64::new(0),
            resource_gen: AtomicU64::new(0),
            snapshot: Mutex::new(Snapshot::default()),
        }
    }

    /// Clone of the last applied snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.lock_snapshot().clone()
    }

    /// Re-read both feeds for the given window and filter.
    ///
    /// A failed read returns the error and leaves the previous snapshot
    /// fully intact; no retry is attempted (the next window or filter
    /// change re-triggers naturally).
    pub async fn refresh(
        &self,
        window: TimeWindow,
        filter: &BookingFilter,
    ) -> Result<FetchOutcome, FetchError> {
        if filter.suppliers.is_empty() || filter.statuses.is_empty() {
            debug!("empty supplier or status selection, clearing snapshot");
            // The clear counts as the latest request on both feeds, so an
            // earlier fetch still in flight cannot repopulate the snapshot.
            self.reservation_gen.fetch_add(1, Ordering::SeqCst);
            self.resource_gen.fetch_add(1, Ordering::SeqCst);
            *self.lock_snapshot() = Snapshot::default();
            return Ok(FetchOutcome::EmptyFilter);
        }

        let range = FetchRange::for_window(window, filter);
        let reservation_gen = self.reservation_gen.fetch_add(1, Ordering::SeqCst) + 1;
        let resource_gen = self.resource_gen.fetch_add(1, Ordering::SeqCst) + 1;

        let (reservations, resources) = futures::join!(
            self.reservations
                .fetch_reservations(&filter.suppliers, &filter.statuses, range, filter),
            self.resources.fetch_resources(&filter.suppliers, range),
        );

        // A failure only matters if this fetch is still the latest one;
        // a newer refresh has already replaced (or will replace) the data.
        let superseded = self.reservation_gen.load(Ordering::SeqCst) != reservation_gen
            || self.resource_gen.load(Ordering::SeqCst) != resource_gen;
        let reservations = match reservations {
            Ok(reservations) => reservations,
            Err(e) if superseded => {
                debug!(error = %e, "ignoring failed read of a superseded fetch");
                return Ok(FetchOutcome::Superseded);
            }
            Err(e) => {
                warn!(error = %e, "reservation read failed, keeping previous data");
                return Err(FetchError::Reservations(e));
            }
        };
        let resources = match resources {
            Ok(resources) => resources,
            Err(e) if superseded => {
                debug!(error = %e, "ignoring failed read of a superseded fetch");
                return Ok(FetchOutcome::Superseded);
            }
            Err(e) => {
                warn!(error = %e, "resource read failed, keeping previous data");
                return Err(FetchError::Resources(e));
            }
        };

        let mut outcome = FetchOutcome::Applied;
        let mut snapshot = self.lock_snapshot();
        if self.reservation_gen.load(Ordering::SeqCst) == reservation_gen {
            snapshot.reservations = reservations;
        } else {
            debug!(generation = reservation_gen, "discarding stale reservation response");
            outcome = FetchOutcome::Superseded;
        }
        if self.resource_gen.load(Ordering::SeqCst) == resource_gen {
            snapshot.resources = resources;
        } else {
            debug!(generation = resource_gen, "discarding stale resource response");
            outcome = FetchOutcome::Superseded;
        }
        Ok(outcome)
    }

    fn lock_snapshot(&self) -> MutexGuard<'_, Snapshot> {
        // The lock is never held across an await; a poisoned lock can
        // only mean a panic mid-assignment of a Vec, which is safe to
        // read through.
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
