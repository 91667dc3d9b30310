use std::sync::Arc;

use chrono::NaiveDate;

use fleet_board_protocol::ResourceRow;

use crate::fetch::{
    BookingFilter, DataFetcher, FetchError, FetchOutcome, ReservationSource, ResourceSource,
};
use crate::layout::build_rows;
use crate::window::{TimeWindow, Zoom};

/// Everything a renderer needs for one frame. The renderer performs no
/// date arithmetic of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub rows: Vec<ResourceRow>,
    pub days: Vec<NaiveDate>,
    pub range_label: String,
}

/// The booking timeline engine: current window, current filter, and the
/// buffered data fetcher, behind an explicit recompute entry point.
///
/// Navigation replaces the window value; the host then awaits
/// [`BookingBoard::refresh`] and calls [`BookingBoard::layout`], which
/// is a pure function of the window and the last applied snapshot.
pub struct BookingBoard {
    window: TimeWindow,
    filter: BookingFilter,
    fetcher: DataFetcher,
}

impl BookingBoard {
    pub fn new(
        window: TimeWindow,
        filter: BookingFilter,
        reservations: Arc<dyn ReservationSource>,
        resources: Arc<dyn ResourceSource>,
    ) -> Self {
        Self {
            window,
            filter,
            fetcher: DataFetcher::new(reservations, resources),
        }
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn filter(&self) -> &BookingFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: BookingFilter) {
        self.filter = filter;
    }

    /// Jump to a date (the Today button passes the current date).
    pub fn set_anchor(&mut self, anchor: NaiveDate) {
        self.window = self.window.with_anchor(anchor);
    }

    pub fn set_zoom(&mut self, zoom: Zoom) {
        self.window = self.window.with_zoom(zoom);
    }

    pub fn next(&mut self) {
        self.window = self.window.next();
    }

    pub fn previous(&mut self) {
        self.window = self.window.previous();
    }

    /// Re-read both feeds for the current window and filter. Late
    /// results of superseded fetches are discarded by the fetcher.
    pub async fn refresh(&self) -> Result<FetchOutcome, FetchError> {
        self.fetcher.refresh(self.window, &self.filter).await
    }

    /// Lay out the last applied snapshot against the current window.
    pub fn layout(&self) -> BoardLayout {
        let snapshot = self.fetcher.snapshot();
        BoardLayout {
            rows: build_rows(&snapshot.resources, &snapshot.reservations, self.window),
            days: self.window.visible_days().collect(),
            range_label: self.window.range_label(),
        }
    }
}
