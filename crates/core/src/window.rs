use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// How many days the timeline shows at once.
///
/// Month is a fixed 31-day scroll anchored on any day, not a calendar
/// month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zoom {
    Week,
    Month,
}

impl Zoom {
    /// Length of the visible window in days.
    pub fn range_days(self) -> i64 {
        match self {
            Zoom::Week => 14,
            Zoom::Month => 31,
        }
    }

    /// Anchor movement for Previous/Next. Smaller than the range length,
    /// so consecutive windows overlap — a deliberate product choice.
    pub fn step_days(self) -> i64 {
        match self {
            Zoom::Week => 7,
            Zoom::Month => 14,
        }
    }

    /// Extra days fetched on each side of the visible window so small
    /// navigations rarely wait on the network.
    pub fn buffer_days(self) -> i64 {
        match self {
            Zoom::Week => 7,
            Zoom::Month => 31,
        }
    }
}

/// The currently rendered date range: an anchor day plus a zoom level.
///
/// A value type: navigation and zoom changes produce a new window, the
/// old one is never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    anchor: NaiveDate,
    zoom: Zoom,
}

impl TimeWindow {
    /// Window anchored at `anchor`, normalized the same way as
    /// [`TimeWindow::with_zoom`] (Week windows start on Monday).
    pub fn new(anchor: NaiveDate, zoom: Zoom) -> Self {
        Self { anchor, zoom }.with_zoom(zoom)
    }

    pub fn anchor(self) -> NaiveDate {
        self.anchor
    }

    pub fn zoom(self) -> Zoom {
        self.zoom
    }

    /// Start of the anchor day, UTC.
    pub fn visible_start(self) -> DateTime<Utc> {
        self.anchor.and_time(NaiveTime::MIN).and_utc()
    }

    /// End of the last visible day (23:59:59.999), UTC.
    pub fn visible_end(self) -> DateTime<Utc> {
        (self.anchor + Duration::days(self.zoom.range_days()))
            .and_time(NaiveTime::MIN)
            .and_utc()
            - Duration::milliseconds(1)
    }

    /// Last calendar day inside the window.
    pub fn last_visible_day(self) -> NaiveDate {
        self.anchor + Duration::days(self.zoom.range_days() - 1)
    }

    /// Replace the anchor (Today / jump-to-date).
    pub fn with_anchor(self, anchor: NaiveDate) -> Self {
        Self { anchor, ..self }
    }

    /// Replace the zoom level. Entering Week snaps the anchor back to
    /// the Monday of its ISO week; entering Month keeps the day as-is.
    pub fn with_zoom(self, zoom: Zoom) -> Self {
        let anchor = match zoom {
            Zoom::Week => self.anchor.week(Weekday::Mon).first_day(),
            Zoom::Month => self.anchor,
        };
        Self { anchor, zoom }
    }

    /// Advance by one step (7 days in Week, 14 in Month).
    pub fn next(self) -> Self {
        self.with_anchor(self.anchor + Duration::days(self.zoom.step_days()))
    }

    /// Retreat by one step.
    pub fn previous(self) -> Self {
        self.with_anchor(self.anchor - Duration::days(self.zoom.step_days()))
    }

    /// Every calendar day in the window, ascending. Exactly
    /// `range_days` entries; a fresh iterator on every call.
    pub fn visible_days(self) -> impl Iterator<Item = NaiveDate> {
        self.anchor.iter_days().take(self.zoom.range_days() as usize)
    }

    /// Human-readable label for the window: a single month/year when the
    /// window fits inside one calendar month, a start–end range otherwise.
    pub fn range_label(self) -> String {
        let start = self.anchor;
        let end = self.last_visible_day();
        if start.year() == end.year() && start.month() == end.month() {
            format!("{} {}", start.format("%B"), start.year())
        } else if start.year() == end.year() {
            format!(
                "{} {} – {} {} {}",
                start.day(),
                start.format("%b"),
                end.day(),
                end.format("%b"),
                end.year()
            )
        } else {
            format!(
                "{} {} {} – {} {} {}",
                start.day(),
                start.format("%b"),
                start.year(),
                end.day(),
                end.format("%b"),
                end.year()
            )
        }
    }
}
