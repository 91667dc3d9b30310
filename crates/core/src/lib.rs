pub mod board;
pub mod fetch;
pub mod layout;
pub mod window;

pub use board::{BoardLayout, BookingBoard};
pub use fetch::{
    BookingFilter, DataFetcher, FetchError, FetchOutcome, FetchRange, ReservationSource,
    ResourceSource, Snapshot,
};
pub use layout::build_rows;
pub use window::{TimeWindow, Zoom};
