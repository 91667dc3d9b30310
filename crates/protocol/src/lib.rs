pub mod entities;
pub mod rows;
pub mod shared_str;
pub mod theme;

pub use entities::{Reservation, ReservationStatus, Resource};
pub use rows::{PositionedBooking, ResourceRow};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
