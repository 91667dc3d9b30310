use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    // Booking bar fills, one per reservation status.
    BookingPending,
    BookingConfirmed,
    BookingActive,
    BookingCompleted,
    BookingCancelled,

    RowBackground,
    RowBorder,
    RowHeaderBackground,
    RowHeaderText,

    // Day ruler
    RulerBackground,
    RulerTick,
    RulerWeekend,

    TextPrimary,
    TextSecondary,
    TextMuted,

    Background,
    ToolbarBackground,
    ToolbarText,
}
