use std::io::stdout;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Weekday};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::Block,
};

use fleet_board_core::{BoardLayout, BookingBoard, Zoom};
use fleet_board_protocol::ThemeToken;

const LABEL_COLUMN_WIDTH: u16 = 22;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::BookingPending => Color::Yellow,
        ThemeToken::BookingConfirmed => Color::Green,
        ThemeToken::BookingActive => Color::Cyan,
        ThemeToken::BookingCompleted => Color::Gray,
        ThemeToken::BookingCancelled => Color::Red,
        ThemeToken::RowBackground => Color::Black,
        ThemeToken::RowBorder => Color::DarkGray,
        ThemeToken::RowHeaderBackground => Color::DarkGray,
        ThemeToken::RowHeaderText => Color::White,
        ThemeToken::RulerBackground => Color::Black,
        ThemeToken::RulerTick => Color::Gray,
        ThemeToken::RulerWeekend => Color::LightBlue,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextSecondary => Color::Gray,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::Background => Color::Black,
        ThemeToken::ToolbarBackground => Color::DarkGray,
        ThemeToken::ToolbarText => Color::White,
    }
}

/// Interactive loop: draw the board, translate keys into navigation,
/// and re-fetch after every window or zoom change.
pub async fn run(board: &mut BookingBoard, today: NaiveDate) -> Result<()> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut scroll: usize = 0;
    let mut notice: Option<String> = None;

    loop {
        let layout = board.layout();
        terminal.draw(|frame| draw(frame, &layout, scroll, notice.as_deref()))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let refetch = match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Left => {
                        board.previous();
                        true
                    }
                    KeyCode::Right => {
                        board.next();
                        true
                    }
                    KeyCode::Char('t') => {
                        board.set_anchor(today);
                        true
                    }
                    KeyCode::Char('w') => {
                        board.set_zoom(Zoom::Week);
                        true
                    }
                    KeyCode::Char('m') => {
                        board.set_zoom(Zoom::Month);
                        true
                    }
                    KeyCode::Char('r') => true,
                    KeyCode::Up => {
                        scroll = scroll.saturating_sub(1);
                        false
                    }
                    KeyCode::Down => {
                        scroll += 1;
                        false
                    }
                    _ => false,
                };
                if refetch {
                    // A failed read keeps the previous data on screen.
                    notice = match board.refresh().await {
                        Ok(_) => None,
                        Err(e) => Some(format!("fetch failed: {e}")),
                    };
                }
            }
            _ => {}
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn draw(frame: &mut Frame, layout: &BoardLayout, scroll: usize, notice: Option<&str>) {
    let area = frame.area();
    if area.height < 3 || layout.days.is_empty() {
        return;
    }

    let title = match notice {
        Some(msg) => format!(" fleet-board — {} | {msg} ", layout.range_label),
        None => format!(
            " fleet-board — {} | ←/→ step | t today | w/m zoom | r refresh | q quit ",
            layout.range_label
        ),
    };
    let header = Block::default().title(title).style(
        Style::default()
            .fg(theme_to_color(ThemeToken::ToolbarText))
            .bg(theme_to_color(ThemeToken::ToolbarBackground)),
    );
    frame.render_widget(header, Rect::new(0, 0, area.width, 1));

    let grid_x = LABEL_COLUMN_WIDTH.min(area.width / 3);
    let grid_w = area.width.saturating_sub(grid_x);
    let cell_w = ((grid_w as usize / layout.days.len()).max(1)) as u16;
    let content = Rect::new(0, 2, area.width, area.height - 2);
    let buf = frame.buffer_mut();

    // Day ruler, weekends tinted.
    for (i, day) in layout.days.iter().enumerate() {
        let x = grid_x + i as u16 * cell_w;
        if x + 1 >= area.width {
            break;
        }
        let token = if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            ThemeToken::RulerWeekend
        } else {
            ThemeToken::RulerTick
        };
        let text = format!("{:>2}", day.day());
        for (j, ch) in text.chars().enumerate() {
            buf[(x + j as u16, 1)]
                .set_char(ch)
                .set_fg(theme_to_color(token));
        }
    }

    // Resource rows: one header line plus one line per lane.
    let mut line: i64 = -(scroll as i64);
    for row in &layout.rows {
        if (0..i64::from(content.height)).contains(&line) {
            let y = content.y + line as u16;
            let plate = row.resource.plate.as_deref().unwrap_or("");
            let text = format!("{} {}", row.resource.name, plate);
            for (j, ch) in text.chars().take(grid_x as usize).enumerate() {
                buf[(j as u16, y)]
                    .set_char(ch)
                    .set_fg(theme_to_color(ThemeToken::RowHeaderText))
                    .set_bg(theme_to_color(ThemeToken::RowHeaderBackground));
            }
        }
        line += 1;

        for lane in 0..row.lane_count {
            if (0..i64::from(content.height)).contains(&line) {
                let y = content.y + line as u16;
                for booking in row.bookings.iter().filter(|b| b.lane == lane) {
                    let x0 = grid_x + booking.offset as u16 * cell_w;
                    let w = (booking.span as u16 * cell_w).max(1);
                    let fg = theme_to_color(booking.color);
                    let display = bar_text(booking.label.as_str(), w as usize);
                    for (j, ch) in display.chars().take(w as usize).enumerate() {
                        let cx = x0 + j as u16;
                        if cx < area.width {
                            buf[(cx, y)].set_char(ch).set_fg(fg);
                        }
                    }
                }
            }
            line += 1;
        }
    }
}

/// Label if it fits inside a bar of `width` cells, a block fill
/// otherwise. Counts chars, not bytes: the cell loop advances per char.
fn bar_text(label: &str, width: usize) -> String {
    let label_chars = label.chars().count();
    if width >= label_chars + 2 {
        format!(" {label:<pad$}", pad = width - 2)
    } else {
        "█".repeat(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_text_fits_by_char_count() {
        // 10 chars but 11 bytes; still fits a 12-cell bar.
        let text = bar_text("Kurier Süd", 12);
        assert_eq!(text, " Kurier Süd");

        let padded = bar_text("Süd", 8);
        assert_eq!(padded, " Süd   ");
        assert_eq!(padded.chars().count(), 7);
    }

    #[test]
    fn bar_text_falls_back_to_a_block_fill() {
        assert_eq!(bar_text("Kurier Süd", 8), "█".repeat(8));
        assert_eq!(bar_text("", 1), "█");
    }
}
