mod renderer;
mod source;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;

use fleet_board_core::{BookingBoard, BookingFilter, TimeWindow, Zoom};
use fleet_board_protocol::ReservationStatus;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Only log when asked; a default subscriber would scribble over the
    // alternate screen.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: fleet-board <fixtures.json>");
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let data = std::fs::read(&path)?;
    let feed = Arc::new(source::FixtureFeed::from_json(&data)?);

    let filter = BookingFilter {
        suppliers: feed.supplier_ids(),
        statuses: vec![
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Active,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
        ],
        ..BookingFilter::default()
    };

    let today = Local::now().date_naive();
    let window = TimeWindow::new(today, Zoom::Week);
    let mut board = BookingBoard::new(window, filter, feed.clone(), feed);
    board.refresh().await?;

    renderer::run(&mut board, today).await
}
