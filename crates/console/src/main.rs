//! `timetable-console` -- interactive admin console for the school
//! timetable API.
//!
//! Reads commands from stdin and prints tables and the weekly grid to
//! stdout. Logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable               | Default                 | Description                          |
//! |------------------------|-------------------------|--------------------------------------|
//! | `TIMETABLE_API_URL`    | `http://localhost:5000` | API base URL                         |
//! | `REQUEST_TIMEOUT_SECS` | `30`                    | Per-request timeout                  |
//! | `TIMETABLE_ROW_ORDER`  | `start_time`            | `start_time` or `first_appearance`   |
//! | `EXPORT_DIR`           | `.`                     | Where export PDFs are written        |
//! | `ASSUME_YES`           | `false`                 | Skip confirmation prompts            |
//! | `LOG_FORMAT`           | `text`                  | `text` or `json`                     |

use std::time::Duration;

use timetable_client::TimetableApi;
use timetable_console::config::ConsoleConfig;
use timetable_console::shell::Shell;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timetable_console=info,timetable_client=info".into()),
        )
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    let config = ConsoleConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let api = TimetableApi::new(
        &config.api_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to create API client");
        std::process::exit(1);
    });

    tracing::info!(
        api_url = %config.api_url,
        timeout_secs = config.request_timeout_secs,
        row_order = ?config.row_order,
        "Starting timetable-console",
    );

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let mut shell = Shell::new(api, &config, stdin, stdout);

    if let Err(e) = shell.run().await {
        tracing::error!(error = %e, "Console terminated");
        std::process::exit(1);
    }
}
