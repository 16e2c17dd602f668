//! Logging setup.
//!
//! `tracing` with an env filter (`RUST_LOG`, default `info`). Records emitted
//! through the `log` facade by `todo-core` are bridged in by `try_init`.

use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = fmt().with_env_filter(filter).with_target(true).finish();
    if let Err(e) = tracing_subscriber::util::SubscriberInitExt::try_init(subscriber) {
        eprintln!("logger already initialized: {e}");
    }
}
