//! Tracing subscriber setup.
//!
//! Events go to stderr so stdout carries only reports and ASCII previews.
//! The filter comes from `RUST_LOG` and defaults to `info`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (e.g. from tests) is not an error worth reporting.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter)
        .try_init();
}
