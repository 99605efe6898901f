//! `sphere-mc` library crate.
//!
//! The binary (`smc`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the launch, sweep and fit tools share parsing, formatting and plotting
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod density;
pub mod error;
pub mod ghs;
pub mod io;
pub mod launch;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod settings;
pub mod sweep;
pub mod symbolic;
