//! Input/output helpers.
//!
//! - `# key: value` metadata headers (`header`)
//! - whitespace-delimited numeric tables (`table`)
//! - CSV/JSON exports (`export`)

pub mod export;
pub mod header;
pub mod table;

pub use export::*;
pub use header::*;
pub use table::*;
