//! A deliberately small computer-algebra layer.
//!
//! - `expr`: expression trees, substitution, evaluation
//! - `compile`: argument-slot compilation for fast numeric evaluation
//! - `latex` / `ccode`: source printers for the generated documents

pub mod ccode;
pub mod compile;
pub mod expr;
pub mod latex;

pub use ccode::to_ccode;
pub use compile::{Compiled, compile};
pub use expr::Expr;
pub use latex::{latex_eq, latex_symbol, to_latex};
