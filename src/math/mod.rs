//! Numerical utilities: linear and nonlinear least squares.

pub mod levenberg;
pub mod ols;

pub use levenberg::*;
pub use ols::*;
