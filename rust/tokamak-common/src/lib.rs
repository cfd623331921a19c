//! Core definitions (errors and results), relied upon by all tokamak-* crates.

pub mod error;
pub mod macros;
pub mod result;

pub use result::Result;
