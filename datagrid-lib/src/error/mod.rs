//! Error types

mod bulk;
mod config;
mod export;
mod field;
mod filter;
mod grid;

pub use bulk::*;
pub use config::*;
pub use export::*;
pub use field::*;
pub use filter::*;
pub use grid::*;
