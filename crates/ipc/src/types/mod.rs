//! Type definitions for IPC messages.

mod catalog;
mod chain;
mod material;

pub use catalog::*;
pub use chain::*;
pub use material::*;
