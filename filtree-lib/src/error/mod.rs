//! Error types

mod filter;
mod page;
mod settings;

pub use filter::*;
pub use page::*;
pub use settings::*;
