//! Throttling policies for user-driven events.

mod leading;
mod trailing;

pub use leading::LeadingThrottle;
pub use trailing::TrailingThrottle;
