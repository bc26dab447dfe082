//! Session lifecycle orchestration.
//!
//! Decides when a snapshot is taken (every save outside a session, plus
//! startup recovery) and when the cached state is applied back (after a
//! session ends, behind a short delay).

pub mod controller;
pub mod events;

#[cfg(test)]
mod tests;

pub use controller::*;
pub use events::*;
