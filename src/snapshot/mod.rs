//! Snapshot capture, field-exclusion marking, and the on-disk cache store.

pub mod capture;
pub mod marker;
pub mod record;
pub mod store;


pub use capture::*;
pub use marker::*;
pub use record::*;
pub use store::*;
