//! forum/crates/domains/src/lib.rs
//!
//! Record shapes, presentation views and store contracts for the forum's
//! thread-detail read path.

pub mod errors;
pub mod ports;
pub mod records;
pub mod views;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use ports::*;
pub use records::*;
pub use views::*;
