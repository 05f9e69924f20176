//! forum/crates/storage-adapters/src/lib.rs
//!
//! Record store implementations of the domain ports.

pub mod fixture;
pub mod memory;
pub mod timeout;

pub use fixture::{FixtureError, ForumFixture, SeedSummary};
pub use memory::InMemoryForumStore;
pub use timeout::TimeoutStore;
