//! forum/crates/services/src/lib.rs
//!
//! Application services. Each service orchestrates the domain ports; none
//! of them knows which adapter sits behind a port.

pub mod thread_detail;

pub use thread_detail::{ThreadDetailOptions, ThreadDetailService};
