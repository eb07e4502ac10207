//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound weather request:
//!     → timeouts.rs (one deadline around the whole geocoding → weather chain)
//!     → On expiry: in-flight provider calls are dropped, 408 to the caller
//! ```
//!
//! # Design Decisions
//! - Every resolution has a deadline; provider calls inherit it
//! - No retries: a failed provider call is translated and returned once

pub mod timeouts;

pub use timeouts::with_deadline;
