//! Deadline enforcement.
//!
//! # Responsibilities
//! - Bound a whole resolution by a single deadline
//! - Cancel in-flight work when the deadline fires
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; expiry drops the wrapped future, which
//!   aborts any outstanding `reqwest` call inside it
//! - Expiry is reported as `408 Request Timeout`, distinct from provider errors

use std::future::Future;
use std::time::Duration;

use crate::error::{Failure, Outcome};

/// Run `work` until it finishes or `limit` elapses.
pub async fn with_deadline<T, F>(limit: Duration, work: F) -> Outcome<T>
where
    F: Future<Output = Outcome<T>>,
{
    match tokio::time::timeout(limit, work).await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::warn!(deadline_ms = limit.as_millis() as u64, "Resolution deadline exceeded");
            Err(Failure::deadline(limit))
        }
    }
}
