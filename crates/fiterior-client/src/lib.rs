//! Transform request contract and the client that submits it
//!
//! The client talks to an opaque HTTP endpoint. Network trouble never reaches
//! the caller as an error: connection failures, non-2xx statuses and timeouts
//! all resolve to a synthetic [`TransformOutcome::Fallback`]. Consumers that
//! only need "something to drive" depend on the [`TransformBackend`] trait.

mod client;
pub(crate) mod http_client;
mod job_id;
mod types;

pub use client::{ClientSettings, TransformClient};
pub use job_id::{JobIdGenerator, next_job_id};
pub use types::{
    FallbackReason, TransformBackend, TransformOutcome, TransformRequest, TransformResponse,
};
pub use fiterior_utils::error::TransformError;

// Test seam; not part of public API stability guarantees.
#[doc(hidden)]
pub use http_client::redact_error_message_for_testing;
