//! Content client: the read-only view over the upstream post collection.
//!
//! The client asks a [`PostSource`] for the whole collection, keeps the result
//! as a snapshot per fetch key for the configured revalidation interval, and
//! answers the three reader queries from it:
//!
//! - [`ContentClient::list_published`]: published posts, newest first
//! - [`ContentClient::get_by_slug`]: one published post
//! - [`ContentClient::list_slugs`]: slugs for static generation
//!
//! Fetch failures never reach the caller as errors; they are reported to a
//! [`DiagnosticSink`] and degrade to empty or not-found results.

mod client;
mod diagnostics;
mod error;
mod source;

pub use client::{ContentClient, ContentClientConfig, POSTS_TAG};
pub use diagnostics::{
    DiagnosticSink, METRIC_CONTENT_CACHE_HIT_TOTAL, METRIC_CONTENT_DEGRADED_TOTAL,
    METRIC_CONTENT_FETCH_TOTAL, Operation, TracingDiagnostics,
};
pub use error::{ContentOutcome, FetchError};
pub use source::PostSource;
