use metrics::counter;
use tracing::warn;

use super::error::FetchError;

pub const METRIC_CONTENT_FETCH_TOTAL: &str = "quillpost_content_fetch_total";
pub const METRIC_CONTENT_CACHE_HIT_TOTAL: &str = "quillpost_content_cache_hit_total";
pub const METRIC_CONTENT_DEGRADED_TOTAL: &str = "quillpost_content_degraded_total";

/// The public query that produced a degraded outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListPublished,
    GetBySlug,
    ListSlugs,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ListPublished => "list_published",
            Operation::GetBySlug => "get_by_slug",
            Operation::ListSlugs => "list_slugs",
        }
    }
}

/// Receives one call per degraded outcome of the content client.
pub trait DiagnosticSink: Send + Sync {
    fn degraded(&self, operation: Operation, error: &FetchError);
}

/// Default sink: a structured warning plus a labelled counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn degraded(&self, operation: Operation, error: &FetchError) {
        let status = match error {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        };

        warn!(
            target = "quillpost::content",
            operation = operation.as_str(),
            reason = error.reason(),
            status,
            error = %error,
            "content fetch degraded"
        );

        counter!(
            METRIC_CONTENT_DEGRADED_TOTAL,
            "operation" => operation.as_str(),
            "reason" => error.reason()
        )
        .increment(1);
    }
}
