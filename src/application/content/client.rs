use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use metrics::counter;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::{
    posts::{Post, PublishedCatalog},
    slug::lookup_slug,
};

use super::{
    diagnostics::{
        DiagnosticSink, METRIC_CONTENT_CACHE_HIT_TOTAL, METRIC_CONTENT_FETCH_TOTAL, Operation,
        TracingDiagnostics,
    },
    error::{ContentOutcome, FetchError},
    source::PostSource,
};

const DEFAULT_REVALIDATE_SECS: u64 = 60;

/// Fetch key under which the full post collection is cached.
pub const POSTS_TAG: &str = "posts";

#[derive(Debug, Clone)]
pub struct ContentClientConfig {
    /// How long a fetched snapshot may be served before the next call refetches.
    /// Zero disables caching.
    pub revalidate: Duration,
}

impl Default for ContentClientConfig {
    fn default() -> Self {
        Self {
            revalidate: Duration::from_secs(DEFAULT_REVALIDATE_SECS),
        }
    }
}

impl From<&crate::config::ContentSettings> for ContentClientConfig {
    fn from(settings: &crate::config::ContentSettings) -> Self {
        Self {
            revalidate: settings.revalidate,
        }
    }
}

type SnapshotMap = HashMap<String, Snapshot>;

struct Snapshot {
    catalog: Arc<PublishedCatalog>,
    fetched_at: Instant,
}

/// Read-only, filtered and sorted view over an externally hosted post
/// collection, with bounded staleness.
///
/// Every query is infallible from the caller's point of view: fetch failures
/// are reported to the diagnostics sink and surface as empty or not-found
/// results. The typed variants ([`ContentClient::fetch_published`],
/// [`ContentClient::find_by_slug`]) expose the failure when a caller needs it.
///
/// Concurrent callers that find a stale snapshot each fetch; the last
/// successful fetch replaces the snapshot.
pub struct ContentClient {
    config: ContentClientConfig,
    source: Arc<dyn PostSource>,
    diagnostics: Arc<dyn DiagnosticSink>,
    snapshots: RwLock<SnapshotMap>,
}

impl ContentClient {
    pub fn new(config: ContentClientConfig, source: Arc<dyn PostSource>) -> Self {
        Self {
            config,
            source,
            diagnostics: Arc::new(TracingDiagnostics),
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &ContentClientConfig {
        &self.config
    }

    /// Published posts, newest first.
    pub async fn list_published(&self) -> Vec<Post> {
        self.fetch_published().await.into_value()
    }

    pub async fn fetch_published(&self) -> ContentOutcome<Vec<Post>> {
        self.published(Operation::ListPublished).await
    }

    /// The published post with `slug`, if any.
    pub async fn get_by_slug(&self, slug: &str) -> Option<Post> {
        self.find_by_slug(slug).await.into_value()
    }

    pub async fn find_by_slug(&self, slug: &str) -> ContentOutcome<Option<Post>> {
        let slug = match lookup_slug(slug) {
            Ok(slug) => slug,
            Err(error) => {
                debug!(target = "quillpost::content", error = %error, "rejected slug lookup");
                return ContentOutcome::Ready(None);
            }
        };

        match self.catalog(Operation::GetBySlug).await {
            Ok(catalog) => {
                let post = catalog.find_by_slug(slug).cloned();
                debug!(
                    target = "quillpost::content",
                    slug,
                    found = post.is_some(),
                    "slug lookup"
                );
                ContentOutcome::Ready(post)
            }
            Err(error) => ContentOutcome::Degraded(error),
        }
    }

    /// Slugs of the published posts, in the same order as [`Self::list_published`].
    pub async fn list_slugs(&self) -> Vec<String> {
        self.fetch_slugs().await.into_value()
    }

    pub async fn fetch_slugs(&self) -> ContentOutcome<Vec<String>> {
        match self.catalog(Operation::ListSlugs).await {
            Ok(catalog) => ContentOutcome::Ready(catalog.slugs()),
            Err(error) => ContentOutcome::Degraded(error),
        }
    }

    /// Drop every cached snapshot so the next query fetches.
    pub fn revalidate(&self) {
        let mut snapshots = self.write_snapshots("revalidate");
        let dropped = snapshots.len();
        snapshots.clear();
        info!(target = "quillpost::content", dropped, "content revalidation triggered");
    }

    /// Drop the snapshot cached under `tag`. Returns whether one was present.
    pub fn revalidate_tag(&self, tag: &str) -> bool {
        let removed = self.write_snapshots("revalidate_tag")
            .remove(tag)
            .is_some();
        info!(target = "quillpost::content", tag, removed, "content tag revalidated");
        removed
    }

    async fn published(&self, operation: Operation) -> ContentOutcome<Vec<Post>> {
        match self.catalog(operation).await {
            Ok(catalog) => ContentOutcome::Ready(catalog.posts().to_vec()),
            Err(error) => ContentOutcome::Degraded(error),
        }
    }

    async fn catalog(&self, operation: Operation) -> Result<Arc<PublishedCatalog>, FetchError> {
        if let Some(catalog) = self.fresh_snapshot(POSTS_TAG) {
            counter!(METRIC_CONTENT_CACHE_HIT_TOTAL, "tag" => POSTS_TAG).increment(1);
            return Ok(catalog);
        }

        counter!(METRIC_CONTENT_FETCH_TOTAL, "tag" => POSTS_TAG).increment(1);
        match self.source.fetch().await {
            Ok(posts) => {
                let catalog = Arc::new(PublishedCatalog::from_upstream(posts));
                info!(
                    target = "quillpost::content",
                    operation = operation.as_str(),
                    published = catalog.len(),
                    revalidate_secs = self.config.revalidate.as_secs(),
                    "fetched post collection"
                );
                self.store(POSTS_TAG, Arc::clone(&catalog));
                Ok(catalog)
            }
            Err(error) => {
                self.diagnostics.degraded(operation, &error);
                Err(error)
            }
        }
    }

    fn fresh_snapshot(&self, tag: &str) -> Option<Arc<PublishedCatalog>> {
        let snapshots = self.read_snapshots("fresh_snapshot");
        let snapshot = snapshots.get(tag)?;
        (snapshot.fetched_at.elapsed() < self.config.revalidate)
            .then(|| Arc::clone(&snapshot.catalog))
    }

    fn store(&self, tag: &str, catalog: Arc<PublishedCatalog>) {
        self.write_snapshots("store").insert(
            tag.to_string(),
            Snapshot {
                catalog,
                fetched_at: Instant::now(),
            },
        );
    }

    // Every write is a single insert, remove or clear, so a poisoned map is still consistent.
    fn read_snapshots(&self, op: &'static str) -> RwLockReadGuard<'_, SnapshotMap> {
        self.snapshots.read().unwrap_or_else(|poisoned| {
            warn!(
                target = "quillpost::content",
                op,
                "snapshot map poisoned by an earlier panic; reading it anyway"
            );
            poisoned.into_inner()
        })
    }

    fn write_snapshots(&self, op: &'static str) -> RwLockWriteGuard<'_, SnapshotMap> {
        self.snapshots.write().unwrap_or_else(|poisoned| {
            warn!(
                target = "quillpost::content",
                op,
                "snapshot map poisoned by an earlier panic; replacing entries anyway"
            );
            poisoned.into_inner()
        })
    }
}
