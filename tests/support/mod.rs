#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use quillpost::{
    application::content::{DiagnosticSink, FetchError, Operation, PostSource},
    domain::posts::Post,
};
use serde_json::Value;

/// Post source stub that serves a replaceable response and counts fetches.
pub struct CountingSource {
    calls: AtomicUsize,
    response: Mutex<Result<Vec<Post>, FetchError>>,
}

impl CountingSource {
    pub fn serving(posts: Vec<Post>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Mutex::new(Ok(posts)),
        })
    }

    pub fn failing(error: FetchError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: Mutex::new(Err(error)),
        })
    }

    pub fn respond_with(&self, response: Result<Vec<Post>, FetchError>) {
        *self.response.lock().expect("response lock") = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostSource for CountingSource {
    async fn fetch(&self) -> Result<Vec<Post>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.lock().expect("response lock").clone()
    }
}

/// Diagnostics sink that remembers every degraded outcome.
#[derive(Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<(Operation, &'static str)>>,
}

impl RecordingDiagnostics {
    pub fn events(&self) -> Vec<(Operation, &'static str)> {
        self.events.lock().expect("events lock").clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn degraded(&self, operation: Operation, error: &FetchError) {
        self.events
            .lock()
            .expect("events lock")
            .push((operation, error.reason()));
    }
}

/// Decode posts from their wire representation.
pub fn posts(value: Value) -> Vec<Post> {
    serde_json::from_value(value).expect("fixture posts decode")
}

pub fn post_json(slug: &str, status: &str, publish_date: &str) -> Value {
    serde_json::json!({
        "id": format!("id-{slug}"),
        "slug": slug,
        "title": format!("Post {slug}"),
        "content": "Body text",
        "author": "Grace",
        "status": status,
        "publishDate": publish_date,
        "categories": ["engineering"],
        "tags": ["rust"],
        "keywords": [],
        "featuredImageUrl": ""
    })
}
