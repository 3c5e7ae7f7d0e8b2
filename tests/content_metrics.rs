mod support;

use std::{collections::HashMap, time::Duration};

use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use quillpost::application::content::{
    ContentClient, ContentClientConfig, FetchError, METRIC_CONTENT_CACHE_HIT_TOTAL,
    METRIC_CONTENT_DEGRADED_TOTAL, METRIC_CONTENT_FETCH_TOTAL,
};
use serde_json::json;
use support::{CountingSource, post_json, posts};

#[tokio::test(start_paused = true)]
async fn content_queries_emit_expected_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let healthy = CountingSource::serving(posts(json!([post_json(
        "a",
        "published",
        "2024-01-01"
    )])));
    let client = ContentClient::new(
        ContentClientConfig {
            revalidate: Duration::from_secs(60),
        },
        healthy.clone(),
    );
    client.list_published().await;
    client.list_published().await;

    let broken = CountingSource::failing(FetchError::Status {
        status: 503,
        body: String::new(),
    });
    let degraded = ContentClient::new(ContentClientConfig::default(), broken.clone());
    degraded.get_by_slug("a").await;

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((composite_key.key().name().to_string(), count)),
            _ => None,
        })
        .fold(HashMap::new(), |mut acc, (name, count)| {
            *acc.entry(name).or_default() += count;
            acc
        });

    assert_eq!(counters.get(METRIC_CONTENT_FETCH_TOTAL), Some(&2));
    assert_eq!(counters.get(METRIC_CONTENT_CACHE_HIT_TOTAL), Some(&1));
    assert_eq!(counters.get(METRIC_CONTENT_DEGRADED_TOTAL), Some(&1));
}
