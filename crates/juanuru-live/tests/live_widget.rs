//! Integration tests for LiveDataWidget against a mock live endpoint.

use std::sync::Arc;

use juanuru_core::LiveConfig;
use juanuru_live::{
    CacheSlot, FileStore, KeyValueStore, LiveDataWidget, LiveReading, LiveView, MemoryStore,
    MemoryTarget, MissingFieldPolicy,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NAIROBI: (f64, f64) = (-1.2921, 36.8219);

fn live_config(base_url: &str) -> LiveConfig {
    LiveConfig {
        base_url: base_url.to_string(),
        ..LiveConfig::default()
    }
}

/// Nothing listens on port 1, so requests fail to connect.
fn unreachable_config() -> LiveConfig {
    live_config("http://127.0.0.1:1")
}

struct Harness {
    widget: LiveDataWidget,
    store: Arc<MemoryStore>,
    target: Arc<MemoryTarget>,
}

fn harness(config: &LiveConfig) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let target = Arc::new(MemoryTarget::new());
    let widget = LiveDataWidget::from_config(config, store.clone(), target.clone()).unwrap();
    Harness {
        widget,
        store,
        target,
    }
}

async fn mount_reading(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_success_renders_and_caches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .and(query_param("lat", "-1.2921"))
        .and(query_param("lon", "36.8219"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "temperature": 24.5,
            "windspeed": 3.7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&live_config(&server.uri()));
    let view = h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;

    let reading = LiveReading::new(Some(24.5), Some(3.7));
    assert_eq!(view, LiveView::Live(reading));
    assert_eq!(
        h.target.html().unwrap(),
        "<h3>Live Solar Data</h3><p>Temperature: 24.5°C</p><p>Wind Speed: 3.7 m/s</p>"
    );

    let cached = CacheSlot::new(h.store.clone(), "lastLiveData").load().unwrap();
    assert_eq!(cached, Some(reading));
}

#[tokio::test]
async fn test_partial_reading_uses_placeholder_and_still_caches() {
    let server = MockServer::start().await;
    mount_reading(&server, serde_json::json!({ "windspeed": 6.0 })).await;

    let h = harness(&live_config(&server.uri()));
    let view = h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;

    assert_eq!(view, LiveView::Live(LiveReading::new(None, Some(6.0))));
    let html = h.target.html().unwrap();
    assert!(html.contains("<p>Temperature: N/A°C</p>"), "{html}");
    assert!(html.contains("<p>Wind Speed: 6 m/s</p>"), "{html}");
    assert_eq!(
        h.store.get_item("lastLiveData").unwrap().as_deref(),
        Some(r#"{"windspeed":6.0}"#)
    );
}

#[tokio::test]
async fn test_empty_object_renders_all_placeholders() {
    let server = MockServer::start().await;
    mount_reading(&server, serde_json::json!({})).await;

    let h = harness(&live_config(&server.uri()));
    h.widget.fetch_and_render(0.0, 0.0).await;

    let text = h.target.current().unwrap().text();
    assert_eq!(text, "Live Solar Data\nTemperature: N/A°C\nWind Speed: N/A m/s");
}

#[tokio::test]
async fn test_raw_policy_renders_undefined() {
    let server = MockServer::start().await;
    mount_reading(&server, serde_json::json!({ "temperature": 30 })).await;

    let mut config = live_config(&server.uri());
    config.missing_field_policy = MissingFieldPolicy::Raw;
    let h = harness(&config);
    h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;

    assert!(h.target.html().unwrap().contains("Wind Speed: undefined m/s"));
}

#[tokio::test]
async fn test_failure_with_cache_renders_cached_and_keeps_slot() {
    let h = harness(&unreachable_config());
    let earlier = r#"{"temperature":19.5,"windspeed":2.0}"#;
    h.store.set_item("lastLiveData", earlier).unwrap();

    let view = h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;

    assert_eq!(view, LiveView::Cached(LiveReading::new(Some(19.5), Some(2.0))));
    assert_eq!(
        h.target.html().unwrap(),
        "<h3>Live Solar Data (Cached)</h3><p>Temperature: 19.5°C</p><p>Wind Speed: 2 m/s</p>"
    );
    assert_eq!(h.store.get_item("lastLiveData").unwrap().as_deref(), Some(earlier));
}

#[tokio::test]
async fn test_failure_without_cache_renders_unavailable() {
    let h = harness(&unreachable_config());

    let view = h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;

    assert_eq!(view, LiveView::Unavailable);
    assert_eq!(h.target.html().unwrap(), "<p>Live data unavailable</p>");
    assert!(h.store.is_empty(), "no cache key may be created on failure");
}

#[tokio::test]
async fn test_error_status_falls_back_to_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "temperature": 99.0
        })))
        .mount(&server)
        .await;

    let h = harness(&live_config(&server.uri()));
    CacheSlot::new(h.store.clone(), "lastLiveData")
        .save(&LiveReading::new(Some(20.0), Some(1.0)))
        .unwrap();

    let view = h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;
    assert_eq!(view, LiveView::Cached(LiveReading::new(Some(20.0), Some(1.0))));
}

#[tokio::test]
async fn test_malformed_body_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let h = harness(&live_config(&server.uri()));
    let view = h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;

    assert_eq!(view, LiveView::Unavailable);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_permissive_status_renders_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(502).set_body_json(serde_json::json!({
            "temperature": 17.0,
            "windspeed": 1.5
        })))
        .mount(&server)
        .await;

    let mut config = live_config(&server.uri());
    config.require_success_status = false;
    let h = harness(&config);

    let view = h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;
    assert_eq!(view, LiveView::Live(LiveReading::new(Some(17.0), Some(1.5))));
}

#[tokio::test]
async fn test_fallback_disabled_ignores_cache() {
    let mut config = unreachable_config();
    config.cache_fallback = false;
    let h = harness(&config);
    h.store.set_item("lastLiveData", r#"{"temperature":10.0}"#).unwrap();

    let view = h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;
    assert_eq!(view, LiveView::Unavailable);
}

#[tokio::test]
async fn test_corrupt_cache_renders_unavailable() {
    let h = harness(&unreachable_config());
    h.store.set_item("lastLiveData", "{truncated").unwrap();

    let view = h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;
    assert_eq!(view, LiveView::Unavailable);
    assert_eq!(h.target.render_count(), 1);
}

#[tokio::test]
async fn test_retry_recovers_from_transient_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_reading(&server, serde_json::json!({ "temperature": 22.0, "windspeed": 4.0 })).await;

    let mut config = live_config(&server.uri());
    config.max_retries = 2;
    config.retry_delay_ms = 10;
    let h = harness(&config);

    let view = h.widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;
    assert_eq!(view, LiveView::Live(LiveReading::new(Some(22.0), Some(4.0))));
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&live_config(&server.uri()));
    assert_eq!(h.widget.fetch_and_render(1.0, 2.0).await, LiveView::Unavailable);
}

#[tokio::test]
async fn test_later_success_overwrites_cache_across_sessions() {
    let server = MockServer::start().await;
    mount_reading(&server, serde_json::json!({ "temperature": 26.0, "windspeed": 2.5 })).await;

    let dir = tempfile::tempdir().unwrap();
    let config = live_config(&server.uri());

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
    store.set_item("lastLiveData", r#"{"temperature":1.0}"#).unwrap();
    let widget =
        LiveDataWidget::from_config(&config, store, Arc::new(MemoryTarget::new())).unwrap();
    widget.fetch_and_render(NAIROBI.0, NAIROBI.1).await;

    // A fresh session pointed at a dead endpoint sees the newer reading.
    let target = Arc::new(MemoryTarget::new());
    let offline = LiveDataWidget::from_config(
        &unreachable_config(),
        Arc::new(FileStore::new(dir.path())),
        target.clone(),
    )
    .unwrap();
    let view = offline.fetch_and_render(NAIROBI.0, NAIROBI.1).await;

    assert_eq!(view, LiveView::Cached(LiveReading::new(Some(26.0), Some(2.5))));
    assert!(target.html().unwrap().contains("(Cached)"));
}
