use crate::modules::repository_charts::adapters::outbound::chart_renderer::ChartShape;
use crate::modules::repository_charts::adapters::outbound::data_source_in_memory::InMemoryRepositoryDataSource;
use crate::modules::repository_charts::core::hour_bucket::{CacheKey, HourBucket};
use crate::modules::repository_charts::core::username::Username;
use crate::modules::repository_charts::use_cases::fetch_repositories::handler::HourlyCache;
use crate::modules::repository_charts::use_cases::render_chart::handler::RenderChartHandler;
use crate::shared::core::clock::FixedClock;
use crate::shared::infrastructure::record_store::RecordStore;
use crate::shared::infrastructure::record_store::file::FileRecordStore;
use crate::shell::http::router;
use crate::shell::state::AppState;
use crate::tests::fixtures::records::sample_portfolio;
use crate::tests::fixtures::renderer::{PNG_SIGNATURE, RecordingRenderer};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct Pipeline {
    state: AppState,
    source: Arc<InMemoryRepositoryDataSource>,
    renderer: Arc<RecordingRenderer>,
    store: Arc<FileRecordStore>,
    _cache_dir: TempDir,
}

async fn pipeline() -> Pipeline {
    let cache_dir = TempDir::new().unwrap();
    let store = Arc::new(FileRecordStore::new(cache_dir.path()));
    let source = InMemoryRepositoryDataSource::new();
    source.seed("octocat", sample_portfolio()).await;
    let source = Arc::new(source);
    let renderer = Arc::new(RecordingRenderer::new());
    let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());

    let handler = RenderChartHandler::new(
        HourlyCache::new(store.clone(), source.clone()),
        renderer.clone(),
        Arc::new(clock),
        "sans-serif",
    );
    Pipeline {
        state: AppState {
            render_chart: Arc::new(handler),
        },
        source,
        renderer,
        store,
        _cache_dir: cache_dir,
    }
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = router(state.clone())
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, bytes.to_vec())
}

#[tokio::test]
async fn serves_every_chart_from_one_upstream_fetch_per_hour() {
    let p = pipeline().await;

    for uri in [
        "/github/octocat/top-forks",
        "/github/octocat/top-stars?cmap=hot_r&top=2",
        "/github/Octocat/bubble-lang",
    ] {
        let (status, content_type, body) = get(&p.state, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(content_type.as_deref(), Some("image/png"));
        assert_eq!(body, PNG_SIGNATURE);
    }

    assert_eq!(p.source.calls(), 1);
    assert_eq!(p.renderer.render_count(), 3);

    let spec = p.renderer.last_spec().unwrap();
    assert_eq!(spec.shape, ChartShape::Bubbles);
    assert_eq!((spec.width, spec.height), (800, 800));

    let key = CacheKey::new(
        &Username::parse("octocat").unwrap(),
        HourBucket::containing(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
    );
    assert!(p.store.path_for(&key).ends_with("octocat_2024050112.json"));
    assert_eq!(p.store.load(&key).await.unwrap(), Some(sample_portfolio()));
}

#[tokio::test]
async fn reports_failures_without_touching_the_renderer() {
    let p = pipeline().await;

    let (status, _, _) = get(&p.state, "/github/ghost/top-forks").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = get(&p.state, "/github/octocat/top-forks?cmap=sparkles").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("sparkles"));

    assert_eq!(p.renderer.render_count(), 0);
}

#[tokio::test]
async fn serves_an_index_page() {
    let p = pipeline().await;

    let (status, content_type, body) = get(&p.state, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(String::from_utf8(body).unwrap().contains("/github/{username}/top-forks"));
}

#[tokio::test]
async fn returns_404_for_unknown_routes() {
    let p = pipeline().await;
    let (status, _, _) = get(&p.state, "/github/octocat/top-issues").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
