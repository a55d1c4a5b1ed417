/// Route configuration for the monitor's HTTP server
use axum::{routing::get, Router};
use std::path::Path;
use tower_http::services::ServeFile;

use crate::server::handlers;
use crate::store::SnapshotStore;

/// Create the main application router
///
/// `static_dir` holds `index.html` and `style.css` for the browser
/// front-end; missing files answer 404 without affecting `/data`.
pub fn create_router(store: SnapshotStore, static_dir: &Path) -> Router {
    Router::new()
        // Snapshot query
        .route("/data", get(handlers::data_handler))
        // Front-end assets
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/style.css", ServeFile::new(static_dir.join("style.css")))
        .with_state(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AirQualityReport, LocalReading, Snapshot, WeatherReport};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    async fn get_body(router: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn published(store: &SnapshotStore) {
        store.publish(Snapshot::fuse(
            LocalReading {
                temperature: Some(24.25),
                humidity: Some(48.5),
                gas_raw: Some(1834),
                light_raw: Some(402),
            },
            Some(WeatherReport {
                pressure: Some(1013.0),
                latitude: Some(12.34),
                longitude: Some(56.78),
                city: Some("Testville".to_string()),
                observed_at: None,
            }),
            Some(AirQualityReport { pm25: Some(15.2) }),
            None,
        ));
    }

    #[tokio::test]
    async fn data_serves_current_snapshot_as_json() {
        let store = SnapshotStore::new();
        published(&store);
        let router = create_router(store, Path::new("/nonexistent"));

        let (status, content_type, body) = get_body(router, "/data").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(
            body,
            r#"{"temp":24.25,"hum":48.5,"pressure":1013.0,"pm25":15.2,"co2":1834,"ldr":402,"time":"Time Error","city":"Testville","lat":12.34,"lon":56.78}"#
        );
    }

    #[tokio::test]
    async fn data_before_first_cycle_is_all_sentinels() {
        let router = create_router(SnapshotStore::new(), Path::new("/nonexistent"));

        let (status, _, body) = get_body(router, "/data").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"{"temp":null,"hum":null,"pressure":0.0,"pm25":0.0,"co2":0,"ldr":0,"time":"Time Error","city":"","lat":0.0,"lon":0.0}"#
        );
    }

    #[tokio::test]
    async fn repeated_queries_between_cycles_are_identical() {
        let store = SnapshotStore::new();
        published(&store);
        let router = create_router(store, Path::new("/nonexistent"));

        let (_, _, first) = get_body(router.clone(), "/data").await;
        let (_, _, second) = get_body(router, "/data").await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn query_sees_new_snapshot_after_publish() {
        let store = SnapshotStore::new();
        let router = create_router(store.clone(), Path::new("/nonexistent"));

        let (_, _, before) = get_body(router.clone(), "/data").await;
        published(&store);
        let (_, _, after) = get_body(router, "/data").await;

        assert_ne!(before, after);
        assert!(after.contains(r#""city":"Testville""#));
    }

    #[tokio::test]
    async fn front_end_assets_come_from_static_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>monitor</h1>").unwrap();
        let router = create_router(SnapshotStore::new(), dir.path());

        let (status, content_type, body) = get_body(router.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/html"));
        assert_eq!(body, "<h1>monitor</h1>");

        let (status, _, _) = get_body(router, "/style.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
