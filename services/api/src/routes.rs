use crate::infra::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use notice_ai::config::CorsConfig;
use notice_ai::model::GenerativeModel;
use notice_ai::service::{
    self, ApiResponse, NoticeService, HEALTH_PATH, NOTICES_PATH, SEARCH_PATH,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// The four notice endpoints plus readiness and metrics, with CORS and
/// request tracing applied.
pub(crate) fn with_notice_routes<M>(service: NoticeService<M>, cors: &CorsConfig) -> Router
where
    M: GenerativeModel + ?Sized + 'static,
{
    Router::new()
        .route(
            HEALTH_PATH,
            get(health_endpoint).fallback(get_only_fallback),
        )
        .route(
            NOTICES_PATH,
            get(list_notices_endpoint)
                .post(create_notice_endpoint::<M>)
                .fallback(notices_fallback),
        )
        .route(
            SEARCH_PATH,
            get(search_notices_endpoint).fallback(get_only_fallback),
        )
        .with_state(service)
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

pub(crate) fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    match config {
        CorsConfig::Any => layer.allow_origin(Any),
        CorsConfig::Origins(origins) => layer.allow_origin(AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )),
    }
}

pub(crate) async fn health_endpoint() -> ApiResponse {
    service::health()
}

pub(crate) async fn create_notice_endpoint<M>(
    State(service): State<NoticeService<M>>,
    body: Bytes,
) -> ApiResponse
where
    M: GenerativeModel + ?Sized + 'static,
{
    service.create_notice(&body).await
}

pub(crate) async fn list_notices_endpoint() -> ApiResponse {
    service::notices()
}

/// Repeated `q` parameters resolve to the first one.
pub(crate) async fn search_notices_endpoint(
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResponse {
    let query = params
        .into_iter()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value);
    service::search(query.as_deref())
}

async fn get_only_fallback() -> ApiResponse {
    ApiResponse::method_not_allowed(&[Method::GET])
}

async fn notices_fallback() -> ApiResponse {
    ApiResponse::method_not_allowed(&[Method::GET, Method::POST])
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use notice_ai::model::{GenerationConfig, ModelError};
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubModel(Result<&'static str, &'static str>);

    #[async_trait]
    impl GenerativeModel for StubModel {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _config: &GenerationConfig,
        ) -> Result<String, ModelError> {
            self.0.map(str::to_string).map_err(|message| ModelError::Api {
                status: 503,
                message: message.to_string(),
            })
        }
    }

    fn app(reply: Result<&'static str, &'static str>) -> Router {
        app_with_cors(reply, &CorsConfig::Any)
    }

    fn app_with_cors(reply: Result<&'static str, &'static str>, cors: &CorsConfig) -> Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_notice_routes(NoticeService::new(Arc::new(StubModel(reply))), cors)
            .layer(Extension(state))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.expect("router responds");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");
        (status, body.to_vec())
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).expect("json body")
    }

    fn post_notice(body: &str) -> Request<Body> {
        Request::post(NOTICES_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn health_returns_exact_payload() {
        let (status, body) = send(
            app(Ok("{}")),
            Request::get(HEALTH_PATH).body(Body::empty()).expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({ "status": "OK", "message": "API Running!" })
        );
    }

    #[tokio::test]
    async fn create_notice_returns_created_analysis() {
        let (status, body) = send(
            app(Ok(r#"{"category":"Event","importance":"high","tags":["CSE"]}"#)),
            post_notice(r#"{"title":"Hackathon","content":"Register by Friday"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            json_body(&body),
            json!({
                "success": true,
                "analysis": { "category": "Event", "importance": "high", "tags": ["CSE"] }
            })
        );
    }

    #[tokio::test]
    async fn create_notice_rejects_missing_fields() {
        for payload in [
            r#"{"title":"Hackathon"}"#,
            r#"{"title":"","content":"Register"}"#,
            "not even json",
        ] {
            let (status, body) = send(app(Ok("{}")), post_notice(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(
                json_body(&body),
                json!({ "success": false, "error": "title and content are required" })
            );
        }
    }

    #[tokio::test]
    async fn create_notice_reports_invalid_model_json() {
        let (status, body) = send(
            app(Ok("not json")),
            post_notice(r#"{"title":"Hackathon","content":"Register by Friday"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(&body),
            json!({ "success": false, "error": "Model did not return valid JSON" })
        );
    }

    #[tokio::test]
    async fn create_notice_relays_upstream_error_text() {
        let (status, body) = send(
            app(Err("service unavailable")),
            post_notice(r#"{"title":"Hackathon","content":"Register by Friday"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(&body),
            json!({ "success": false, "error": "model API error (503): service unavailable" })
        );
    }

    #[tokio::test]
    async fn list_is_fixed_after_submissions() {
        let router = app(Ok(r#"{"category":"Other","importance":"low","tags":[]}"#));
        let list = || Request::get(NOTICES_PATH).body(Body::empty()).expect("request");

        let (_, before) = send(router.clone(), list()).await;
        send(
            router.clone(),
            post_notice(r#"{"title":"Library","content":"Closed Sunday"}"#),
        )
        .await;
        let (status, after) = send(router, list()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(before, after);
        let notices = json_body(&after);
        assert_eq!(notices["notices"].as_array().map(Vec::len), Some(2));
        assert_eq!(notices["notices"][1]["title"], "Hackathon Registration");
    }

    #[tokio::test]
    async fn search_echoes_query() {
        let (status, body) = send(
            app(Ok("{}")),
            Request::get("/api/notices/search?q=exam")
                .body(Body::empty())
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["results"][0]["matched_query"], "exam");

        let (_, body) = send(
            app(Ok("{}")),
            Request::get(SEARCH_PATH).body(Body::empty()).expect("request"),
        )
        .await;
        assert_eq!(json_body(&body)["results"][0]["matched_query"], "");
    }

    #[tokio::test]
    async fn search_tolerates_repeated_and_odd_queries() {
        for (uri, expected) in [
            ("/api/notices/search?q=a&q=b", "a"),
            ("/api/notices/search?q", ""),
            ("/api/notices/search?page=2&q=lab", "lab"),
        ] {
            let (status, body) = send(
                app(Ok("{}")),
                Request::get(uri).body(Body::empty()).expect("request"),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(json_body(&body)["results"][0]["matched_query"], expected, "{uri}");
        }
    }

    #[tokio::test]
    async fn unsupported_methods_yield_405() {
        for (method, path) in [
            (Method::POST, HEALTH_PATH),
            (Method::DELETE, HEALTH_PATH),
            (Method::PUT, NOTICES_PATH),
            (Method::DELETE, NOTICES_PATH),
            (Method::POST, SEARCH_PATH),
        ] {
            let request = Request::builder()
                .method(method.clone())
                .uri(path)
                .body(Body::empty())
                .expect("request");
            let (status, body) = send(app(Ok("{}")), request).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
            assert_eq!(body, b"Method not allowed");
        }
    }

    #[tokio::test]
    async fn cors_allows_any_origin_by_default() {
        let request = Request::get(HEALTH_PATH)
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .expect("request");
        let response = app(Ok("{}")).oneshot(request).await.expect("responds");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn cors_preflight_honors_configured_origins() {
        let cors = CorsConfig::Origins(vec!["https://notices.example.edu".to_string()]);
        let preflight = Request::builder()
            .method(Method::OPTIONS)
            .uri(NOTICES_PATH)
            .header(header::ORIGIN, "https://notices.example.edu")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .expect("request");
        let response = app_with_cors(Ok("{}"), &cors)
            .oneshot(preflight)
            .await
            .expect("responds");
        assert!(response.status().is_success());
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://notices.example.edu"
        );
    }

    #[tokio::test]
    async fn readiness_reports_ready() {
        let (status, body) = send(
            app(Ok("{}")),
            Request::get("/ready").body(Body::empty()).expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!({ "status": "ready" }));
    }
}
