use axum::http::{Method, StatusCode};
use notice_ai::config::CorsConfig;
use notice_ai::model::GenerativeModel;
use notice_ai::service::{resolve, ApiRequest, ApiResponse, NoticeService, RouteMatch};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

const PREFLIGHT_METHODS: &str = "GET, POST, OPTIONS";

/// One HTTP invocation as delivered by the function host.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(alias = "httpMethod")]
    pub method: String,
    pub path: String,
    #[serde(default, alias = "queryStringParameters")]
    pub query: Option<HashMap<String, String>>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl InvocationEvent {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response envelope written back to the function host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Runs one invocation through the shared dispatcher and attaches CORS
/// headers. `OPTIONS` on a known path is answered as a preflight.
pub async fn invoke<M>(
    service: &NoticeService<M>,
    cors: &CorsConfig,
    event: InvocationEvent,
) -> InvocationResponse
where
    M: GenerativeModel + ?Sized,
{
    let origin = event.header("origin").map(str::to_string);

    let Ok(method) = Method::from_bytes(event.method.to_ascii_uppercase().as_bytes()) else {
        let response = ApiResponse::json(
            StatusCode::BAD_REQUEST,
            json!({ "error": format!("invalid HTTP method '{}'", event.method) }),
        );
        return into_invocation_response(response, cors, origin.as_deref());
    };

    info!(%method, path = %event.path, "handling invocation");

    if method == Method::OPTIONS && resolve(&Method::GET, &event.path) != RouteMatch::NotFound {
        return preflight(cors, origin.as_deref(), event.header("access-control-request-headers"));
    }

    let request = ApiRequest {
        method,
        path: event.path,
        query: event.query.unwrap_or_default(),
        body: event.body.map(String::into_bytes).unwrap_or_default(),
    };

    let response = service.handle(&request).await;
    into_invocation_response(response, cors, origin.as_deref())
}

fn cors_headers(cors: &CorsConfig, origin: Option<&str>) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    if let Some(allowed) = cors.allow_origin(origin) {
        headers.insert("Access-Control-Allow-Origin".to_string(), allowed);
    }
    if matches!(cors, CorsConfig::Origins(_)) {
        headers.insert("Vary".to_string(), "Origin".to_string());
    }
    headers
}

fn preflight(
    cors: &CorsConfig,
    origin: Option<&str>,
    requested_headers: Option<&str>,
) -> InvocationResponse {
    let mut headers = cors_headers(cors, origin);
    headers.insert(
        "Access-Control-Allow-Methods".to_string(),
        PREFLIGHT_METHODS.to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Headers".to_string(),
        requested_headers.unwrap_or("Content-Type").to_string(),
    );

    InvocationResponse {
        status_code: StatusCode::NO_CONTENT.as_u16(),
        headers,
        body: String::new(),
    }
}

fn into_invocation_response(
    response: ApiResponse,
    cors: &CorsConfig,
    origin: Option<&str>,
) -> InvocationResponse {
    let mut headers = cors_headers(cors, origin);
    headers.insert(
        "Content-Type".to_string(),
        response.body.content_type().to_string(),
    );
    if let Some(allow) = response.allow {
        headers.insert("Allow".to_string(), allow);
    }

    InvocationResponse {
        status_code: response.status.as_u16(),
        headers,
        body: response.body.to_text(),
    }
}
