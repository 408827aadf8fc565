//! Host-agnostic request handling shared by the server and function shells.
//!
//! A shell translates its native request into an [`ApiRequest`], calls
//! [`NoticeService::handle`] (or one of the per-endpoint operations when the
//! host already routes by path), and translates the [`ApiResponse`] back.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::model::GenerativeModel;
use crate::notices::{analysis_envelope, list_notices, search_notices, NoticeClassifier};

pub const HEALTH_PATH: &str = "/api/health";
pub const NOTICES_PATH: &str = "/api/notices";
pub const SEARCH_PATH: &str = "/api/notices/search";

const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// A request as seen by the dispatcher, independent of any host API.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn content_type(&self) -> &'static str {
        match self {
            ResponseBody::Json(_) => "application/json",
            ResponseBody::Text(_) => "text/plain; charset=utf-8",
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
    /// Methods served on the path, set on 405 responses.
    pub allow: Option<String>,
}

impl ApiResponse {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(body),
            allow: None,
        }
    }

    pub fn method_not_allowed(allowed: &[Method]) -> Self {
        let allow = allowed
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            body: ResponseBody::Text(METHOD_NOT_ALLOWED.to_string()),
            allow: Some(allow),
        }
    }

    pub fn not_found() -> Self {
        Self::json(StatusCode::NOT_FOUND, json!({ "error": "Not found" }))
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let content_type = self.body.content_type();
        let mut response = match self.body {
            ResponseBody::Json(value) => (self.status, Json(value)).into_response(),
            ResponseBody::Text(text) => {
                (self.status, [(CONTENT_TYPE, content_type)], text).into_response()
            }
        };

        if let Some(allow) = self.allow.and_then(|raw| HeaderValue::from_str(&raw).ok()) {
            response.headers_mut().insert(ALLOW, allow);
        }
        response
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    CreateNotice,
    ListNotices,
    SearchNotices,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    Found(Route),
    MethodNotAllowed(&'static [Method]),
    NotFound,
}

/// Maps a method and path to exactly one route.
pub fn resolve(method: &Method, path: &str) -> RouteMatch {
    const GET_ONLY: &[Method] = &[Method::GET];
    const NOTICES: &[Method] = &[Method::GET, Method::POST];

    match (path, method.as_str()) {
        (HEALTH_PATH, "GET") => RouteMatch::Found(Route::Health),
        (NOTICES_PATH, "POST") => RouteMatch::Found(Route::CreateNotice),
        (NOTICES_PATH, "GET") => RouteMatch::Found(Route::ListNotices),
        (SEARCH_PATH, "GET") => RouteMatch::Found(Route::SearchNotices),
        (HEALTH_PATH | SEARCH_PATH, _) => RouteMatch::MethodNotAllowed(GET_ONLY),
        (NOTICES_PATH, _) => RouteMatch::MethodNotAllowed(NOTICES),
        _ => RouteMatch::NotFound,
    }
}

pub fn health() -> ApiResponse {
    ApiResponse::json(
        StatusCode::OK,
        json!({ "status": "OK", "message": "API Running!" }),
    )
}

pub fn notices() -> ApiResponse {
    ApiResponse::json(StatusCode::OK, json!({ "notices": list_notices() }))
}

/// A missing `q` searches for the empty string.
pub fn search(query: Option<&str>) -> ApiResponse {
    let results = search_notices(query.unwrap_or_default());
    ApiResponse::json(StatusCode::OK, json!({ "results": results }))
}

/// The notice API with its classifier wired in.
pub struct NoticeService<M: ?Sized> {
    classifier: NoticeClassifier<M>,
}

impl<M: ?Sized> Clone for NoticeService<M> {
    fn clone(&self) -> Self {
        Self {
            classifier: self.classifier.clone(),
        }
    }
}

impl<M> NoticeService<M>
where
    M: GenerativeModel + ?Sized,
{
    pub fn new(model: Arc<M>) -> Self {
        Self {
            classifier: NoticeClassifier::new(model),
        }
    }

    pub async fn create_notice(&self, body: &[u8]) -> ApiResponse {
        match self.classifier.classify_body(body).await {
            Ok(analysis) => ApiResponse::json(StatusCode::CREATED, analysis_envelope(&analysis)),
            Err(err) => ApiResponse::json(err.status(), err.envelope()),
        }
    }

    pub async fn handle(&self, request: &ApiRequest) -> ApiResponse {
        match resolve(&request.method, &request.path) {
            RouteMatch::Found(Route::Health) => health(),
            RouteMatch::Found(Route::CreateNotice) => self.create_notice(&request.body).await,
            RouteMatch::Found(Route::ListNotices) => notices(),
            RouteMatch::Found(Route::SearchNotices) => {
                search(request.query.get("q").map(String::as_str))
            }
            RouteMatch::MethodNotAllowed(allowed) => ApiResponse::method_not_allowed(allowed),
            RouteMatch::NotFound => ApiResponse::not_found(),
        }
    }
}
