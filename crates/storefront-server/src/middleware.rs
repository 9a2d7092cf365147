use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Id of the current request, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tags every request with an id, reusing a non-blank incoming
/// `x-request-id`, and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = header_str(req.headers(), REQUEST_ID_HEADER)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

#[derive(Debug)]
struct ClientWindow {
    opened: Instant,
    hits: usize,
}

/// Per-client fixed-window limiter for the API routes.
///
/// Clients are told apart by the first `x-forwarded-for` hop; requests
/// without one share a single window.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    limit: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<String, ClientWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn per_minute(limit: usize) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Counts one hit for `client`. Returns the seconds until its window
    /// reopens when the hit is over the limit.
    async fn hit(&self, client: &str) -> Option<u64> {
        let now = Instant::now();
        let mut clients = self.clients.lock().await;
        clients.retain(|_, w| now.duration_since(w.opened) < self.window);

        let entry = clients.entry(client.to_owned()).or_insert(ClientWindow {
            opened: now,
            hits: 0,
        });
        if entry.hits >= self.limit {
            let remaining = self
                .window
                .saturating_sub(now.duration_since(entry.opened));
            return Some(remaining.as_secs().max(1));
        }
        entry.hits += 1;
        None
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn client_key(headers: &HeaderMap) -> String {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map_or_else(|| "anonymous".to_owned(), |hop| hop.trim().to_owned())
}

/// Rejects requests over the client's limit with `429 rate_limited` and a
/// `Retry-After` header.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(req.headers());
    let Some(retry_after) = limiter.hit(&client).await else {
        return next.run(req).await;
    };

    tracing::warn!(%client, path = %req.uri().path(), retry_after, "request rejected by rate limit");
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let mut res = ApiError::new(request_id, "rate_limited", "too many requests").into_response();
    res.headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    fn app(limiter: RateLimitState) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                limiter,
                enforce_rate_limit,
            ))
            .layer(axum::middleware::from_fn(request_id))
    }

    fn get_from(client: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(addr) = client {
            builder = builder.header("x-forwarded-for", addr);
        }
        builder.body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn rejects_client_past_its_limit_with_retry_after() {
        let app = app(RateLimitState::new(2, Duration::from_secs(60)));
        for _ in 0..2 {
            let res = app
                .clone()
                .oneshot(get_from(Some("10.0.0.1")))
                .await
                .expect("response");
            assert_eq!(res.status(), StatusCode::OK);
        }
        let res = app
            .oneshot(get_from(Some("10.0.0.1")))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = res
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .expect("retry-after header");
        assert!((1..=60).contains(&retry_after));
    }

    #[tokio::test]
    async fn clients_have_separate_windows() {
        let app = app(RateLimitState::new(1, Duration::from_secs(60)));
        let first = app
            .clone()
            .oneshot(get_from(Some("10.0.0.1, 172.16.0.1")))
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::OK);
        let other = app
            .clone()
            .oneshot(get_from(Some("10.0.0.2")))
            .await
            .expect("response");
        assert_eq!(other.status(), StatusCode::OK);
        let repeat = app
            .oneshot(get_from(Some("10.0.0.1")))
            .await
            .expect("response");
        assert_eq!(repeat.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn client_key_uses_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_key(&headers), "anonymous");
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.9 , 10.0.0.1"),
        );
        assert_eq!(client_key(&headers), "203.0.113.9");
    }

    #[tokio::test]
    async fn echoes_incoming_request_id() {
        let req = axum::http::Request::builder()
            .uri("/")
            .header(REQUEST_ID_HEADER, "req-abc")
            .body(Body::empty())
            .expect("request");
        let res = app(RateLimitState::per_minute(10))
            .oneshot(req)
            .await
            .expect("response");
        assert_eq!(
            header_str(res.headers(), REQUEST_ID_HEADER),
            Some("req-abc")
        );
    }

    #[tokio::test]
    async fn blank_request_id_is_replaced_with_uuid() {
        let req = axum::http::Request::builder()
            .uri("/")
            .header(REQUEST_ID_HEADER, "   ")
            .body(Body::empty())
            .expect("request");
        let res = app(RateLimitState::per_minute(10))
            .oneshot(req)
            .await
            .expect("response");
        let id = header_str(res.headers(), REQUEST_ID_HEADER).expect("request id header");
        assert!(Uuid::parse_str(id).is_ok());
    }
}
