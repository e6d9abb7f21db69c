//! Security middleware for response headers and request origins

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::domain::security::{security_headers, OriginPolicy, SecurityHeaderOptions};
use crate::domain::DomainError;

/// Pre-parsed security header set, cheap to clone into middleware state
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl SecurityHeaders {
    pub fn new(options: &SecurityHeaderOptions) -> Result<Self, DomainError> {
        let headers = security_headers(options)
            .into_iter()
            .map(|(name, value)| {
                let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                    DomainError::configuration(format!("Invalid header name {}", name))
                })?;
                let value = HeaderValue::from_str(&value).map_err(|_| {
                    DomainError::configuration(format!("Invalid value for header {}", name))
                })?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Self {
            headers: Arc::new(headers),
        })
    }

    /// Insert every header, replacing values set by the handler
    pub fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in self.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        if !headers.contains_key(header::CACHE_CONTROL) {
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate"),
            );
        }
    }
}

/// Middleware to add security headers to all responses
pub async fn security_headers_middleware(
    State(security): State<SecurityHeaders>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    security.apply(response.headers_mut());
    response
}

/// Whether the request's `Origin` header is on the allow-list
///
/// A missing or non-UTF-8 header is treated as not allowed.
pub fn origin_allowed(headers: &HeaderMap, policy: &OriginPolicy) -> bool {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    policy.is_allowed(origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn test_apply_headers() {
        let security = SecurityHeaders::new(&SecurityHeaderOptions::default()).unwrap();
        let mut headers = HeaderMap::new();

        security.apply(&mut headers);

        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
        assert!(headers.contains_key(header::CACHE_CONTROL));
    }

    #[test]
    fn test_handler_cache_control_is_kept() {
        let security = SecurityHeaders::new(&SecurityHeaderOptions::default()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=60"));

        security.apply(&mut headers);

        assert_eq!(headers[header::CACHE_CONTROL], "max-age=60");
    }

    #[test]
    fn test_origin_allowed() {
        let policy = OriginPolicy::default();
        let mut headers = HeaderMap::new();

        assert!(!origin_allowed(&headers, &policy));

        headers.insert(header::ORIGIN, HeaderValue::from_static("https://tcdynamics.fr"));
        assert!(origin_allowed(&headers, &policy));

        headers.insert(header::ORIGIN, HeaderValue::from_static("https://evil.example"));
        assert!(!origin_allowed(&headers, &policy));
    }

    #[tokio::test]
    async fn test_middleware_sets_headers_on_responses() {
        let security = SecurityHeaders::new(&SecurityHeaderOptions {
            report_uri: Some("/csp-report".to_string()),
            ..SecurityHeaderOptions::default()
        })
        .unwrap();
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .route(
                "/cached",
                get(|| async { ([(header::CACHE_CONTROL, "max-age=60")], "ok") }),
            )
            .layer(middleware::from_fn_with_state(
                security,
                security_headers_middleware,
            ));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
        assert!(headers[header::CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap()
            .ends_with("report-uri /csp-report"));
        assert_eq!(
            headers[header::CACHE_CONTROL],
            "no-store, no-cache, must-revalidate"
        );

        let response = app
            .oneshot(Request::builder().uri("/cached").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=60");
        assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
    }
}
