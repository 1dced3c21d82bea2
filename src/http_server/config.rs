//! Listener settings for the committee API
//!
//! Read from the `http` table of the service config. `cors_origins` names the
//! front ends allowed to call the slot and catalog endpoints from a browser;
//! an empty list opens the API to any origin.

use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Where the committee API listens and who may call it cross-origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    /// 54321 unless overridden
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    54321
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Defaults on every interface, listening on `port` (the `--port` flag)
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// CORS for the committee routers. Entries that are not valid header
    /// values are skipped; a list with no usable entry admits no origin.
    pub fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        if self.cors_origins.is_empty() {
            return layer.allow_origin(Any);
        }

        let origins: Vec<_> = self
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    /// `Access-Control-Allow-Origin` returned for a slot read from `origin`
    async fn allowed_origin(config: &HttpServerConfig, origin: &str) -> Option<String> {
        let router = Router::new()
            .route("/committee-slots/1/AO", get(|| async { "{}" }))
            .layer(config.cors_layer());
        let request = Request::builder()
            .uri("/committee-slots/1/AO")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 54321);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_port_flag_keeps_default_host() {
        let config = HttpServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_http_table_keeps_defaults_for_missing_keys() {
        let config: HttpServerConfig =
            serde_json::from_str(r#"{"cors_origins": ["http://senate.example.edu"]}"#).unwrap();
        assert_eq!(config.port, 54321);
        assert_eq!(config.cors_origins, vec!["http://senate.example.edu"]);
    }

    #[tokio::test]
    async fn test_empty_origin_list_is_permissive() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"cors_origins": []}"#).unwrap();
        assert_eq!(
            allowed_origin(&config, "http://anywhere.example.com").await.as_deref(),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_origin_list_admits_only_listed_front_ends() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://senate.example.edu".to_string()],
            ..Default::default()
        };
        assert_eq!(
            allowed_origin(&config, "http://senate.example.edu").await.as_deref(),
            Some("http://senate.example.edu")
        );
        assert_eq!(allowed_origin(&config, "http://elsewhere.example.com").await, None);
    }
}
